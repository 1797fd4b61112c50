//! Wire shapes of the remote API.

use banca_core::{BancaError, BancaResult, BankCard, CardNumber, Client, ClientId, Email};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

fn default_now() -> DateTime<Utc> {
    Utc::now()
}

/// Envelope the remote API wraps collection and single-item GET responses in.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

/// Client as returned by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPayload {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default = "default_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_now")]
    pub updated_at: DateTime<Utc>,
}

impl ClientPayload {
    /// Maps the payload into the domain aggregate. Card associations are not
    /// part of the remote client shape; they resolve through the card tier.
    #[must_use]
    pub fn into_client(self) -> Client {
        Client {
            id: Some(ClientId::from_raw(self.id)),
            name: self.name,
            username: self.username,
            email: Email::new_unchecked(self.email),
            cards: Vec::new(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Client body sent on create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientWritePayload {
    pub name: String,
    pub username: String,
    pub email: String,
}

impl From<&Client> for ClientWritePayload {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            username: client.username.clone(),
            email: client.email.as_str().to_string(),
        }
    }
}

/// Bank card as returned by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPayload {
    pub number: String,
    pub client_id: Option<i64>,
    pub expiration_date: NaiveDate,
    #[serde(default = "default_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_now")]
    pub updated_at: DateTime<Utc>,
}

impl CardPayload {
    /// Maps the payload into the domain entity.
    #[must_use]
    pub fn into_card(self) -> BankCard {
        BankCard {
            number: CardNumber::from(self.number),
            client_id: self.client_id.map(ClientId::from_raw),
            expiration_date: self.expiration_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Bank card body sent on create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardWritePayload {
    pub number: String,
    pub client_id: Option<i64>,
    pub expiration_date: NaiveDate,
}

impl From<&BankCard> for CardWritePayload {
    fn from(card: &BankCard) -> Self {
        Self {
            number: card.number.as_str().to_string(),
            client_id: card.client_id.map(ClientId::into_inner),
            expiration_date: card.expiration_date,
        }
    }
}

/// Parses a JSON response body, mapping decode failures onto the remote
/// error taxonomy.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> BancaResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| BancaError::RemoteUnavailable(format!("Malformed remote response: {}", e)))
}
