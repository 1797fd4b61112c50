//! Client DTOs.

use banca_core::{Client, ClientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a client.
///
/// The id is optional: bulk imports and re-registrations carry a known id,
/// ordinary creations leave it empty and receive one from the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClientRequest {
    /// Known client id, if any.
    pub id: Option<i64>,

    /// Display name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    /// Unique username.
    #[validate(length(min = 3, max = 32))]
    pub username: String,

    /// Email address.
    #[validate(email)]
    pub email: String,
}

/// Request to update a client's profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateClientRequest {
    /// Display name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    /// Unique username.
    #[validate(length(min = 3, max = 32))]
    pub username: String,

    /// Email address.
    #[validate(email)]
    pub email: String,
}

/// Client returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientResponse {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub cards: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id.map(ClientId::into_inner).unwrap_or_default(),
            name: client.name,
            username: client.username,
            email: client.email.as_str().to_string(),
            cards: client
                .cards
                .into_iter()
                .map(|number| number.as_str().to_string())
                .collect(),
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Clients created through the normal save path.
    pub imported: usize,
    /// Clients skipped because validation or a tier rejected them.
    pub failed: usize,
}
