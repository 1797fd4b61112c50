//! Bank card DTOs.

use banca_core::validation::rules;
use banca_core::{BankCard, ClientId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a bank card.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCardRequest {
    /// Card number (primary key across all tiers).
    #[validate(custom(function = rules::card_number_format))]
    pub number: String,

    /// Owning client, if known.
    pub client_id: Option<i64>,

    /// Expiration date.
    pub expiration_date: NaiveDate,
}

/// Request to update a bank card.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCardRequest {
    /// Owning client, if any.
    pub client_id: Option<i64>,

    /// Expiration date.
    pub expiration_date: NaiveDate,
}

/// Bank card returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardResponse {
    pub number: String,
    pub client_id: Option<i64>,
    pub expiration_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BankCard> for CardResponse {
    fn from(card: BankCard) -> Self {
        Self {
            number: card.number.as_str().to_string(),
            client_id: card.client_id.map(ClientId::into_inner),
            expiration_date: card.expiration_date,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}
