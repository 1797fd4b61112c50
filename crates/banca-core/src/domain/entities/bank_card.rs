//! Bank card entity.

use crate::{CardNumber, ClientId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Bank card entity.
///
/// The card number is the primary key across all tiers. A card may be
/// associated with a client, identified by the remote-assigned client id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankCard {
    /// Card number (primary key).
    pub number: CardNumber,

    /// Owning client, if any.
    pub client_id: Option<ClientId>,

    /// Expiration date.
    pub expiration_date: NaiveDate,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BankCard {
    /// Creates a new bank card.
    #[must_use]
    pub fn new(number: CardNumber, client_id: Option<ClientId>, expiration_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            number,
            client_id,
            expiration_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks whether the card is expired as of the given date.
    #[must_use]
    pub fn is_expired_at(&self, date: NaiveDate) -> bool {
        self.expiration_date < date
    }

    /// Re-associates the card with another client.
    pub fn assign_to(&mut self, client_id: ClientId) {
        self.client_id = Some(client_id);
        self.updated_at = Utc::now();
    }

    /// Refreshes the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
