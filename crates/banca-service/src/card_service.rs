//! Bank card service trait definition.

use crate::dto::{CardResponse, CreateCardRequest, UpdateCardRequest};
use banca_core::{BancaResult, CardNumber, ClientId, Interface};
use async_trait::async_trait;

/// Bank card service facade.
///
/// Follows the same tiered pattern as the client service, keyed by card
/// number. Card mutations do not publish notification events; the bus
/// carries client lifecycle events only.
#[async_trait]
pub trait CardService: Interface + Send + Sync {
    /// Fetches all cards from the authoritative remote store.
    async fn find_all_cards(&self) -> BancaResult<Vec<CardResponse>>;

    /// Lists the cards associated with a client.
    async fn find_cards_by_client_id(&self, id: ClientId) -> BancaResult<Vec<CardResponse>>;

    /// Resolves a card by number through the tiers.
    async fn find_card_by_number(&self, number: &CardNumber) -> BancaResult<CardResponse>;

    /// Registers a card.
    async fn save_card(&self, request: CreateCardRequest) -> BancaResult<CardResponse>;

    /// Updates a card across all tiers.
    async fn update_card(
        &self,
        number: &CardNumber,
        request: UpdateCardRequest,
    ) -> BancaResult<CardResponse>;

    /// Deletes a card from all tiers.
    async fn delete_card(&self, number: &CardNumber) -> BancaResult<()>;
}
