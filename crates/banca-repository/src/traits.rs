//! Local-store repository trait definitions.

use banca_core::{BancaResult, BankCard, CardNumber, Client, ClientId, Interface};
use async_trait::async_trait;

/// Client repository trait (local store).
#[async_trait]
pub trait ClientRepository: Interface + Send + Sync {
    /// Finds all clients.
    async fn find_all(&self) -> BancaResult<Vec<Client>>;

    /// Finds a client by ID.
    async fn find_by_id(&self, id: ClientId) -> BancaResult<Option<Client>>;

    /// Finds a client by username.
    async fn find_by_username(&self, username: &str) -> BancaResult<Option<Client>>;

    /// Checks if a username exists.
    async fn exists_by_username(&self, username: &str) -> BancaResult<bool>;

    /// Checks if an email exists.
    async fn exists_by_email(&self, email: &str) -> BancaResult<bool>;

    /// Saves a client. The client must already carry its remote-assigned id;
    /// saving is idempotent on the id so read-through backfills can repeat.
    async fn save(&self, client: &Client) -> BancaResult<Client>;

    /// Updates an existing client. Returns `None` if no client with the id
    /// exists locally.
    async fn update(&self, id: ClientId, client: &Client) -> BancaResult<Option<Client>>;

    /// Deletes a client by ID. Returns `true` if a row was removed.
    async fn delete(&self, id: ClientId) -> BancaResult<bool>;

    /// Counts all clients.
    async fn count(&self) -> BancaResult<u64>;
}

/// Bank card repository trait (local store).
#[async_trait]
pub trait BankCardRepository: Interface + Send + Sync {
    /// Finds all cards.
    async fn find_all(&self) -> BancaResult<Vec<BankCard>>;

    /// Finds a card by number.
    async fn find_by_number(&self, number: &CardNumber) -> BancaResult<Option<BankCard>>;

    /// Finds all cards associated with a client.
    async fn find_by_client_id(&self, client_id: ClientId) -> BancaResult<Vec<BankCard>>;

    /// Saves a card. Idempotent on the card number.
    async fn save(&self, card: &BankCard) -> BancaResult<BankCard>;

    /// Updates an existing card. Returns `None` if the number is unknown
    /// locally.
    async fn update(&self, number: &CardNumber, card: &BankCard) -> BancaResult<Option<BankCard>>;

    /// Deletes a card by number. Returns `true` if a row was removed.
    async fn delete(&self, number: &CardNumber) -> BancaResult<bool>;
}
