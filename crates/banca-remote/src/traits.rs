//! Remote-store repository trait definitions.

use banca_core::{BancaResult, BankCard, CardNumber, Client, ClientId, Interface};
use async_trait::async_trait;

/// Remote client repository trait (authoritative store).
#[async_trait]
pub trait RemoteClientRepository: Interface + Send + Sync {
    /// Fetches all clients.
    async fn get_all(&self) -> BancaResult<Vec<Client>>;

    /// Fetches a client by ID. Fails with `NotFound` when the remote store
    /// has no such client.
    async fn get_by_id(&self, id: ClientId) -> BancaResult<Client>;

    /// Creates a client. The returned client carries the remote-assigned id.
    async fn create(&self, client: &Client) -> BancaResult<Client>;

    /// Updates a client.
    async fn update(&self, id: ClientId, client: &Client) -> BancaResult<Client>;

    /// Deletes a client by ID. Fails with `NotFound` when absent.
    async fn delete(&self, id: ClientId) -> BancaResult<()>;
}

/// Remote bank card repository trait (authoritative store).
#[async_trait]
pub trait RemoteBankCardRepository: Interface + Send + Sync {
    /// Fetches all cards.
    async fn get_all(&self) -> BancaResult<Vec<BankCard>>;

    /// Fetches a card by number. Fails with `NotFound` when absent.
    async fn get_by_number(&self, number: &CardNumber) -> BancaResult<BankCard>;

    /// Creates a card.
    async fn create(&self, card: &BankCard) -> BancaResult<BankCard>;

    /// Updates a card.
    async fn update(&self, number: &CardNumber, card: &BankCard) -> BancaResult<BankCard>;

    /// Deletes a card by number. Fails with `NotFound` when absent.
    async fn delete(&self, number: &CardNumber) -> BancaResult<()>;
}
