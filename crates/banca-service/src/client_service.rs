//! Client service trait definition.

use crate::dto::{ClientResponse, CreateClientRequest, ImportSummary, UpdateClientRequest};
use banca_core::{BancaResult, ClientId, Interface};
use async_trait::async_trait;
use std::path::Path;

/// Client service facade.
///
/// Reads resolve through the tiers cheapest-first (cache, local store,
/// remote store) and backfill every tier they bypassed. Writes go to the
/// authoritative remote store first, then mirror into the local store and
/// the cache, then publish exactly one lifecycle event.
#[async_trait]
pub trait ClientService: Interface + Send + Sync {
    /// Fetches all clients from the authoritative remote store.
    async fn find_all_clients(&self) -> BancaResult<Vec<ClientResponse>>;

    /// Resolves a client by id through the tiers.
    async fn find_by_client_id(&self, id: ClientId) -> BancaResult<ClientResponse>;

    /// Creates a client. The remote store assigns the id.
    async fn save_client(&self, request: CreateClientRequest) -> BancaResult<ClientResponse>;

    /// Updates a client across all tiers.
    async fn update_client(
        &self,
        id: ClientId,
        request: UpdateClientRequest,
    ) -> BancaResult<ClientResponse>;

    /// Deletes a client from all tiers.
    async fn delete_client(&self, id: ClientId) -> BancaResult<()>;

    /// Imports clients from a JSON file, saving each through the normal
    /// create path. Failures are skipped and counted, not fatal.
    async fn import_clients_from_json(&self, path: &Path) -> BancaResult<ImportSummary>;

    /// Exports all clients (as seen by the remote store) to a JSON file.
    async fn export_clients_to_json(&self, path: &Path) -> BancaResult<usize>;
}
