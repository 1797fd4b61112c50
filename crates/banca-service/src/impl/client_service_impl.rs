//! Tiered client service implementation.

use crate::cache::ClientCache;
use crate::client_service::ClientService;
use crate::dto::{ClientResponse, CreateClientRequest, ImportSummary, UpdateClientRequest};
use crate::mappers;
use crate::notification::{NotificationBus, NotificationEvent};
use crate::storage;
use banca_core::{BancaError, BancaResult, ClientId, ValidateExt};
use banca_remote::RemoteClientRepository;
use banca_repository::ClientRepository;
use async_trait::async_trait;
use shaku::Component;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client service over the three tiers.
///
/// Reads: cache, then local store, then remote store, backfilling on the
/// way out. Writes: remote store first (it owns id assignment and the
/// uniqueness constraints), then a best-effort local mirror, then the
/// cache, then one notification event.
#[derive(Component)]
#[shaku(interface = ClientService)]
pub struct ClientServiceImpl {
    #[shaku(inject)]
    local_repository: Arc<dyn ClientRepository>,
    #[shaku(inject)]
    remote_repository: Arc<dyn RemoteClientRepository>,
    cache: Arc<ClientCache>,
    bus: Arc<NotificationBus>,
}

impl ClientServiceImpl {
    /// Creates a new client service.
    #[must_use]
    pub fn new(
        local_repository: Arc<dyn ClientRepository>,
        remote_repository: Arc<dyn RemoteClientRepository>,
        cache: Arc<ClientCache>,
        bus: Arc<NotificationBus>,
    ) -> Self {
        Self {
            local_repository,
            remote_repository,
            cache,
            bus,
        }
    }

    fn log_mirror_failure(&self, id: ClientId, action: &str, err: &BancaError) {
        // non-fatal: the remote write already succeeded and the local copy
        // self-heals on the next read-through miss
        let mirror = BancaError::LocalMirrorFailed(err.to_string());
        warn!(error = %mirror, client_id = %id, "Local {} failed", action);
    }
}

#[async_trait]
impl ClientService for ClientServiceImpl {
    async fn find_all_clients(&self) -> BancaResult<Vec<ClientResponse>> {
        debug!("Finding all clients");

        let clients = self.remote_repository.get_all().await?;
        Ok(clients.into_iter().map(ClientResponse::from).collect())
    }

    async fn find_by_client_id(&self, id: ClientId) -> BancaResult<ClientResponse> {
        debug!("Finding client by id: {}", id);

        if let Some(client) = self.cache.get(&id) {
            debug!("Client {} served from cache", id);
            return Ok(ClientResponse::from(client));
        }

        match self.local_repository.find_by_id(id).await {
            Ok(Some(client)) => {
                debug!("Client {} found in local store", id);
                self.cache.insert(id, client.clone());
                return Ok(ClientResponse::from(client));
            }
            Ok(None) => {}
            // a failing local store is a miss for reads
            Err(e) => warn!(error = %e, client_id = %id, "Local store read failed"),
        }

        let client = self.remote_repository.get_by_id(id).await?;
        debug!("Client {} found in remote store", id);

        self.cache.insert(id, client.clone());
        if let Err(e) = self.local_repository.save(&client).await {
            self.log_mirror_failure(id, "backfill", &e);
        }

        Ok(ClientResponse::from(client))
    }

    async fn save_client(&self, request: CreateClientRequest) -> BancaResult<ClientResponse> {
        debug!("Saving client: {}", request.username);

        request.validate_request()?;
        let client = mappers::client_from_create(&request)?;

        // duplicate prevention consults the cache and the local store only;
        // the remote store's own constraints are the final arbiter
        if let Some(id) = client.id {
            if self.cache.get(&id).is_some() {
                return Err(BancaError::already_exists(format!(
                    "Client {} already exists in the cache",
                    id
                )));
            }
            match self.local_repository.find_by_id(id).await {
                Ok(Some(_)) => {
                    return Err(BancaError::already_exists(format!(
                        "Client {} already exists in the local store",
                        id
                    )));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, client_id = %id, "Local store read failed during duplicate check")
                }
            }
        }

        let created = self.remote_repository.create(&client).await?;
        let id = created
            .id
            .ok_or_else(|| BancaError::internal("Remote store did not assign a client id"))?;

        if let Err(e) = self.local_repository.save(&created).await {
            self.log_mirror_failure(id, "mirror", &e);
        }
        self.cache.insert(id, created.clone());
        self.bus.publish(NotificationEvent::create(created.clone()));

        info!("Client created: {}", id);
        Ok(ClientResponse::from(created))
    }

    async fn update_client(
        &self,
        id: ClientId,
        request: UpdateClientRequest,
    ) -> BancaResult<ClientResponse> {
        debug!("Updating client: {}", id);

        request.validate_request()?;
        let client = mappers::client_from_update(&request)?.with_id(id);

        // remote first: a rejected update aborts before any tier is touched
        let updated = self.remote_repository.update(id, &client).await?;

        if let Err(e) = self.local_repository.save(&updated).await {
            self.log_mirror_failure(id, "mirror", &e);
        }
        self.cache.insert(id, updated.clone());
        self.bus.publish(NotificationEvent::update(updated.clone()));

        info!("Client updated: {}", id);
        Ok(ClientResponse::from(updated))
    }

    async fn delete_client(&self, id: ClientId) -> BancaResult<()> {
        debug!("Deleting client: {}", id);

        // a NotFound here aborts the whole operation: no tier is touched
        // and no event is published
        self.remote_repository.delete(id).await?;

        if let Err(e) = self.local_repository.delete(id).await {
            self.log_mirror_failure(id, "delete", &e);
        }
        self.cache.remove(&id);
        self.bus.publish(NotificationEvent::delete());

        info!("Client deleted: {}", id);
        Ok(())
    }

    async fn import_clients_from_json(&self, path: &Path) -> BancaResult<ImportSummary> {
        info!("Importing clients from {}", path.display());

        let requests = storage::json::read_clients(path).await?;
        let mut summary = ImportSummary::default();

        for request in requests {
            let username = request.username.clone();
            match self.save_client(request).await {
                Ok(_) => summary.imported += 1,
                Err(e) => {
                    warn!(error = %e, username = %username, "Skipping client during import");
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Import finished: {} imported, {} failed",
            summary.imported, summary.failed
        );
        Ok(summary)
    }

    async fn export_clients_to_json(&self, path: &Path) -> BancaResult<usize> {
        info!("Exporting clients to {}", path.display());

        let clients = self.find_all_clients().await?;
        storage::json::write_clients(path, &clients).await?;
        Ok(clients.len())
    }
}

impl std::fmt::Debug for ClientServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientServiceImpl").finish_non_exhaustive()
    }
}
