//! Dependency injection module using Shaku.
//!
//! One logical instance of each component per process, wired explicitly at
//! startup: the SQLite pool and local repositories, the remote HTTP
//! repositories, the shared caches and notification bus, and the tiered
//! services on top of them.

use banca_config::AppConfig;
use banca_core::BancaResult;
use banca_remote::{
    build_http_client, HttpRemoteBankCardRepository, HttpRemoteBankCardRepositoryParameters,
    HttpRemoteClientRepository, HttpRemoteClientRepositoryParameters,
};
use banca_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, SqliteBankCardRepository,
    SqliteClientRepository,
};
use banca_service::{
    CacheSweeper, CardCache, CardService, CardServiceImpl, CardServiceImplParameters,
    ClientCache, ClientService, ClientServiceImpl, ClientServiceImplParameters, NotificationBus,
};
use shaku::{module, HasComponent};
use std::sync::Arc;

module! {
    pub BancaModule {
        components = [
            DatabasePool,
            SqliteClientRepository,
            SqliteBankCardRepository,
            HttpRemoteClientRepository,
            HttpRemoteBankCardRepository,
            ClientServiceImpl,
            CardServiceImpl,
        ],
        providers = [],
    }
}

/// Everything the server needs at runtime: the resolved module plus the
/// shared components that outlive individual requests.
pub struct AppContext {
    pub module: Arc<BancaModule>,
    pub client_cache: Arc<ClientCache>,
    pub card_cache: Arc<CardCache>,
    pub bus: Arc<NotificationBus>,
    pub sweeper: CacheSweeper,
}

/// Builds the full component graph from configuration.
pub async fn build_app_context(config: &AppConfig) -> BancaResult<AppContext> {
    // Local store: pool + migrations
    let db_pool = DatabasePool::connect(&config.database).await?;
    DatabasePoolInterface::run_migrations(&db_pool).await?;

    // Remote store: one HTTP client shared by both repositories
    let http_client = build_http_client(&config.remote)?;
    let base_url = config.remote.base_url.trim_end_matches('/').to_string();

    // Core components shared between the module and the sweeper
    let client_cache = Arc::new(ClientCache::new(&config.cache));
    let card_cache = Arc::new(CardCache::new(&config.cache));
    let bus = Arc::new(NotificationBus::new(config.notifications.buffer_size));

    let module = BancaModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<HttpRemoteClientRepository>(
            HttpRemoteClientRepositoryParameters {
                client: http_client.clone(),
                base_url: base_url.clone(),
            },
        )
        .with_component_parameters::<HttpRemoteBankCardRepository>(
            HttpRemoteBankCardRepositoryParameters {
                client: http_client,
                base_url,
            },
        )
        .with_component_parameters::<ClientServiceImpl>(ClientServiceImplParameters {
            cache: client_cache.clone(),
            bus: bus.clone(),
        })
        .with_component_parameters::<CardServiceImpl>(CardServiceImplParameters {
            cache: card_cache.clone(),
        })
        .build();

    let mut sweeper = CacheSweeper::new(config.cache.sweep_interval());
    sweeper.register("clients", client_cache.clone());
    sweeper.register("cards", card_cache.clone());

    Ok(AppContext {
        module: Arc::new(module),
        client_cache,
        card_cache,
        bus,
        sweeper,
    })
}

/// Trait for resolving the services from the module.
pub trait ServiceResolver {
    /// Resolves the client service.
    fn client_service(&self) -> Arc<dyn ClientService>;

    /// Resolves the card service.
    fn card_service(&self) -> Arc<dyn CardService>;
}

impl ServiceResolver for BancaModule {
    fn client_service(&self) -> Arc<dyn ClientService> {
        self.resolve()
    }

    fn card_service(&self) -> Arc<dyn CardService> {
        self.resolve()
    }
}
