//! Application state for Axum handlers.

use banca_service::{CardService, ClientService, NotificationBus};
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub client_service: Arc<dyn ClientService>,
    pub card_service: Arc<dyn CardService>,
    pub bus: Arc<NotificationBus>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        client_service: Arc<dyn ClientService>,
        card_service: Arc<dyn CardService>,
        bus: Arc<NotificationBus>,
    ) -> Self {
        Self {
            client_service,
            card_service,
            bus,
        }
    }

    /// Creates application state by resolving services from a Shaku module.
    ///
    /// The bus is passed separately: it is shared with the services at
    /// wiring time rather than owned by the module.
    pub fn from_module<M>(module: &M, bus: Arc<NotificationBus>) -> Self
    where
        M: Module + HasComponent<dyn ClientService> + HasComponent<dyn CardService>,
    {
        Self {
            client_service: module.resolve(),
            card_service: module.resolve(),
            bus,
        }
    }
}
