//! Application state for Axum handlers.

use registry_repository::UserStore;
use registry_security::TokenProvider;
use registry_service::UserGateway;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn UserGateway>,
    pub token_provider: Arc<TokenProvider>,
    /// Primary store, used by the readiness probe.
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        gateway: Arc<dyn UserGateway>,
        token_provider: Arc<TokenProvider>,
        store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            gateway,
            token_provider,
            store,
        }
    }
}
