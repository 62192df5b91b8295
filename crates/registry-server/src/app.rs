//! Application wiring.

use axum::Router;
use registry_config::{AppConfig, StoreBackend};
use registry_core::{RegistryError, RegistryResult};
use registry_repository::{DatabasePool, InMemoryUserStore, MySqlUserStore, UserStore};
use registry_rest::{create_router, AppState};
use registry_security::TokenProvider;
use registry_service::{
    create_pool, CacheInterface, InMemoryCache, LookupCache, RedisCacheService, UserGatewayImpl,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// A fully wired registry application.
pub struct Application {
    config: AppConfig,
    router: Router,
    db_pool: Option<Arc<DatabasePool>>,
}

impl Application {
    /// Builds every component from configuration.
    ///
    /// Nothing connects yet: the database pool and the Redis pool are both
    /// established on first use.
    pub async fn build(config: AppConfig) -> RegistryResult<Self> {
        let (store, db_pool) = build_store(&config)?;

        if config.database.run_migrations {
            store.ensure_indexes().await?;
        }

        let cache = LookupCache::new(build_cache(&config)?, config.cache.ttl());
        let gateway = Arc::new(UserGatewayImpl::new(Arc::clone(&store), cache));
        let token_provider = Arc::new(TokenProvider::new(
            config.app.name.clone(),
            Arc::new(config.security.clone()),
        ));

        let state = AppState::new(gateway, token_provider, store);
        let router = create_router(state, &config.server);

        Ok(Self {
            config,
            router,
            db_pool,
        })
    }

    /// Returns the HTTP router.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serves HTTP until `shutdown` resolves, then closes the database pool.
    pub async fn run<F>(self, shutdown: F) -> RegistryResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| RegistryError::Internal(format!("Failed to bind {addr}: {e}")))?;
        info!("Starting REST server on http://{}", addr);

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RegistryError::Internal(format!("REST server error: {e}")));

        if let Some(pool) = self.db_pool {
            pool.close().await;
        }
        served
    }
}

fn build_store(
    config: &AppConfig,
) -> RegistryResult<(Arc<dyn UserStore>, Option<Arc<DatabasePool>>)> {
    match config.database.backend()? {
        StoreBackend::MySql(_) => {
            let pool = Arc::new(DatabasePool::new(config.database.clone()));
            let store: Arc<dyn UserStore> = Arc::new(MySqlUserStore::new(Arc::clone(&pool)));
            Ok((store, Some(pool)))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory user store; records are lost on exit");
            Ok((Arc::new(InMemoryUserStore::new()), None))
        }
    }
}

fn build_cache(config: &AppConfig) -> RegistryResult<Arc<dyn CacheInterface>> {
    if config.redis.enabled {
        let pool = create_pool(&config.redis)?;
        info!("Lookup cache backed by Redis");
        Ok(Arc::new(RedisCacheService::new(Arc::new(pool))))
    } else {
        info!("Lookup cache held in process memory");
        Ok(Arc::new(InMemoryCache::new()))
    }
}
