//! Configuration loader with layered sources.

use crate::{AppConfig, DEFAULT_JWT_SECRET};
use config::{Config, ConfigError, Environment, File};
use registry_core::RegistryError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable prefix for overrides, e.g. `REGISTRY__CACHE__TTL_SECS`.
pub const ENV_PREFIX: &str = "REGISTRY";

/// Loads [`AppConfig`] from a configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`.
    ///
    /// Sources are applied in order, later ones overriding earlier ones:
    /// 1. `{config_dir}/default.toml`
    /// 2. `{config_dir}/{environment}.toml`
    /// 3. `{config_dir}/local.toml`
    /// 4. Environment variables with the `REGISTRY` prefix and `__` separator
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Creates a loader for `./config`.
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> Result<AppConfig, RegistryError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("REGISTRY_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();
        for name in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{name}.toml"));
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize::<AppConfig>)
            .map_err(config_error_to_registry_error)?;

        validate_config(&config)?;
        Ok(config)
    }
}

/// Rejects configurations the service cannot start with.
pub fn validate_config(config: &AppConfig) -> Result<(), RegistryError> {
    if config.app.environment == "production" && config.security.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using default JWT secret in production! This is a security risk.");
    }

    if config.database.url.is_empty() {
        return Err(RegistryError::Configuration("Database URL is required".to_string()));
    }
    config.database.backend()?;

    if config.cache.ttl_secs == 0 {
        return Err(RegistryError::Configuration(
            "Cache TTL must be greater than zero".to_string(),
        ));
    }

    if config.security.jwt_secret.is_empty() {
        return Err(RegistryError::Configuration("JWT secret is required".to_string()));
    }

    Ok(())
}

fn config_error_to_registry_error(err: ConfigError) -> RegistryError {
    RegistryError::Configuration(err.to_string())
}
