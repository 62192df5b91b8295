//! # User Registry Server
//!
//! Main entry point for the user registry service.

use registry_config::ConfigLoader;
use registry_core::RegistryResult;
use registry_server::{
    startup::{init_logging, print_startup_info, shutdown_signal},
    Application,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);

    info!("Starting user registry server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: registry_config::AppConfig) -> RegistryResult<()> {
    print_startup_info(&config);

    let app = Application::build(config).await?;
    app.run(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}
