use axum_helpers::server::{create_app, health_router};
use core_config::storage::StorageBackend;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::{CsvUserRepository, InMemoryUserRepository, UserService};
use tracing::{info, warn};

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    let api_routes = match config.storage.backend {
        StorageBackend::Csv => {
            info!("Opening user store at {}", config.storage.csv_path.display());
            let repository = CsvUserRepository::open(&config.storage.csv_path)
                .await
                .map_err(|e| eyre::eyre!("Failed to open user store: {}", e))?;
            api::routes(UserService::new(repository))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory user store; records are lost on shutdown");
            api::routes(UserService::new(InMemoryUserRepository::new()))
        }
    };

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes);

    // Merge health endpoints
    let app = router.merge(health_router(config.app));

    create_app(app, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Layers API shutdown complete");
    Ok(())
}
