//! Server module for managing HTTP server lifecycle
//!
//! Handles server initialization, startup, and graceful shutdown.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, Settings};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::external::NominatimGeocoder;
use crate::state::AppState;
use crate::storage::LocalFileStore;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal.
    ///
    /// 1. Runs pending migrations (when configured)
    /// 2. Initializes the database connection pool and collaborators
    /// 3. Creates application state and router
    /// 4. Binds to the configured address and serves with graceful shutdown
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %Environment::from_env(),
            "Application starting"
        );

        if self.settings.database.auto_migrate {
            tracing::info!("Running pending migrations...");
            run_pending_migrations(&self.settings.database.url).await?;
        }

        let pool = establish_async_connection_pool(&self.settings.database).await?;
        tracing::info!(
            max_connections = %self.settings.database.max_connections,
            "Database connection pool initialized"
        );

        let geocoder = Arc::new(NominatimGeocoder::new(&self.settings.geocoding)?);
        tracing::info!(base_url = %self.settings.geocoding.base_url, "Geocoder configured");

        let uploads_root = PathBuf::from(&self.settings.storage.root);
        let storage = Arc::new(LocalFileStore::create(uploads_root.clone()).await?);
        tracing::info!(root = %uploads_root.display(), "File storage ready");

        let state = AppState::new(pool, self.settings.jwt.clone(), geocoder, storage);
        let router = create_router(state, &uploads_root);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
