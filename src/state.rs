//! Application state for the Axum web framework.
//!
//! Contains shared services and resources that are accessible across all
//! request handlers. The signing secret and collaborators are injected
//! here once at startup; nothing reads ambient globals, so tests can
//! substitute doubles.

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::external::Geocoder;
use crate::repositories::Repositories;
use crate::services::Services;
use crate::storage::FileStore;

/// Application state containing all shared services and resources.
///
/// Designed for Axum's State extractor. Cloning is cheap since services
/// and the pool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the database connection pool
    pub db_pool: AsyncDbPool,
    /// JWT configuration for token generation and validation
    pub jwt_config: JwtConfig,
    /// Uploaded file storage, for handler-side cleanup of failed requests
    pub storage: Arc<dyn FileStore>,
}

impl AppState {
    /// Creates a new AppState from the pool, JWT config, and collaborators.
    pub fn new(
        pool: AsyncDbPool,
        jwt_config: JwtConfig,
        geocoder: Arc<dyn Geocoder>,
        storage: Arc<dyn FileStore>,
    ) -> Self {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, geocoder, storage.clone());
        Self {
            services,
            db_pool: pool,
            jwt_config,
            storage,
        }
    }
}

#[cfg(test)]
pub mod test_support {
    //! Doubles for building an `AppState` that never talks to a database
    //! or the network.

    use std::sync::Arc;

    use axum::body::Bytes;
    use diesel_async::AsyncPgConnection;
    use diesel_async::pooled_connection::AsyncDieselConnectionManager;
    use diesel_async::pooled_connection::bb8::Pool;

    use super::AppState;
    use crate::config::JwtConfig;
    use crate::error::AppResult;
    use crate::external::{Geocoder, Location};
    use crate::storage::FileStore;

    pub const TEST_SECRET: &str = "test_secret_key_at_least_32_chars!!!";

    /// Geocoder double answering every address with the same coordinates.
    pub struct FixedGeocoder;

    #[async_trait::async_trait]
    impl Geocoder for FixedGeocoder {
        async fn resolve(&self, _address: &str) -> AppResult<Location> {
            Ok(Location {
                lat: 40.7484,
                lng: -73.9857,
            })
        }
    }

    /// File store double that stores nothing and always succeeds.
    pub struct NullStore;

    #[async_trait::async_trait]
    impl FileStore for NullStore {
        async fn store(&self, _bytes: Bytes, _content_type: &str) -> AppResult<String> {
            Ok("uploads/images/null.png".to_string())
        }

        async fn delete(&self, _reference: &str) -> AppResult<()> {
            Ok(())
        }
    }

    /// An `AppState` whose pool is built without connecting; any code path
    /// that actually checks out a connection will fail, which is the point.
    pub fn app_state() -> AppState {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(
            "postgres://localhost/never_connected",
        );
        let pool = Pool::builder().build_unchecked(manager);

        AppState::new(
            pool,
            JwtConfig {
                secret: TEST_SECRET.to_string(),
                access_token_expiration: 1,
            },
            Arc::new(FixedGeocoder),
            Arc::new(NullStore),
        )
    }
}
