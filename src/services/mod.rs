//! Service layer for business logic operations.
//!
//! Services encapsulate business rules and coordinate between
//! repositories, external collaborators, and handlers.

mod place_service;
mod user_service;

pub use place_service::{PlaceDraft, PlaceService};
pub use user_service::{AuthSession, SignupData, UserService};

use std::sync::Arc;

use crate::external::Geocoder;
use crate::repositories::Repositories;
use crate::storage::FileStore;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since underlying pools and collaborators use `Arc`
/// internally.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub places: PlaceService,
}

impl Services {
    /// Creates a new Services instance from repositories and collaborators.
    pub fn new(
        repos: Repositories,
        geocoder: Arc<dyn Geocoder>,
        storage: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            users: UserService::new(repos.users.clone()),
            places: PlaceService::new(repos.places, repos.users, geocoder, storage),
        }
    }
}
