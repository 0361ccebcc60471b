//! Repository layer for data access operations.
//!
//! Repositories own persistence and storage-level invariant enforcement
//! for one entity family each. The cross-entity write protocols (a place
//! and its owner's back-reference list) live in `PlaceRepository`.

mod place_repo;
mod user_repo;

pub use place_repo::PlaceRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub places: PlaceRepository,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            places: PlaceRepository::new(pool),
        }
    }
}
