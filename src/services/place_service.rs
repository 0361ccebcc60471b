//! Place service for the place lifecycle.
//!
//! Coordinates the external geocoder, the owning user, and the
//! transactional write protocols in the repository. The ordering
//! guarantees matter: geocoding happens before anything is written, and
//! the stored image is only removed after the delete transaction commits.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::Geocoder;
use crate::models::{NewPlace, Place, UpdatePlace};
use crate::repositories::{PlaceRepository, UserRepository};
use crate::storage::{FileStore, discard_stored_file};

/// Input for creating a place. Coordinates are not part of the draft;
/// they are resolved from the address here.
#[derive(Debug, Clone)]
pub struct PlaceDraft {
    pub title: String,
    pub description: String,
    pub address: String,
    pub image: String,
}

/// Place service for handling place-related business logic.
#[derive(Clone)]
pub struct PlaceService {
    repo: PlaceRepository,
    users: UserRepository,
    geocoder: Arc<dyn Geocoder>,
    storage: Arc<dyn FileStore>,
}

impl PlaceService {
    /// Creates a new PlaceService.
    pub fn new(
        repo: PlaceRepository,
        users: UserRepository,
        geocoder: Arc<dyn Geocoder>,
        storage: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            repo,
            users,
            geocoder,
            storage,
        }
    }

    /// Gets a place by its ID.
    pub async fn get_place(&self, place_id: Uuid) -> AppResult<Place> {
        self.repo
            .find_by_id(place_id)
            .await?
            .ok_or_else(|| place_not_found(place_id))
    }

    /// Lists the places created by a user.
    ///
    /// A user with no places yields `NotFound`, matching the read API
    /// contract clients rely on.
    pub async fn list_places_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Place>> {
        let places = self.repo.find_by_creator(user_id).await?;

        if places.is_empty() {
            return Err(AppError::NotFound {
                entity: "places".to_string(),
                field: "creator".to_string(),
                value: user_id.to_string(),
            });
        }

        Ok(places)
    }

    /// Creates a place owned by `owner_id`.
    ///
    /// Order of operations:
    /// 1. Resolve coordinates; a geocoding failure aborts before any
    ///    write.
    /// 2. Check the owner exists.
    /// 3. Insert the place and the owner's back-reference in one
    ///    transaction.
    ///
    /// The image referenced by the draft was stored by the caller before
    /// this runs; on failure the caller removes it again.
    pub async fn create_place(&self, owner_id: Uuid, draft: PlaceDraft) -> AppResult<Place> {
        let location = self.geocoder.resolve(&draft.address).await?;

        self.users
            .find_by_id(owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "user".to_string(),
                field: "id".to_string(),
                value: owner_id.to_string(),
            })?;

        let place = self
            .repo
            .create_owned(NewPlace {
                title: draft.title,
                description: draft.description,
                address: draft.address,
                image: draft.image,
                lat: location.lat,
                lng: location.lng,
                creator_id: owner_id,
            })
            .await?;

        tracing::info!(place_id = %place.id, creator_id = %owner_id, "Place created");
        Ok(place)
    }

    /// Updates a place's title and description.
    ///
    /// Only the creator may modify a place; the check runs after the load
    /// so a missing place reports 404 rather than 403.
    pub async fn update_place(
        &self,
        place_id: Uuid,
        requester_id: Uuid,
        changes: UpdatePlace,
    ) -> AppResult<Place> {
        let place = self.get_place(place_id).await?;
        ensure_creator(&place, requester_id, "modify")?;

        self.repo.update_fields(place_id, changes).await
    }

    /// Deletes a place and its stored image.
    ///
    /// The record and the owner's back-reference go away atomically; the
    /// image file is removed afterwards on a best-effort basis; if that
    /// fails the place is already gone, so the failure is only logged.
    pub async fn delete_place(&self, place_id: Uuid, requester_id: Uuid) -> AppResult<()> {
        let (place, creator) = self
            .repo
            .find_with_creator(place_id)
            .await?
            .ok_or_else(|| place_not_found(place_id))?;

        ensure_creator(&place, requester_id, "delete")?;

        self.repo.delete_owned(place.id, creator.id).await?;

        discard_stored_file(self.storage.as_ref(), &place.image).await;

        tracing::info!(place_id = %place.id, creator_id = %creator.id, "Place deleted");
        Ok(())
    }
}

fn place_not_found(place_id: Uuid) -> AppError {
    AppError::NotFound {
        entity: "place".to_string(),
        field: "id".to_string(),
        value: place_id.to_string(),
    }
}

/// Rejects any requester who is not the place's creator.
fn ensure_creator(place: &Place, requester_id: Uuid, action: &str) -> AppResult<()> {
    if place.creator_id != requester_id {
        return Err(AppError::Forbidden {
            message: format!("You are not allowed to {} this place.", action),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_place(creator_id: Uuid) -> Place {
        Place {
            id: Uuid::new_v4(),
            title: "Empire State Building".to_string(),
            description: "One of the most famous sky scrapers in the world!".to_string(),
            address: "20 W 34th St, New York, NY 10001".to_string(),
            image: "uploads/images/esb.jpeg".to_string(),
            lat: 40.7484,
            lng: -73.9857,
            creator_id,
        }
    }

    #[test]
    fn the_creator_passes_the_ownership_check() {
        let creator = Uuid::new_v4();
        let place = sample_place(creator);

        assert!(ensure_creator(&place, creator, "modify").is_ok());
    }

    #[test]
    fn anyone_else_is_rejected_regardless_of_action() {
        let place = sample_place(Uuid::new_v4());
        let stranger = Uuid::new_v4();

        for action in ["modify", "delete"] {
            match ensure_creator(&place, stranger, action) {
                Err(AppError::Forbidden { message }) => {
                    assert!(message.contains(action));
                }
                other => panic!("Expected Forbidden, got {:?}", other),
            }
        }
    }
}
