//! Place-related DTOs for API requests and responses.

use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::upload::{ImageUpload, read_form_fields};
use crate::error::AppResult;
use crate::models::{Place, UpdatePlace};
use crate::services::PlaceDraft;

// ============================================================================
// Request DTOs
// ============================================================================

/// Create-place form fields, extracted from a multipart request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreatePlaceForm {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 5, message = "Description must be at least 5 characters"))]
    pub description: String,
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: String,
}

impl CreatePlaceForm {
    /// Extracts and validates the create-place form plus its image file.
    pub async fn from_multipart(multipart: Multipart) -> AppResult<(Self, ImageUpload)> {
        let mut form = Self::default();

        let image = read_form_fields(multipart, |name, value| match name {
            "title" => form.title = value,
            "description" => form.description = value,
            "address" => form.address = value,
            _ => {}
        })
        .await?;

        form.validate()?;
        Ok((form, image))
    }

    /// Combines the validated form with a stored image reference.
    pub fn into_draft(self, image: String) -> PlaceDraft {
        PlaceDraft {
            title: self.title,
            description: self.description,
            address: self.address,
            image,
        }
    }
}

/// Request body for updating a place. Only title and description are
/// mutable, and both must be supplied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlaceRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 5, message = "Description must be at least 5 characters"))]
    pub description: String,
}

impl UpdatePlaceRequest {
    /// Converts the request into a changeset for the update.
    pub fn into_changes(self) -> UpdatePlace {
        UpdatePlace {
            title: Some(self.title),
            description: Some(self.description),
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Coordinate pair in responses.
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub lat: f64,
    pub lng: f64,
}

/// Public representation of a place.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub image: String,
    pub location: LocationResponse,
    pub creator: Uuid,
}

impl From<Place> for PlaceResponse {
    fn from(place: Place) -> Self {
        Self {
            id: place.id,
            title: place.title,
            description: place.description,
            address: place.address,
            image: place.image,
            location: LocationResponse {
                lat: place.lat,
                lng: place.lng,
            },
            creator: place.creator_id,
        }
    }
}

/// `{place: {...}}` envelope for single-place responses.
#[derive(Debug, Serialize)]
pub struct PlaceEnvelope {
    pub place: PlaceResponse,
}

/// `{places: [...]}` envelope for place listings.
#[derive(Debug, Serialize)]
pub struct PlacesEnvelope {
    pub places: Vec<PlaceResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_description_fails_validation() {
        let form = CreatePlaceForm {
            title: "Empire State Building".to_string(),
            description: "tall".to_string(),
            address: "20 W 34th St, New York".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn empty_address_fails_validation() {
        let form = CreatePlaceForm {
            title: "Empire State Building".to_string(),
            description: "One of the most famous sky scrapers".to_string(),
            address: String::new(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn update_request_maps_into_a_full_changeset() {
        let request = UpdatePlaceRequest {
            title: "New title".to_string(),
            description: "New description".to_string(),
        };

        let changes = request.into_changes();
        assert_eq!(changes.title.as_deref(), Some("New title"));
        assert_eq!(changes.description.as_deref(), Some("New description"));
    }

    #[test]
    fn place_response_nests_the_location() {
        let place = Place {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "descr".to_string(),
            address: "a".to_string(),
            image: "uploads/images/x.png".to_string(),
            lat: 1.5,
            lng: -2.5,
            creator_id: Uuid::new_v4(),
        };

        let json = serde_json::to_value(PlaceResponse::from(place)).unwrap();
        assert_eq!(json["location"]["lat"], 1.5);
        assert_eq!(json["location"]["lng"], -2.5);
        assert!(json.get("creator").is_some());
    }
}
