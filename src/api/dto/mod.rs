//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `user` - Signup/login requests and user responses
//! - `place` - Place requests and responses
//! - `error` - Common error response DTOs
//! - `upload` - Multipart image upload payload

mod error;
mod place;
mod upload;
mod user;

pub use error::ErrorResponse;
pub use place::{
    CreatePlaceForm, LocationResponse, PlaceEnvelope, PlaceResponse, PlacesEnvelope,
    UpdatePlaceRequest,
};
pub use upload::ImageUpload;
pub use user::{AuthResponse, LoginRequest, SignupForm, UserResponse, UsersEnvelope};

use serde::Serialize;

/// Plain `{message}` response body for operations that return no resource.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
