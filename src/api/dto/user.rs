//! User-related DTOs for API requests and responses.

use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::upload::{ImageUpload, read_form_fields};
use crate::error::AppResult;
use crate::models::User;
use crate::services::SignupData;

// ============================================================================
// Request DTOs
// ============================================================================

/// Signup form fields, extracted from a multipart request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl SignupForm {
    /// Extracts and validates the signup form plus its image file.
    pub async fn from_multipart(multipart: Multipart) -> AppResult<(Self, ImageUpload)> {
        let mut form = Self::default();

        let image = read_form_fields(multipart, |name, value| match name {
            "name" => form.name = value,
            "email" => form.email = value,
            "password" => form.password = value,
            _ => {}
        })
        .await?;

        form.validate()?;
        Ok((form, image))
    }

    /// Combines the validated form with a stored image reference.
    pub fn into_signup_data(self, image: String) -> SignupData {
        SignupData {
            name: self.name,
            email: self.email,
            password: self.password,
            image,
        }
    }
}

/// Login request payload.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for signup and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

impl From<crate::services::AuthSession> for AuthResponse {
    fn from(session: crate::services::AuthSession) -> Self {
        Self {
            user_id: session.user_id,
            email: session.email,
            token: session.token,
        }
    }
}

/// Public representation of a user. The credential hash is not part of
/// this type, so it cannot serialize no matter what.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub places: Vec<Uuid>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            places: user.place_ids,
        }
    }
}

/// `{users: [...]}` envelope for the user listing.
#[derive(Debug, Serialize)]
pub struct UsersEnvelope {
    pub users: Vec<UserResponse>,
}
