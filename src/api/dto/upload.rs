//! Multipart image upload payload.

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::{AppError, AppResult};

/// An image file extracted from a multipart request, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub content_type: String,
}

impl ImageUpload {
    /// Reads the current multipart field as an image upload.
    pub(crate) async fn from_field(field: axum::extract::multipart::Field<'_>) -> AppResult<Self> {
        let content_type = field
            .content_type()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation {
                field: "image".to_string(),
                reason: "Image field is missing a content type".to_string(),
            })?;
        let bytes = field.bytes().await?;

        Ok(Self {
            bytes,
            content_type,
        })
    }
}

/// Reads every field of a multipart request, handing text fields to
/// `on_text` and returning the single `image` file field.
///
/// Unknown fields are drained and ignored. A missing image is a
/// validation failure since both upload endpoints require one.
pub(crate) async fn read_form_fields(
    mut multipart: Multipart,
    mut on_text: impl FnMut(&str, String),
) -> AppResult<ImageUpload> {
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            image = Some(ImageUpload::from_field(field).await?);
        } else {
            on_text(&name, field.text().await?);
        }
    }

    image.ok_or_else(|| AppError::Validation {
        field: "image".to_string(),
        reason: "An image file is required".to_string(),
    })
}
