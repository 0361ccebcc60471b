//! Place request handlers.
//!
//! The mutating routes sit behind the authentication gate; the handler
//! bodies receive the proven identity via `Extension<AuthUser>` and leave
//! ownership checks to the service layer.

use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::api::dto::{
    CreatePlaceForm, MessageResponse, PlaceEnvelope, PlaceResponse, PlacesEnvelope,
    UpdatePlaceRequest,
};
use crate::api::middleware::{AuthUser, auth_middleware};
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::discard_stored_file;
use crate::utils::validate::ValidatedJson;

/// Creates place-related routes.
///
/// Read routes are public; create/update/delete require a valid token.
/// The auth gate is layered onto the mutating method routers only, so a
/// GET for the same path never touches it.
pub fn place_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_place).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/{pid}",
            get(get_place).merge(
                patch(update_place)
                    .delete(delete_place)
                    .layer(middleware::from_fn_with_state(state, auth_middleware)),
            ),
        )
        .route("/user/{uid}", get(get_places_by_user))
}

/// GET /api/places/:pid - Get a place by ID
async fn get_place(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<PlaceEnvelope>, AppError> {
    let place = state.services.places.get_place(pid).await?;

    Ok(Json(PlaceEnvelope {
        place: PlaceResponse::from(place),
    }))
}

/// GET /api/places/user/:uid - List a user's places
///
/// 404s when the user has no places, matching what clients expect from
/// the listing contract.
async fn get_places_by_user(
    State(state): State<AppState>,
    Path(uid): Path<Uuid>,
) -> Result<Json<PlacesEnvelope>, AppError> {
    let places = state.services.places.list_places_by_creator(uid).await?;

    Ok(Json(PlacesEnvelope {
        places: places.into_iter().map(PlaceResponse::from).collect(),
    }))
}

/// POST /api/places - Create a place
///
/// Multipart body: `title`, `description`, `address` text fields plus an
/// `image` file. The upload is stored first; when geocoding, the owner
/// lookup, or the transactional write fails afterwards, the stored file is
/// removed again on a best-effort basis so failed requests do not leak
/// uploads.
async fn create_place(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PlaceEnvelope>), AppError> {
    let (form, image) = CreatePlaceForm::from_multipart(multipart).await?;

    let image_ref = state.storage.store(image.bytes, &image.content_type).await?;

    let result = state
        .services
        .places
        .create_place(auth.user_id, form.into_draft(image_ref.clone()))
        .await;

    match result {
        Ok(place) => Ok((
            StatusCode::CREATED,
            Json(PlaceEnvelope {
                place: PlaceResponse::from(place),
            }),
        )),
        Err(error) => {
            discard_stored_file(state.storage.as_ref(), &image_ref).await;
            Err(error)
        }
    }
}

/// PATCH /api/places/:pid - Update a place's title and description
async fn update_place(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(pid): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePlaceRequest>,
) -> Result<Json<PlaceEnvelope>, AppError> {
    let place = state
        .services
        .places
        .update_place(pid, auth.user_id, payload.into_changes())
        .await?;

    Ok(Json(PlaceEnvelope {
        place: PlaceResponse::from(place),
    }))
}

/// DELETE /api/places/:pid - Delete a place
async fn delete_place(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(pid): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.services.places.delete_place(pid, auth.user_id).await?;

    Ok(Json(MessageResponse::new("Place deleted.")))
}
