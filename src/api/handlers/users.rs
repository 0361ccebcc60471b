//! User request handlers: listing, signup, and login.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::api::dto::{AuthResponse, LoginRequest, SignupForm, UserResponse, UsersEnvelope};
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::discard_stored_file;
use crate::utils::validate::ValidatedJson;

/// Creates user-related routes.
///
/// Routes:
/// - GET  /        - List all users
/// - POST /signup  - Register a new user (multipart, with image)
/// - POST /login   - Authenticate an existing user
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/signup", post(sign_up))
        .route("/login", post(login))
}

/// GET /api/users - List all users
///
/// Returns every user without their credential hash.
async fn list_users(State(state): State<AppState>) -> Result<Json<UsersEnvelope>, AppError> {
    let users = state.services.users.list_users().await?;

    Ok(Json(UsersEnvelope {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/users/signup - Register a new user
///
/// Multipart body: `name`, `email`, `password` text fields plus an `image`
/// file. The image is written to storage before the database is touched;
/// if anything after that fails, the orphaned upload is removed again on a
/// best-effort basis.
async fn sign_up(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (form, image) = SignupForm::from_multipart(multipart).await?;

    let image_ref = state.storage.store(image.bytes, &image.content_type).await?;

    let result = state
        .services
        .users
        .sign_up(form.into_signup_data(image_ref.clone()), &state.jwt_config)
        .await;

    match result {
        Ok(session) => Ok((StatusCode::CREATED, Json(AuthResponse::from(session)))),
        Err(error) => {
            discard_stored_file(state.storage.as_ref(), &image_ref).await;
            Err(error)
        }
    }
}

/// POST /api/users/login - Authenticate a user
///
/// Returns the same identity/token payload as signup. Unknown email and
/// wrong password are indistinguishable in the response.
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state
        .services
        .users
        .authenticate(&payload.email, &payload.password, &state.jwt_config)
        .await?;

    Ok(Json(AuthResponse::from(session)))
}
