//! Router configuration for the API.
//!
//! Centralized route registration and middleware configuration.

use std::path::Path;

use axum::{Json, Router, http::StatusCode, middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::dto::ErrorResponse;
use crate::api::handlers;
use crate::api::middleware::request_trace_middleware;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Routes
/// - `/api/users`  - listing, signup, login
/// - `/api/places` - place CRUD (mutations behind the auth gate)
/// - `/health`     - probes
/// - `/uploads/images` - stored image files, served statically
///
/// `uploads_root` is the directory image references point into; it is
/// served under the same relative path clients find in those references.
pub fn create_router(state: AppState, uploads_root: &Path) -> Router {
    let api_routes = Router::new()
        .nest("/users", handlers::users::user_routes())
        .nest("/places", handlers::places::place_routes(state.clone()));

    Router::new()
        .nest("/api", api_routes)
        .merge(handlers::health::health_routes())
        .nest_service("/uploads/images", ServeDir::new(uploads_root))
        .fallback(route_not_found)
        // Middleware is applied in reverse order - last added runs first,
        // so tracing wraps CORS handling as well
        .layer(cors_layer())
        .layer(middleware::from_fn(request_trace_middleware))
        .with_state(state)
}

/// Permissive CORS: any origin, the headers browsers actually send, and
/// exactly the methods the API answers.
fn cors_layer() -> CorsLayer {
    use axum::http::Method;
    use axum::http::header;

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// JSON 404 for anything outside the registered routes.
async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("NOT_FOUND", "Route not found.")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use crate::state::test_support::app_state;

    #[tokio::test]
    async fn unknown_routes_get_a_json_404() {
        let (status, Json(body)) = route_not_found().await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Route not found.");
    }

    #[tokio::test]
    async fn router_assembles_without_route_conflicts() {
        // Route conflicts (duplicate paths, bad nesting) panic when the
        // router is built, so constructing and exercising it is the test.
        let router = create_router(app_state(), Path::new("uploads/images"));

        let response = router
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unmatched_api_paths_fall_through_to_the_json_404() {
        let router = create_router(app_state(), Path::new("uploads/images"));

        let response = router
            .oneshot(
                Request::get("/api/users/no-such-route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
