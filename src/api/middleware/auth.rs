//! JWT authentication middleware.
//!
//! The gate for every mutating route: extracts the bearer token, verifies
//! it, and attaches the proven identity to the request. All failure modes
//! (missing header, malformed header, bad signature, expired token)
//! produce the identical response on purpose, so callers learn nothing
//! about which part of their credential was wrong.

use axum::{
    extract::{Request, State},
    http::{Method, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Authenticated identity attached to request extensions after a
/// successful token check. Handlers extract it with `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from JWT claims
    pub user_id: Uuid,
    /// User email from JWT claims
    pub email: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
        })
    }
}

/// The one response every failed authentication gets.
fn authentication_failed() -> AppError {
    AppError::Unauthorized {
        message: "Authentication failed.".to_string(),
    }
}

/// JWT authentication middleware.
///
/// Expects `Authorization: Bearer <token>`. Pre-flight OPTIONS requests
/// pass through untouched: they carry no credentials by protocol design
/// and must reach the CORS layer.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(authentication_failed)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(authentication_failed)?;

    let claims = validate_access_token(token, &state.jwt_config.secret).map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        authentication_failed()
    })?;

    let auth_user = AuthUser::try_from(claims).map_err(|_| authentication_failed())?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::post,
    };
    use tower::ServiceExt;

    use crate::state::test_support::{TEST_SECRET, app_state};
    use crate::utils::jwt::generate_access_token;

    fn guarded_router() -> Router {
        let state = app_state();

        async fn echo_identity(Extension(auth): Extension<AuthUser>) -> String {
            auth.user_id.to_string()
        }

        Router::new()
            .route("/guarded", post(echo_identity))
            .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_rejected_with_the_uniform_message() {
        let response = guarded_router()
            .oneshot(
                HttpRequest::post("/guarded")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("Authentication failed."));
    }

    #[tokio::test]
    async fn malformed_header_gets_the_same_response_as_a_missing_one() {
        let response = guarded_router()
            .oneshot(
                HttpRequest::post("/guarded")
                    .header("authorization", "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("Authentication failed."));
    }

    #[tokio::test]
    async fn tampered_token_gets_the_same_response() {
        let token =
            generate_access_token(Uuid::new_v4(), "max@test.com".to_string(), TEST_SECRET, 1)
                .unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        let response = guarded_router()
            .oneshot(
                HttpRequest::post("/guarded")
                    .header("authorization", format!("Bearer {}", tampered))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("Authentication failed."));
    }

    #[tokio::test]
    async fn valid_token_reaches_the_handler_with_its_identity() {
        let user_id = Uuid::new_v4();
        let token =
            generate_access_token(user_id, "max@test.com".to_string(), TEST_SECRET, 1).unwrap();

        let response = guarded_router()
            .oneshot(
                HttpRequest::post("/guarded")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, user_id.to_string());
    }

    #[tokio::test]
    async fn options_requests_bypass_the_gate() {
        let response = guarded_router()
            .oneshot(
                HttpRequest::builder()
                    .method(Method::OPTIONS)
                    .uri("/guarded")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // No 401: the request went through the gate to the router, which
        // answers OPTIONS itself since the route only declares POST.
        assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
