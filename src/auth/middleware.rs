// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity middleware.
//!
//! Applied to the whole router. Every request outside the public surface
//! must carry a session token in the `token` header; the middleware verifies
//! it and inserts an [`AuthenticatedUser`] into the request extensions before
//! the handler runs. Rejected requests never reach a handler.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .nest("/v1", routes)
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), identity_middleware))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Request header carrying the session token.
pub const TOKEN_HEADER: &str = "token";

/// Routes reachable without a token.
const PUBLIC_ROUTES: &[&str] = &["/v1/user/register", "/v1/user/login"];

/// Route prefixes reachable without a token (the prefix itself and anything
/// below it).
const PUBLIC_PREFIXES: &[&str] = &["/health", "/docs", "/api-doc"];

/// Whether `path` belongs to the unauthenticated surface.
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_ROUTES.contains(&path)
        || PUBLIC_PREFIXES.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
}

/// Establish the caller's identity or reject the request.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());

    let Some(token) = token else {
        tracing::warn!(path = %request.uri().path(), "request without token rejected");
        return AuthError::MissingToken.into_response();
    };

    match state.auth.parse_token(token) {
        Ok(user_id) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser { user_id });
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(
                path = %request.uri().path(),
                reason = e.error_code(),
                "token rejected"
            );
            AuthError::IdentityRejected.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Json, Router,
    };
    use chrono::Duration;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::Auth;
    use crate::models::UserId;

    fn app(state: AppState, reached: Arc<AtomicBool>) -> Router {
        let handler = move |Auth(user): Auth| {
            let reached = reached.clone();
            async move {
                reached.store(true, Ordering::SeqCst);
                Json(user.user_id)
            }
        };
        Router::new()
            .route("/v1/pairs", get(handler))
            .route("/health", get(|| async { "ok" }))
            .layer(from_fn_with_state(state.clone(), identity_middleware))
            .with_state(state)
    }

    async fn call(app: Router, token: Option<&str>, path: &str) -> (StatusCode, String) {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn public_surface() {
        assert!(is_public_path("/v1/user/register"));
        assert!(is_public_path("/v1/user/login"));
        assert!(is_public_path("/health"));
        assert!(is_public_path("/health/ready"));
        assert!(is_public_path("/docs/index.html"));
        assert!(is_public_path("/api-doc/openapi.json"));

        assert!(!is_public_path("/v1/user/me"));
        assert!(!is_public_path("/v1/pairs"));
        assert!(!is_public_path("/healthz"));
        assert!(!is_public_path("/v1/user/login/extra"));
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() {
        let state = AppState::in_memory();
        let token = state.auth.register_user("alice", "pw1").await.unwrap();
        let reached = Arc::new(AtomicBool::new(false));

        let (status, body) = call(app(state, reached.clone()), Some(&token), "/v1/pairs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "1");
        assert!(reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn missing_token_is_rejected_before_handler() {
        let reached = Arc::new(AtomicBool::new(false));

        let (status, body) = call(app(AppState::in_memory(), reached.clone()), None, "/v1/pairs").await;
        assert_eq!(status, StatusCode::PRECONDITION_FAILED);
        assert!(body.contains("missing_token"));
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_token_counts_as_missing() {
        let reached = Arc::new(AtomicBool::new(false));

        let (status, _) = call(app(AppState::in_memory(), reached.clone()), Some(""), "/v1/pairs").await;
        assert_eq!(status, StatusCode::PRECONDITION_FAILED);
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_before_handler() {
        let reached = Arc::new(AtomicBool::new(false));

        let (status, body) = call(
            app(AppState::in_memory(), reached.clone()),
            Some("garbage"),
            "/v1/pairs",
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.contains("identity_rejected"));
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let state = AppState::in_memory();
        let token = state
            .auth
            .tokens()
            .create(UserId(1), Duration::seconds(-1))
            .unwrap();
        let reached = Arc::new(AtomicBool::new(false));

        let (status, _) = call(app(state, reached.clone()), Some(&token), "/v1/pairs").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn public_routes_need_no_token() {
        let reached = Arc::new(AtomicBool::new(false));

        let (status, body) = call(app(AppState::in_memory(), reached), None, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
