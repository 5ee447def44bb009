// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login and caller identity.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::{Auth, AuthError, AuthenticatedUser},
    models::{Credentials, TokenResponse},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/user/register",
    request_body = Credentials,
    tag = "Users",
    responses(
        (status = 201, description = "User created", body = TokenResponse),
        (status = 409, description = "Login already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    let token = state
        .auth
        .register_user(&credentials.login, &credentials.password)
        .await?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

#[utoipa::path(
    post,
    path = "/v1/user/login",
    request_body = Credentials,
    tag = "Users",
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Unknown login or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = state
        .auth
        .login_user(&credentials.login, &credentials.password)
        .await
        .inspect_err(|e| {
            tracing::warn!(login = %credentials.login, reason = e.error_code(), "login rejected")
        })?;
    Ok(Json(TokenResponse { token }))
}

/// Identity carried by the caller's token.
#[utoipa::path(
    get,
    path = "/v1/user/me",
    tag = "Users",
    security(("token" = [])),
    responses(
        (status = 200, body = AuthenticatedUser),
        (status = 412, description = "Missing token"),
        (status = 409, description = "Invalid or expired token")
    )
)]
pub async fn me(Auth(user): Auth) -> Json<AuthenticatedUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    fn credentials(login: &str, password: &str) -> Json<Credentials> {
        Json(Credentials {
            login: login.into(),
            password: password.into(),
        })
    }

    #[tokio::test]
    async fn register_returns_created_token() {
        let state = AppState::in_memory();

        let (status, Json(body)) = register(State(state.clone()), credentials("alice", "pw1"))
            .await
            .expect("registration succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(state.auth.parse_token(&body.token).unwrap(), UserId(1));
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let state = AppState::in_memory();
        register(State(state.clone()), credentials("alice", "pw1"))
            .await
            .unwrap();

        let err = register(State(state), credentials("alice", "pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::LoginConflict));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_returns_token_for_same_user() {
        let state = AppState::in_memory();
        register(State(state.clone()), credentials("alice", "pw1"))
            .await
            .unwrap();

        let Json(body) = login(State(state.clone()), credentials("alice", "pw1"))
            .await
            .unwrap();
        assert_eq!(state.auth.parse_token(&body.token).unwrap(), UserId(1));
    }

    #[tokio::test]
    async fn login_failures_are_unauthorized() {
        let state = AppState::in_memory();
        register(State(state.clone()), credentials("alice", "pw1"))
            .await
            .unwrap();

        let wrong = login(State(state.clone()), credentials("alice", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, AuthError::PasswordMismatch));
        assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

        let unknown = login(State(state), credentials("bob", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(unknown, AuthError::LoginNotFound(_)));
        assert_eq!(unknown.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_echoes_injected_identity() {
        let user = AuthenticatedUser {
            user_id: UserId(9),
        };
        let Json(body) = me(Auth(user)).await;
        assert_eq!(body, user);
    }
}
