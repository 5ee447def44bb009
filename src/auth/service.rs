// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login and token parsing.
//!
//! [`AuthService`] owns everything needed to turn credentials into a session
//! token and back: the password hasher, the token maker, the session TTL and
//! a handle to the user repository. All of it is fixed at construction.

use std::sync::Arc;

use chrono::Duration;

use super::error::{AuthError, LookupFailure};
use super::password::PasswordHasher;
use super::token::TokenMaker;
use crate::models::UserId;
use crate::storage::UserRepository;

/// Session TTL used when none is configured (12 hours).
pub const DEFAULT_SESSION_TTL: Duration = Duration::hours(12);

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: Arc<TokenMaker>,
    session_ttl: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher)
            .field("session_ttl", &self.session_ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        tokens: TokenMaker,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens: Arc::new(tokens),
            session_ttl,
        }
    }

    #[cfg(test)]
    pub(crate) fn tokens(&self) -> &TokenMaker {
        &self.tokens
    }

    /// Register a new user and issue a session token.
    ///
    /// # Errors
    /// - `LoginConflict` if the login is already taken
    /// - `Hashing` / `TokenCrypto` if hashing or minting fails
    /// - `InternalStorage` for any other repository failure
    pub async fn register_user(&self, login: &str, password: &str) -> Result<String, AuthError> {
        let hash = self.hash_password(password).await?;

        let user_id = self.users.create_user(login, &hash).await.map_err(|e| {
            if e.is_conflict() {
                AuthError::LoginConflict
            } else {
                AuthError::InternalStorage(e.to_string())
            }
        })?;

        let token = self.tokens.create(user_id, self.session_ttl)?;
        tracing::info!(%user_id, login, "user registered");
        Ok(token)
    }

    /// Log in an existing user and issue a session token.
    ///
    /// Any failure to load the user is reported as `LoginNotFound`; the
    /// attached [`LookupFailure`] says whether the login was absent or the
    /// repository failed.
    pub async fn login_user(&self, login: &str, password: &str) -> Result<String, AuthError> {
        let user = self.users.get_user(login).await.map_err(|e| {
            let failure = if e.is_not_found() {
                LookupFailure::Absent
            } else {
                tracing::error!(error = %e, "user lookup failed during login");
                LookupFailure::Storage(e.to_string())
            };
            AuthError::LoginNotFound(failure)
        })?;

        self.check_password(password, user.password_hash).await?;

        let token = self.tokens.create(user.id, self.session_ttl)?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Verify a token and return the user id it carries.
    pub fn parse_token(&self, token: &str) -> Result<UserId, AuthError> {
        let payload = self.tokens.verify(token)?;
        Ok(payload.user_id)
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))??;
        Ok(hash)
    }

    async fn check_password(&self, password: &str, hash: String) -> Result<(), AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.check(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(AuthError::from)
    }
}

#[cfg(test)]
pub(crate) fn test_service(users: Arc<dyn UserRepository>) -> AuthService {
    let tokens = TokenMaker::new(&[7u8; super::token::KEY_SIZE]).expect("valid key");
    AuthService::new(
        users,
        super::password::fast_hasher(),
        tokens,
        DEFAULT_SESSION_TTL,
    )
}
