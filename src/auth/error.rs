// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::password::PasswordError;
use super::token::TokenError;

/// Why a login lookup failed.
///
/// Both causes surface to the client as the same `LoginNotFound` error;
/// the distinction is kept for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// No user with that login
    Absent,
    /// The repository failed before it could answer
    Storage(String),
}

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration against an existing login
    #[error("login already exists")]
    LoginConflict,

    /// Login lookup failed (absent login or repository fault)
    #[error("login not found")]
    LoginNotFound(LookupFailure),

    /// Login exists but the password does not match
    #[error("password mismatch")]
    PasswordMismatch,

    /// Token failed decryption or authentication
    #[error("token is invalid")]
    InvalidToken,

    /// Token is authentic but past its expiry
    #[error("token has expired")]
    ExpiredToken,

    /// No token supplied on a protected call
    #[error("missing token")]
    MissingToken,

    /// Token supplied on a protected call but it failed verification
    #[error("user identity error")]
    IdentityRejected,

    /// Opaque repository failure
    #[error("storage failure: {0}")]
    InternalStorage(String),

    /// Password hashing failed
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Token could not be minted
    #[error("token encryption failed: {0}")]
    TokenCrypto(String),

    /// A protected handler ran without an injected identity
    #[error("authenticated identity missing from request")]
    MissingIdentity,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::LoginConflict => "login_conflict",
            AuthError::LoginNotFound(_) => "login_not_found",
            AuthError::PasswordMismatch => "password_mismatch",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::MissingToken => "missing_token",
            AuthError::IdentityRejected => "identity_rejected",
            AuthError::InternalStorage(_)
            | AuthError::Hashing(_)
            | AuthError::TokenCrypto(_)
            | AuthError::MissingIdentity => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// `MissingToken` is a failed precondition and `IdentityRejected` an
    /// aborted call; 409 is the HTTP rendition of an aborted call.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::LoginConflict | AuthError::IdentityRejected => StatusCode::CONFLICT,
            AuthError::LoginNotFound(_)
            | AuthError::PasswordMismatch
            | AuthError::InvalidToken
            | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::PRECONDITION_FAILED,
            AuthError::InternalStorage(_)
            | AuthError::Hashing(_)
            | AuthError::TokenCrypto(_)
            | AuthError::MissingIdentity => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the detail of this error must stay out of client responses.
    pub fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Message shown to clients.
    fn public_message(&self) -> String {
        if self.is_internal() {
            "internal error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InvalidToken => AuthError::InvalidToken,
            TokenError::ExpiredToken => AuthError::ExpiredToken,
            other => AuthError::TokenCrypto(other.to_string()),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::Mismatch => AuthError::PasswordMismatch,
            PasswordError::Hashing(msg) => AuthError::Hashing(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!(error = %self, "authentication internal failure");
        }

        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
