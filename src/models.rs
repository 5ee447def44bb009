// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for JSON handling and
//! OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Credentials**: registration/login input and the issued token
//! - **Pairs**: stored login/password pairs
//! - **Cards**: stored bank cards
//! - **Notes**: stored free-form text

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// User Identifier
// =============================================================================

/// Numeric user identifier, assigned by the user repository.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        UserId(value)
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Login and password, used for both registration and login.
#[derive(Clone, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Issued session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}

// =============================================================================
// Secrets
// =============================================================================

/// Login/password pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Pair {
    pub id: i64,
    pub login: String,
    pub password: String,
    pub metadata: String,
}

/// Request to store a login/password pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreatePairRequest {
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub metadata: String,
}

/// Bank card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Card {
    pub id: i64,
    pub card_holder: String,
    pub number: String,
    pub expiration_date: String,
    pub metadata: String,
}

/// Request to store a bank card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreateCardRequest {
    pub card_holder: String,
    pub number: String,
    pub expiration_date: String,
    #[serde(default)]
    pub metadata: String,
}

/// Free-form text note.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub note: String,
    pub metadata: String,
}

/// Request to store a text note.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreateNoteRequest {
    pub note: String,
    #[serde(default)]
    pub metadata: String,
}
