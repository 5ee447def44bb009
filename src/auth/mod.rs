// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Password hashing, session tokens and per-request identity.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in with `{login, password}`
//! 2. Server hashes/checks the password (Argon2id) and returns a session
//!    token: `keeper.local.` followed by an XChaCha20-Poly1305 encrypted, authenticated payload
//!    `{user_id, issued_at, expired_at}`
//! 3. Client sends the token in the `token` header on every other call
//! 4. The identity middleware verifies it and injects the caller's
//!    `user_id`; handlers read it through the `Auth` extractor
//!
//! ## Security
//!
//! - Tokens are verified without touching storage and cannot be revoked
//!   before they expire
//! - Only the registration, login, health and docs routes are public
//! - Passwords and tokens are never logged

pub mod error;
pub mod extractor;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use error::{AuthError, LookupFailure};
pub use extractor::Auth;
pub use identity::AuthenticatedUser;
pub use middleware::{identity_middleware, is_public_path, TOKEN_HEADER};
pub use password::{HashCost, PasswordError, PasswordHasher};
pub use service::{AuthService, DEFAULT_SESSION_TTL};
pub use token::{TokenError, TokenMaker, TokenPayload};
