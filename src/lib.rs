// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Keeper - Multi-tenant Secrets Storage Service
//!
//! Users register with a login and password, receive an encrypted session
//! token, and store login/password pairs, bank cards and text notes that only
//! they can read back.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, session tokens and the identity middleware
//! - `storage` - Embedded database (redb) and repositories
//! - `store` - In-memory repositories

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
