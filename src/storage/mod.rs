// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users and their secrets, on an embedded redb
//! database under the configured data directory.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   keeper.redb     # users, id sequences, pairs, cards, notes
//! ```
//!
//! ## Important Notes
//!
//! - Every repository call runs on the blocking pool with a deadline
//! - A call whose caller is cancelled aborts its write transaction
//! - Secret records are only reachable through their owner's id

pub mod database;
pub mod deadline;
pub mod error;
pub mod paths;
pub mod repository;

pub use database::SecretsDatabase;
pub use error::{StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    RedbSecretRepository, RedbUserRepository, ResourceRepository, SecretRecord, StoredCard,
    StoredNote, StoredPair, StoredUser, UserRepository,
};
