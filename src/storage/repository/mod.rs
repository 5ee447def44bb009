// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer.
//!
//! The identity core and the API handlers depend only on the traits in this
//! module. Production implementations are backed by [`SecretsDatabase`];
//! `crate::store` provides in-memory doubles for tests.
//!
//! [`SecretsDatabase`]: super::SecretsDatabase

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use super::StorageResult;
use crate::models::UserId;

pub mod cards;
pub mod notes;
pub mod pairs;
pub mod secrets;
pub mod users;

pub use cards::{StoredCard, CARDS_TABLE};
pub use notes::{StoredNote, NOTES_TABLE};
pub use pairs::{StoredPair, PAIRS_TABLE};
pub use secrets::RedbSecretRepository;
pub use users::{RedbUserRepository, StoredUser};

/// User records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user and return its id.
    ///
    /// # Errors
    /// `StorageError::AlreadyExists` if the login is taken; any other
    /// variant is a storage failure.
    async fn create_user(&self, login: &str, password_hash: &str) -> StorageResult<UserId>;

    /// Find a user by login.
    ///
    /// # Errors
    /// `StorageError::NotFound` if no user has this login; any other
    /// variant is a storage failure.
    async fn get_user(&self, login: &str) -> StorageResult<StoredUser>;
}

/// A secret kind stored per user.
pub trait SecretRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Caller-supplied fields of a new record.
    type Draft: Send + 'static;

    /// Table (and id sequence) name.
    const TABLE: &'static str;

    /// Build a record from its draft once id and owner are known.
    fn from_draft(id: i64, owner: UserId, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    /// Record id.
    fn id(&self) -> i64;

    /// Owning user.
    fn owner(&self) -> UserId;
}

/// Per-user secret records of one kind.
#[async_trait]
pub trait ResourceRepository<R: SecretRecord>: Send + Sync {
    /// All records owned by `user_id`, in id order.
    async fn get_all(&self, user_id: UserId) -> StorageResult<Vec<R>>;

    /// Store a new record for `user_id`.
    async fn create(&self, user_id: UserId, draft: R::Draft) -> StorageResult<R>;
}
