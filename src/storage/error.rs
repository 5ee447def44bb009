// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage error type shared by all repositories.

use std::io;
use std::time::Duration;

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Entity not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Entity already exists (unique key collision)
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The call did not finish within its deadline
    #[error("repository call exceeded {0:?}")]
    Timeout(Duration),

    /// The caller went away before the call finished
    #[error("repository call cancelled")]
    Cancelled,

    /// Worker failure (panicked or aborted blocking task)
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Whether this error is a unique-key collision.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::AlreadyExists(_))
    }

    /// Whether this error means the entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_helpers() {
        assert!(StorageError::AlreadyExists("login alice".into()).is_conflict());
        assert!(!StorageError::AlreadyExists("login alice".into()).is_not_found());
        assert!(StorageError::NotFound("login bob".into()).is_not_found());
        assert!(!StorageError::Timeout(Duration::from_secs(1)).is_conflict());
    }

    #[test]
    fn io_errors_convert() {
        let err: StorageError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, StorageError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
