// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded secrets database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: login → serialized StoredUser
//! - `user_ids`: user id → login
//! - `sequences`: sequence name → last allocated id
//! - `pairs` / `cards` / `notes`: (user_id, record_id) → serialized record
//!
//! Secret tables are keyed by owner first, so listing a user's records is a
//! single range scan that cannot reach another user's rows.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use tokio_util::sync::CancellationToken;

use super::deadline::run_bounded;
use super::repository::{CARDS_TABLE, NOTES_TABLE, PAIRS_TABLE};
use super::{StorageError, StorageResult};

// =============================================================================
// Table Definitions
// =============================================================================

/// Users by login: login → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Reverse index: user id → login.
pub(crate) const USER_IDS: TableDefinition<i64, &str> = TableDefinition::new("user_ids");

/// Id allocation: sequence name → last allocated id.
const SEQUENCES: TableDefinition<&str, i64> = TableDefinition::new("sequences");

/// Definition of a per-user secrets table.
pub(crate) const fn secrets_table(
    name: &'static str,
) -> TableDefinition<'static, (i64, i64), &'static [u8]> {
    TableDefinition::new(name)
}

// =============================================================================
// SecretsDatabase
// =============================================================================

/// Embedded ACID database shared by all repositories.
pub struct SecretsDatabase {
    db: Database,
    call_timeout: Duration,
}

impl std::fmt::Debug for SecretsDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsDatabase")
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

impl SecretsDatabase {
    /// Open (or create) the database at the given path.
    ///
    /// `call_timeout` bounds every repository call made through
    /// [`SecretsDatabase::run`].
    pub fn open(path: &Path, call_timeout: Duration) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_IDS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
            for name in [PAIRS_TABLE, CARDS_TABLE, NOTES_TABLE] {
                let _ = write_txn.open_table(secrets_table(name))?;
            }
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "secrets database opened");

        Ok(Self { db, call_timeout })
    }

    /// Deadline applied to each repository call.
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Run a blocking operation against the database, bounded by the
    /// configured call timeout and cancelled if the caller goes away.
    pub(crate) async fn run<T, F>(self: &Arc<Self>, op: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database, &CancellationToken) -> StorageResult<T> + Send + 'static,
    {
        let this = Arc::clone(self);
        run_bounded(self.call_timeout, move |cancel| op(&this.db, cancel)).await
    }

    /// Verify the database can serve a read transaction.
    pub fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        Ok(())
    }
}

/// Commit `write_txn` unless the caller has been cancelled, in which case
/// the transaction is aborted.
///
/// The check and the commit are not atomic. A deadline that fires while the
/// commit is in flight leaves the write durable even though the caller has
/// already been answered with [`StorageError::Timeout`].
pub(crate) fn commit_unless_cancelled(
    write_txn: WriteTransaction,
    cancel: &CancellationToken,
) -> StorageResult<()> {
    if cancel.is_cancelled() {
        write_txn.abort()?;
        return Err(StorageError::Cancelled);
    }
    write_txn.commit()?;
    if cancel.is_cancelled() {
        tracing::warn!("write committed after the caller was cancelled");
    }
    Ok(())
}

/// Allocate the next id of `sequence` inside `write_txn`.
///
/// Write transactions are serialized by redb, so allocation is race-free.
pub(crate) fn next_id(write_txn: &WriteTransaction, sequence: &str) -> StorageResult<i64> {
    let mut table = write_txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

#[cfg(test)]
pub(crate) fn temp_db() -> (Arc<SecretsDatabase>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db = SecretsDatabase::open(&dir.path().join("test.redb"), Duration::from_secs(5))
        .expect("open database");
    (Arc::new(db), dir)
}
