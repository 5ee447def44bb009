// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Generic per-user secrets repository.
//!
//! Every secret kind shares the same layout: a table keyed by
//! `(user_id, record_id)` and an id sequence named after the table.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable, TableError};

use super::{ResourceRepository, SecretRecord};
use crate::models::UserId;
use crate::storage::database::{commit_unless_cancelled, next_id, secrets_table, SecretsDatabase};
use crate::storage::StorageResult;

/// Production repository for one secret kind.
pub struct RedbSecretRepository<R> {
    db: Arc<SecretsDatabase>,
    _kind: PhantomData<fn() -> R>,
}

impl<R> RedbSecretRepository<R> {
    pub fn new(db: Arc<SecretsDatabase>) -> Self {
        Self {
            db,
            _kind: PhantomData,
        }
    }
}

impl<R> Clone for RedbSecretRepository<R> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.db))
    }
}

impl<R> std::fmt::Debug for RedbSecretRepository<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbSecretRepository")
            .field("kind", &std::any::type_name::<R>())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: SecretRecord> ResourceRepository<R> for RedbSecretRepository<R> {
    async fn get_all(&self, user_id: UserId) -> StorageResult<Vec<R>> {
        self.db
            .run(move |db, _| {
                let read_txn = db.begin_read()?;
                let table = match read_txn.open_table(secrets_table(R::TABLE)) {
                    Ok(table) => table,
                    Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
                    Err(e) => return Err(e.into()),
                };

                let uid = user_id.0;
                let mut records = Vec::new();
                for entry in table.range((uid, i64::MIN)..=(uid, i64::MAX))? {
                    let (_, value) = entry?;
                    records.push(serde_json::from_slice(value.value())?);
                }
                Ok(records)
            })
            .await
    }

    async fn create(&self, user_id: UserId, draft: R::Draft) -> StorageResult<R> {
        self.db
            .run(move |db, cancel| {
                let write_txn = db.begin_write()?;
                let id = next_id(&write_txn, R::TABLE)?;
                let record = R::from_draft(id, user_id, Utc::now(), draft);
                let json = serde_json::to_vec(&record)?;
                {
                    let mut table = write_txn.open_table(secrets_table(R::TABLE))?;
                    table.insert((user_id.0, id), json.as_slice())?;
                }
                commit_unless_cancelled(write_txn, cancel)?;

                tracing::debug!(kind = R::TABLE, user_id = %user_id, id, "secret record stored");
                Ok(record)
            })
            .await
    }
}
