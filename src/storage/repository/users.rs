// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository on the embedded database.
//!
//! Logins are unique: the `users` table is keyed by login, so the
//! existence check and the insert happen in one serialized write
//! transaction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};

use super::UserRepository;
use crate::models::UserId;
use crate::storage::database::{commit_unless_cancelled, next_id, SecretsDatabase, USERS, USER_IDS};
use crate::storage::{StorageError, StorageResult};

/// Id sequence for users.
const USER_SEQUENCE: &str = "users";

/// User record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Numeric user id
    pub id: UserId,
    /// Unique login
    pub login: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// When the user registered
    pub created_at: DateTime<Utc>,
}

/// Production user repository.
#[derive(Debug, Clone)]
pub struct RedbUserRepository {
    db: Arc<SecretsDatabase>,
}

impl RedbUserRepository {
    /// Create a new RedbUserRepository.
    pub fn new(db: Arc<SecretsDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for RedbUserRepository {
    async fn create_user(&self, login: &str, password_hash: &str) -> StorageResult<UserId> {
        let login = login.to_string();
        let password_hash = password_hash.to_string();

        self.db
            .run(move |db, cancel| {
                let write_txn = db.begin_write()?;

                let taken = {
                    let users = write_txn.open_table(USERS)?;
                    let existing = users.get(login.as_str())?;
                    existing.is_some()
                };
                if taken {
                    write_txn.abort()?;
                    return Err(StorageError::AlreadyExists(format!("login {login}")));
                }

                let id = next_id(&write_txn, USER_SEQUENCE)?;
                let user = StoredUser {
                    id: UserId(id),
                    login,
                    password_hash,
                    created_at: Utc::now(),
                };
                let json = serde_json::to_vec(&user)?;
                {
                    let mut users = write_txn.open_table(USERS)?;
                    users.insert(user.login.as_str(), json.as_slice())?;

                    let mut ids = write_txn.open_table(USER_IDS)?;
                    ids.insert(id, user.login.as_str())?;
                }
                commit_unless_cancelled(write_txn, cancel)?;

                Ok(user.id)
            })
            .await
    }

    async fn get_user(&self, login: &str) -> StorageResult<StoredUser> {
        let login = login.to_string();

        self.db
            .run(move |db, _| {
                let read_txn = db.begin_read()?;
                let users = read_txn.open_table(USERS)?;
                match users.get(login.as_str())? {
                    Some(value) => Ok(serde_json::from_slice(value.value())?),
                    None => Err(StorageError::NotFound(format!("login {login}"))),
                }
            })
            .await
    }
}
