// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory repositories.
//!
//! Used by unit tests and by handler tests that don't need a database on
//! disk. Behaviour matches the redb repositories: logins are unique, ids are
//! allocated from 1, and secrets are listed per owner in id order.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::UserId;
use crate::storage::{
    ResourceRepository, SecretRecord, StorageError, StorageResult, StoredUser, UserRepository,
};

#[derive(Default)]
struct Users {
    by_login: HashMap<String, StoredUser>,
    last_id: i64,
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Users>,
    unavailable: AtomicBool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a storage error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StorageError::Internal("user store unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn create_user(&self, login: &str, password_hash: &str) -> StorageResult<UserId> {
        self.check_available()?;
        let mut users = self.users.write().await;

        if users.by_login.contains_key(login) {
            return Err(StorageError::AlreadyExists(format!("login {login}")));
        }

        users.last_id += 1;
        let user = StoredUser {
            id: UserId(users.last_id),
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        let id = user.id;
        users.by_login.insert(user.login.clone(), user);
        Ok(id)
    }

    async fn get_user(&self, login: &str) -> StorageResult<StoredUser> {
        self.check_available()?;
        self.users
            .read()
            .await
            .by_login
            .get(login)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("login {login}")))
    }
}

/// In-memory repository for one secret kind.
pub struct InMemorySecretStore<R> {
    records: RwLock<BTreeMap<(UserId, i64), R>>,
    last_id: RwLock<i64>,
    _kind: PhantomData<fn() -> R>,
}

impl<R> Default for InMemorySecretStore<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            last_id: RwLock::new(0),
            _kind: PhantomData,
        }
    }
}

impl<R> InMemorySecretStore<R> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<R: SecretRecord> ResourceRepository<R> for InMemorySecretStore<R> {
    async fn get_all(&self, user_id: UserId) -> StorageResult<Vec<R>> {
        let records = self.records.read().await;
        Ok(records
            .range((user_id, i64::MIN)..=(user_id, i64::MAX))
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn create(&self, user_id: UserId, draft: R::Draft) -> StorageResult<R> {
        let id = {
            let mut last_id = self.last_id.write().await;
            *last_id += 1;
            *last_id
        };
        let record = R::from_draft(id, user_id, Utc::now(), draft);
        self.records
            .write()
            .await
            .insert((record.owner(), record.id()), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateNoteRequest;
    use crate::storage::StoredNote;

    #[tokio::test]
    async fn users_get_sequential_ids_and_unique_logins() {
        let store = InMemoryUserStore::new();

        assert_eq!(store.create_user("alice", "h1").await.unwrap(), UserId(1));
        assert_eq!(store.create_user("bob", "h2").await.unwrap(), UserId(2));
        assert!(store
            .create_user("alice", "h3")
            .await
            .unwrap_err()
            .is_conflict());
        assert_eq!(store.get_user("alice").await.unwrap().password_hash, "h1");
        assert!(store.get_user("carol").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryUserStore::new();
        store.create_user("alice", "h1").await.unwrap();
        store.set_unavailable(true);

        let err = store.get_user("alice").await.unwrap_err();
        assert!(matches!(err, StorageError::Internal(_)));
        assert!(!err.is_not_found());

        store.set_unavailable(false);
        assert!(store.get_user("alice").await.is_ok());
    }

    #[tokio::test]
    async fn secrets_are_scoped_to_owner() {
        let store = InMemorySecretStore::<StoredNote>::new();
        let note = |text: &str| CreateNoteRequest {
            note: text.to_string(),
            metadata: String::new(),
        };

        store.create(UserId(2), note("b1")).await.unwrap();
        store.create(UserId(1), note("a1")).await.unwrap();
        store.create(UserId(1), note("a2")).await.unwrap();

        let alice: Vec<_> = store
            .get_all(UserId(1))
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.note)
            .collect();
        assert_eq!(alice, ["a1", "a2"]);
        assert_eq!(store.get_all(UserId(2)).await.unwrap().len(), 1);
        assert!(store.get_all(UserId(3)).await.unwrap().is_empty());
    }
}
