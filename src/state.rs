// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthService, PasswordHasher, TokenMaker};
use crate::config::ServerConfig;
use crate::storage::{
    RedbSecretRepository, RedbUserRepository, ResourceRepository, SecretsDatabase, StoragePaths,
    StoredCard, StoredNote, StoredPair,
};
use crate::store::{InMemorySecretStore, InMemoryUserStore};

/// Startup failures while building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),

    #[error(transparent)]
    Token(#[from] crate::auth::TokenError),

    #[error(transparent)]
    Password(#[from] crate::auth::PasswordError),
}

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub pairs: Arc<dyn ResourceRepository<StoredPair>>,
    pub cards: Arc<dyn ResourceRepository<StoredCard>>,
    pub notes: Arc<dyn ResourceRepository<StoredNote>>,
    /// Backing database, if any (absent for in-memory state).
    pub database: Option<Arc<SecretsDatabase>>,
}

impl AppState {
    pub fn new(
        auth: AuthService,
        pairs: Arc<dyn ResourceRepository<StoredPair>>,
        cards: Arc<dyn ResourceRepository<StoredCard>>,
        notes: Arc<dyn ResourceRepository<StoredNote>>,
    ) -> Self {
        Self {
            auth,
            pairs,
            cards,
            notes,
            database: None,
        }
    }

    /// Set the backing database, reported by the readiness probe.
    pub fn with_database(mut self, database: Arc<SecretsDatabase>) -> Self {
        self.database = Some(database);
        self
    }

    /// Build production state: open the database under the configured data
    /// directory and wire every repository to it.
    pub fn from_config(config: &ServerConfig) -> Result<Self, StateError> {
        let paths = StoragePaths::new(&config.data_dir);
        let database = Arc::new(SecretsDatabase::open(
            &paths.database(),
            config.repository_timeout,
        )?);

        let auth = AuthService::new(
            Arc::new(RedbUserRepository::new(Arc::clone(&database))),
            PasswordHasher::new(config.hash_cost)?,
            TokenMaker::new(&config.token_key)?,
            config.session_ttl,
        );

        Ok(Self::new(
            auth,
            Arc::new(RedbSecretRepository::<StoredPair>::new(Arc::clone(&database))),
            Arc::new(RedbSecretRepository::<StoredCard>::new(Arc::clone(&database))),
            Arc::new(RedbSecretRepository::<StoredNote>::new(Arc::clone(&database))),
        )
        .with_database(database))
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        Self::new(
            crate::auth::service::test_service(users),
            Arc::new(InMemorySecretStore::<StoredPair>::new()),
            Arc::new(InMemorySecretStore::<StoredCard>::new()),
            Arc::new(InMemorySecretStore::<StoredNote>::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TOKEN_KEY_ENV;
    use crate::models::UserId;

    #[tokio::test]
    async fn from_config_opens_database_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let data_dir_str = data_dir.to_string_lossy().into_owned();
        let config = ServerConfig::from_lookup(|name| match name {
            TOKEN_KEY_ENV => Some("0123456789abcdef0123456789abcdef".into()),
            "DATA_DIR" => Some(data_dir_str.clone()),
            "PASSWORD_MEMORY_KIB" => Some("1024".into()),
            "PASSWORD_ITERATIONS" => Some("1".into()),
            _ => None,
        })
        .unwrap();

        let state = AppState::from_config(&config).unwrap();
        assert!(data_dir.join("keeper.redb").exists());
        assert!(state.database.is_some());

        let token = state.auth.register_user("alice", "pw1").await.unwrap();
        assert_eq!(state.auth.parse_token(&token).unwrap(), UserId(1));
    }

    #[test]
    fn from_config_rejects_invalid_hash_cost() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir_str = dir.path().to_string_lossy().into_owned();
        let config = ServerConfig::from_lookup(|name| match name {
            TOKEN_KEY_ENV => Some("0123456789abcdef0123456789abcdef".into()),
            "DATA_DIR" => Some(data_dir_str.clone()),
            "PASSWORD_ITERATIONS" => Some("0".into()),
            _ => None,
        })
        .unwrap();

        assert!(matches!(
            AppState::from_config(&config),
            Err(StateError::Password(_))
        ));
    }
}
