// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login/password pair records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SecretRecord;
use crate::models::{CreatePairRequest, Pair, UserId};

/// Table name for pairs.
pub const PAIRS_TABLE: &str = "pairs";

/// Stored login/password pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredPair {
    pub id: i64,
    pub owner: UserId,
    pub login: String,
    pub password: String,
    pub metadata: String,
    pub created_at: DateTime<Utc>,
}

impl SecretRecord for StoredPair {
    type Draft = CreatePairRequest;
    const TABLE: &'static str = PAIRS_TABLE;

    fn from_draft(id: i64, owner: UserId, created_at: DateTime<Utc>, draft: Self::Draft) -> Self {
        Self {
            id,
            owner,
            login: draft.login,
            password: draft.password,
            metadata: draft.metadata,
            created_at,
        }
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }
}

impl From<StoredPair> for Pair {
    fn from(stored: StoredPair) -> Self {
        Pair {
            id: stored.id,
            login: stored.login,
            password: stored.password,
            metadata: stored.metadata,
        }
    }
}
