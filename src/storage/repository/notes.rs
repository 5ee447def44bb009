// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Free-form text note records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SecretRecord;
use crate::models::{CreateNoteRequest, Note, UserId};

/// Table name for notes.
pub const NOTES_TABLE: &str = "notes";

/// Stored text note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredNote {
    pub id: i64,
    pub owner: UserId,
    pub note: String,
    pub metadata: String,
    pub created_at: DateTime<Utc>,
}

impl SecretRecord for StoredNote {
    type Draft = CreateNoteRequest;
    const TABLE: &'static str = NOTES_TABLE;

    fn from_draft(id: i64, owner: UserId, created_at: DateTime<Utc>, draft: Self::Draft) -> Self {
        Self {
            id,
            owner,
            note: draft.note,
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

impl From<StoredNote> for Note {
    fn from(stored: StoredNote) -> Self {
        Note {
            id: stored.id,
            note: stored.note,
            metadata: stored.metadata,
        }
    }
}
