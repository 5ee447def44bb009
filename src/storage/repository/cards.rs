// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bank card records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SecretRecord;
use crate::models::{Card, CreateCardRequest, UserId};

/// Table name for cards.
pub const CARDS_TABLE: &str = "cards";

/// Stored bank card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredCard {
    pub id: i64,
    pub owner: UserId,
    pub card_holder: String,
    pub number: String,
    pub expiration_date: String,
    pub metadata: String,
    pub created_at: DateTime<Utc>,
}

impl SecretRecord for StoredCard {
    type Draft = CreateCardRequest;
    const TABLE: &'static str = CARDS_TABLE;

    fn from_draft(id: i64, owner: UserId, created_at: DateTime<Utc>, draft: Self::Draft) -> Self {
        Self {
            id,
            owner,
            card_holder: draft.card_holder,
            number: draft.number,
            expiration_date: draft.expiration_date,
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

impl From<StoredCard> for Card {
    fn from(stored: StoredCard) -> Self {
        Card {
            id: stored.id,
            card_holder: stored.card_holder,
            number: stored.number,
            expiration_date: stored.expiration_date,
            metadata: stored.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::temp_db;
    use crate::storage::repository::{RedbSecretRepository, ResourceRepository};

    #[tokio::test]
    async fn card_round_trips_through_storage() {
        let (db, _dir) = temp_db();
        let repo = RedbSecretRepository::<StoredCard>::new(db);

        let created = repo
            .create(
                UserId(5),
                CreateCardRequest {
                    card_holder: "ALICE DOE".into(),
                    number: "4111111111111111".into(),
                    expiration_date: "12/30".into(),
                    metadata: "work".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.owner, UserId(5));

        let cards: Vec<Card> = repo
            .get_all(UserId(5))
            .await
            .unwrap()
            .into_iter()
            .map(Card::from)
            .collect();
        assert_eq!(
            cards,
            vec![Card {
                id: created.id,
                card_holder: "ALICE DOE".into(),
                number: "4111111111111111".into(),
                expiration_date: "12/30".into(),
                metadata: "work".into(),
            }]
        );
    }
}
