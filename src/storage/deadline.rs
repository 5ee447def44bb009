// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deadline-bounded, cancellable execution of blocking repository work.
//!
//! redb is synchronous, so each repository call runs on tokio's blocking
//! pool. The awaiting side owns a [`CancellationToken`] drop guard: when the
//! deadline elapses or the inbound request future is dropped, the token is
//! cancelled and the blocking closure can abort its write transaction
//! instead of committing it.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{StorageError, StorageResult};

/// Run `op` on the blocking pool, bounded by `deadline`.
///
/// `op` receives the cancellation token and must check it before
/// committing any write.
pub async fn run_bounded<T, F>(deadline: Duration, op: F) -> StorageResult<T>
where
    T: Send + 'static,
    F: FnOnce(&CancellationToken) -> StorageResult<T> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let task_cancel = cancel.clone();
    let handle = tokio::task::spawn_blocking(move || op(&task_cancel));

    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(StorageError::Internal(join_err.to_string())),
        Err(_) => {
            tracing::warn!(?deadline, "repository call exceeded deadline");
            Err(StorageError::Timeout(deadline))
        }
    }
}
