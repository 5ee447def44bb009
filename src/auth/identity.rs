// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated caller identity.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::UserId;

/// Identity of the caller, set once per request by the identity middleware
/// and read by handlers through the [`Auth`](super::Auth) extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Id carried by the caller's session token
    pub user_id: UserId,
}
