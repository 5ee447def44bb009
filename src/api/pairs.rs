// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreatePairRequest, Pair},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/pairs",
    tag = "Pairs",
    security(("token" = [])),
    responses((status = 200, body = [Pair]))
)]
pub async fn list_pairs(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Pair>>, ApiError> {
    let pairs = state.pairs.get_all(user.user_id).await?;
    Ok(Json(pairs.into_iter().map(Pair::from).collect()))
}

#[utoipa::path(
    post,
    path = "/v1/pairs",
    request_body = CreatePairRequest,
    tag = "Pairs",
    security(("token" = [])),
    responses((status = 201, body = Pair))
)]
pub async fn create_pair(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreatePairRequest>,
) -> Result<(StatusCode, Json<Pair>), ApiError> {
    let pair = state.pairs.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(pair.into())))
}
