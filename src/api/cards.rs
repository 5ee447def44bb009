// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{Card, CreateCardRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/cards",
    tag = "Cards",
    security(("token" = [])),
    responses((status = 200, body = [Card]))
)]
pub async fn list_cards(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let cards = state.cards.get_all(user.user_id).await?;
    Ok(Json(cards.into_iter().map(Card::from).collect()))
}

#[utoipa::path(
    post,
    path = "/v1/cards",
    request_body = CreateCardRequest,
    tag = "Cards",
    security(("token" = [])),
    responses((status = 201, body = Card))
)]
pub async fn create_card(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let card = state.cards.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(card.into())))
}
