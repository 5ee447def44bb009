// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateNoteRequest, Note},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/notes",
    tag = "Notes",
    security(("token" = [])),
    responses((status = 200, body = [Note]))
)]
pub async fn list_notes(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.notes.get_all(user.user_id).await?;
    Ok(Json(notes.into_iter().map(Note::from).collect()))
}

#[utoipa::path(
    post,
    path = "/v1/notes",
    request_body = CreateNoteRequest,
    tag = "Notes",
    security(("token" = [])),
    responses((status = 201, body = Note))
)]
pub async fn create_note(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = state.notes.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(note.into())))
}
