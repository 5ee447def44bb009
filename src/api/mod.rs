// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::HeaderName,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{identity_middleware, AuthenticatedUser, TOKEN_HEADER},
    models::{
        Card, CreateCardRequest, CreateNoteRequest, CreatePairRequest, Credentials, Note, Pair,
        TokenResponse, UserId,
    },
    state::AppState,
};

pub mod cards;
pub mod health;
pub mod notes;
pub mod pairs;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/user/register", post(users::register))
        .route("/user/login", post(users::login))
        .route("/user/me", get(users::me))
        .route("/pairs", get(pairs::list_pairs).post(pairs::create_pair))
        .route("/cards", get(cards::list_cards).post(cards::create_card))
        .route("/notes", get(notes::list_notes).post(notes::create_note));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(from_fn_with_state(state.clone(), identity_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Registers the `token` header as an API key scheme.
struct TokenSecurity;

impl Modify for TokenSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(TOKEN_HEADER))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        users::login,
        users::me,
        pairs::list_pairs,
        pairs::create_pair,
        cards::list_cards,
        cards::create_card,
        notes::list_notes,
        notes::create_note,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Credentials,
            TokenResponse,
            UserId,
            AuthenticatedUser,
            Pair,
            CreatePairRequest,
            Card,
            CreateCardRequest,
            Note,
            CreateNoteRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&TokenSecurity),
    tags(
        (name = "Users", description = "Registration, login and identity"),
        (name = "Pairs", description = "Stored login/password pairs"),
        (name = "Cards", description = "Stored bank cards"),
        (name = "Notes", description = "Stored text notes"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
