//! Axum REST API handlers.
//!
//! Campaign keys accepted by `/projects/:id/events` are either the campaign
//! identifier (matches Fund registry events) or the campaign contract
//! address (matches the campaign's own stream); the `project_registered`
//! event ties the two together.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::events::EventRecord;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub project: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct ProjectsResponse {
    pub count: usize,
    pub projects: Vec<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /projects`
///
/// Identifiers of currently registered campaigns (settled campaigns have
/// left the index and are excluded).
pub async fn get_projects(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match db::get_registered_projects(&state.pool).await {
        Ok(projects) => {
            let count = projects.len();
            (
                StatusCode::OK,
                Json(serde_json::json!(ProjectsResponse { count, projects })),
            )
                .into_response()
        }
        Err(e) => internal_error(e).into_response(),
    }
}

/// `GET /projects/:id/events`
///
/// All indexed events for the given campaign key.
pub async fn get_project_events(
    State(state): State<Arc<ApiState>>,
    Path(project): Path<String>,
) -> impl IntoResponse {
    match db::get_events_for_project(&state.pool, &project).await {
        Ok(events) => {
            let count = events.len();
            (
                StatusCode::OK,
                Json(serde_json::json!(EventsResponse {
                    project,
                    count,
                    events,
                })),
            )
                .into_response()
        }
        Err(e) => internal_error(e).into_response(),
    }
}

/// `GET /events`
///
/// All indexed events across the platform.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match db::get_all_events(&state.pool).await {
        Ok(events) => {
            let count = events.len();
            (
                StatusCode::OK,
                Json(serde_json::json!(AllEventsResponse { count, events })),
            )
                .into_response()
        }
        Err(e) => internal_error(e).into_response(),
    }
}

fn internal_error(e: crate::errors::IndexerError) -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!(ErrorResponse {
            error: e.to_string()
        })),
    )
}
