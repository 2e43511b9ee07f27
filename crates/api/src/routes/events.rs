//! Event catalog endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use domain::models::EventConfig;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct EventListParams {
    /// Restrict the listing to one fest (e.g. `techelons`).
    pub fest: Option<String>,
}

/// GET /api/v1/events
///
/// Lists the event catalog. Reads straight from the repository so admin
/// catalog edits show up immediately; only per-event reads on the
/// submission path go through the cache.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> Result<Json<Vec<EventConfig>>, ApiError> {
    let entities = state
        .events
        .list(params.fest.as_deref())
        .await
        .map_err(|e| ApiError::ServiceUnavailable(format!("Event listing failed: {}", e)))?;

    Ok(Json(
        entities.into_iter().map(|e| e.into_config()).collect(),
    ))
}

/// GET /api/v1/events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<EventConfig>, ApiError> {
    state
        .event_cache
        .get(&event_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))
}
