//! Registration submission and confirmation-lookup endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use domain::models::{Registration, RegistrationLookup, RegistrationRequest, SubmissionResponse};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::metrics::{record_duplicate_submission, record_registration_created};

/// POST /api/v1/registrations
///
/// Submits a registration. Both the fresh-registration and the
/// already-registered outcomes return 200 with a registration token;
/// resubmitting the same `(event, email)` pair is safe.
pub async fn submit_registration(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegistrationRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let event = state
        .event_cache
        .get(&request.event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    let receipt = state.submissions.submit(&event, request).await?;

    if receipt.already_registered {
        record_duplicate_submission(&event.id);
        Ok(Json(SubmissionResponse::already_registered(receipt.token)))
    } else {
        record_registration_created(&event.id);
        Ok(Json(SubmissionResponse::created(
            receipt.token,
            receipt.email_sent,
        )))
    }
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    /// Scope the lookup to one event; without it the most recent
    /// registration for the email wins.
    pub event_id: Option<String>,
}

/// GET /api/v1/registrations/{token}
///
/// Resolves a registration token back to its registration. The token is
/// a reversible email encoding, not a credential; this endpoint only
/// exposes what the submitter already supplied.
pub async fn lookup_registration(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(params): Query<LookupParams>,
) -> Result<Json<RegistrationLookup>, ApiError> {
    let email = shared::token::decode_email(&token)
        .map_err(|e| ApiError::InvalidToken(format!("Invalid registration token: {}", e)))?;

    let entity = state
        .registrations
        .find_latest_by_email(&email, params.event_id.as_deref())
        .await
        .map_err(|e| ApiError::ServiceUnavailable(format!("Registration lookup failed: {}", e)))?
        .ok_or_else(|| ApiError::NotFound("No registration found for this token".into()))?;

    let registration = Registration::try_from(entity)
        .map_err(|e| ApiError::Internal(format!("Stored registration corrupt: {}", e)))?;

    info!(
        event_id = %registration.event_id,
        registration_id = %registration.id,
        "Registration lookup"
    );

    // Event metadata is decoration here; a catalog outage must not break
    // the lookup.
    let event = state
        .event_cache
        .get(&registration.event_id)
        .await
        .unwrap_or(None);

    Ok(Json(RegistrationLookup {
        registration,
        event,
    }))
}
