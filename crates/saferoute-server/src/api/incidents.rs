//! Incident report API endpoints.
//!
//! Reports live in memory only; they are lost on restart.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use saferoute_core::{CreateIncidentRequest, DeleteIncidentRequest, Incident, VoteRequest};
use std::sync::Arc;

use crate::state::{AppState, IncidentError};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_response(err: IncidentError) -> ApiError {
    let status = match err {
        IncidentError::NotFound(_) => StatusCode::NOT_FOUND,
        IncidentError::Forbidden(_) => StatusCode::FORBIDDEN,
        IncidentError::AlreadyVoted { .. } => StatusCode::CONFLICT,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

/// Submit a new incident report.
pub async fn create_incident(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateIncidentRequest>,
) -> Result<(StatusCode, Json<Incident>), ApiError> {
    if req.user_id.trim().is_empty() {
        return Err(bad_request("userId is required"));
    }
    if req.incident_type.trim().is_empty() {
        return Err(bad_request("incidentType is required"));
    }

    let incident = state.incidents().create(req);
    tracing::info!(
        "Created {} incident {} at {}",
        incident.incident_type,
        incident.id,
        incident.location
    );

    Ok((StatusCode::CREATED, Json(incident)))
}

/// List incidents, newest first.
pub async fn list_incidents(State(state): State<Arc<AppState>>) -> Json<Vec<Incident>> {
    Json(state.incidents().list())
}

/// Delete an incident; only its reporter may do so.
pub async fn delete_incident(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<DeleteIncidentRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .incidents()
        .delete(&id, &req.user_id)
        .map_err(error_response)?;
    tracing::info!("Deleted incident {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn vote_incident(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<Incident>, ApiError> {
    if req.user_id.trim().is_empty() {
        return Err(bad_request("userId is required"));
    }
    state
        .incidents()
        .vote(&id, &req.user_id, req.vote_type)
        .map(Json)
        .map_err(error_response)
}
