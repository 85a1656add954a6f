//! Hazard zone API endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use saferoute_core::{Coordinate, HazardZone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// List all configured hazard zones.
pub async fn list_hazards(State(state): State<Arc<AppState>>) -> Json<Vec<HazardZone>> {
    Json(state.hazards().zones().to_vec())
}

#[derive(Debug, Deserialize)]
pub struct PointCheckQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct PointCheckResponse {
    /// True when the point lies in a zone that excludes routes
    pub inside_hazard: bool,
    pub zones: Vec<HazardZone>,
}

/// Zones containing a point, regardless of severity.
pub async fn check_point(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointCheckQuery>,
) -> Result<Json<PointCheckResponse>, (StatusCode, Json<serde_json::Value>)> {
    let point = Coordinate::new(query.lat, query.lon).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
    })?;

    let hazards = state.hazards();
    Ok(Json(PointCheckResponse {
        inside_hazard: hazards.intersects(point),
        zones: hazards
            .zones_containing(point)
            .into_iter()
            .cloned()
            .collect(),
    }))
}
