//! Nearest police station lookup.

use axum::{extract::State, http::StatusCode, Json};
use saferoute_core::{nearest_station, Coordinate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NearestStationRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct NearestStationResponse {
    pub name: String,
    pub phone: String,
    /// Kilometres with two decimals, e.g. `"1.24 km"`
    pub distance: String,
}

pub async fn nearest_police_station(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NearestStationRequest>,
) -> Result<Json<NearestStationResponse>, (StatusCode, Json<serde_json::Value>)> {
    let (Some(latitude), Some(longitude)) = (req.latitude, req.longitude) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "latitude and longitude are required" })),
        ));
    };
    let position = Coordinate::new(latitude, longitude).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
    })?;

    let nearest = nearest_station(state.stations(), position).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "no police stations available" })),
        )
    })?;

    Ok(Json(NearestStationResponse {
        name: nearest.name,
        phone: nearest.phone,
        distance: format!("{:.2} km", nearest.distance_km),
    }))
}
