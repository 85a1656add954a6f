//! REST API routes.

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{hazards, incidents, planning, police};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/routes/plan", post(planning::plan_route_handler))
        // Hazard zones
        .route("/v1/hazards", get(hazards::list_hazards))
        .route("/v1/hazards/check", get(hazards::check_point))
        .route("/v1/police/nearest", post(police::nearest_police_station))
        // Incident reports
        .route("/v1/incidents", post(incidents::create_incident))
        .route("/v1/incidents", get(incidents::list_incidents))
        .route("/v1/incidents/:id", delete(incidents::delete_incident))
        .route("/v1/incidents/:id/vote", post(incidents::vote_incident))
}
