//! Safe-route planning endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use saferoute_core::RoutePlanRequest;
use std::sync::Arc;

use crate::route_planner::plan_route;
use crate::state::AppState;

/// Malformed bodies get 400 so they never share a status with planning failures.
pub async fn plan_route_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<RoutePlanRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            tracing::warn!("Rejected plan request: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    let (status, response) = plan_route(state.as_ref(), request).await;
    tracing::info!(
        "Route plan finished: {:?} after {} attempts",
        response.status,
        response.attempts
    );
    (status, Json(response)).into_response()
}
