//! Server-side route planning on top of the core safe-route planner.

use axum::http::StatusCode;
use futures::future::BoxFuture;
use saferoute_core::{
    Geocoder, LocationDescriptor, PlanStatus, PlanningResult, RoutePlanRequest,
    RoutePlanResponse, RouteProvider, SafeRoutePlanner,
};

use crate::state::AppState;

/// Object-safe planning seam so the server can hold any planner behind `dyn`.
pub trait RoutePlanning: Send + Sync {
    fn plan<'a>(
        &'a self,
        start: &'a LocationDescriptor,
        end: &'a LocationDescriptor,
    ) -> BoxFuture<'a, PlanningResult>;
}

impl<G, R> RoutePlanning for SafeRoutePlanner<G, R>
where
    G: Geocoder + 'static,
    R: RouteProvider + 'static,
{
    fn plan<'a>(
        &'a self,
        start: &'a LocationDescriptor,
        end: &'a LocationDescriptor,
    ) -> BoxFuture<'a, PlanningResult> {
        Box::pin(self.plan_safe_route(start, end))
    }
}

/// Run one planning call and shape the outcome for the HTTP surface.
pub async fn plan_route(state: &AppState, request: RoutePlanRequest) -> (StatusCode, RoutePlanResponse) {
    tracing::info!(
        "Planning route {} -> {}",
        describe(&request.start),
        describe(&request.end)
    );

    let result = state.planner().plan(&request.start, &request.end).await;
    let response = to_response(result);

    let status = match response.status {
        PlanStatus::Safe | PlanStatus::Unsafe => StatusCode::OK,
        PlanStatus::GeocodingFailed => StatusCode::UNPROCESSABLE_ENTITY,
        PlanStatus::RouteProviderFailed => StatusCode::BAD_GATEWAY,
    };
    (status, response)
}

pub fn to_response(result: PlanningResult) -> RoutePlanResponse {
    let attempts = result.attempts();
    match result {
        PlanningResult::Safe { route, .. } => RoutePlanResponse {
            status: PlanStatus::Safe,
            route: Some(route),
            attempts,
            message: None,
        },
        PlanningResult::Unsafe { .. } => RoutePlanResponse {
            status: PlanStatus::Unsafe,
            route: None,
            attempts,
            message: Some(format!(
                "no hazard-free route found after {} attempts",
                attempts
            )),
        },
        PlanningResult::GeocodingFailed { endpoint, error } => RoutePlanResponse {
            status: PlanStatus::GeocodingFailed,
            route: None,
            attempts,
            message: Some(format!("could not resolve {} location: {}", endpoint, error)),
        },
        PlanningResult::RouteProviderFailed { error, .. } => RoutePlanResponse {
            status: PlanStatus::RouteProviderFailed,
            route: None,
            attempts,
            message: Some(format!("route provider failed: {}", error)),
        },
    }
}

fn describe(location: &LocationDescriptor) -> String {
    match location {
        LocationDescriptor::Coordinate(coordinate) => coordinate.to_string(),
        LocationDescriptor::Place(text) => format!("'{}'", text),
    }
}
