//! Driving directions via the OpenRouteService directions API.

use saferoute_core::polyline::{self, DEFAULT_PRECISION};
use saferoute_core::{Coordinate, Route, RouteProvider, RouteProviderError, RouteSummary};
use serde::{Deserialize, Serialize};

use crate::client::{describe_transport_error, is_service_failure, OrsClient};

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    /// [lon, lat] pairs, start then end
    coordinates: [[f64; 2]; 2],
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<RoutePayload>,
}

#[derive(Debug, Deserialize)]
struct RoutePayload {
    #[serde(default)]
    geometry: Option<String>,
    #[serde(default)]
    summary: Option<SummaryPayload>,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured {
        #[serde(default)]
        code: Option<i64>,
        #[serde(default)]
        message: Option<String>,
    },
    Text(String),
}

impl ErrorDetail {
    fn describe(&self) -> String {
        match self {
            ErrorDetail::Structured { code, message } => format!(
                "{} (code {})",
                message.as_deref().unwrap_or("unknown error"),
                code.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
            ),
            ErrorDetail::Text(text) => text.clone(),
        }
    }
}

/// Fetches single-leg routes and decodes their encoded polyline geometry.
#[derive(Debug, Clone)]
pub struct OrsDirections {
    client: OrsClient,
}

impl OrsDirections {
    pub fn new(client: OrsClient) -> Self {
        Self { client }
    }
}

impl RouteProvider for OrsDirections {
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Route, RouteProviderError> {
        let url = self
            .client
            .url(&format!("/v2/directions/{}", self.client.profile));
        let request = DirectionsRequest {
            coordinates: [[start.lon(), start.lat()], [end.lon(), end.lat()]],
        };

        let response = self
            .client
            .apply_auth(
                self.client
                    .client
                    .post(&url)
                    .header("Accept", "application/json")
                    .json(&request),
            )
            .send()
            .await
            .map_err(|err| RouteProviderError::ServiceUnavailable(describe_transport_error(&err)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RouteProviderError::ServiceUnavailable(describe_transport_error(&err)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|payload| payload.error.describe())
                .unwrap_or_else(|_| body.clone());
            tracing::warn!("Directions request failed: {} {}", status, detail);

            return Err(if is_service_failure(status) {
                RouteProviderError::ServiceUnavailable(format!("{}: {}", status, detail))
            } else {
                RouteProviderError::InvalidResponse(format!("{}: {}", status, detail))
            });
        }

        parse_directions_response(&body)
    }
}

pub(crate) fn parse_directions_response(body: &str) -> Result<Route, RouteProviderError> {
    let payload: DirectionsResponse = serde_json::from_str(body).map_err(|err| {
        RouteProviderError::InvalidResponse(format!("unparseable directions response: {}", err))
    })?;

    let Some(first) = payload.routes.into_iter().next() else {
        return Err(RouteProviderError::InvalidResponse(
            "route list is empty".to_string(),
        ));
    };

    let encoded = first
        .geometry
        .filter(|geometry| !geometry.is_empty())
        .ok_or_else(|| RouteProviderError::InvalidResponse("route has no geometry".to_string()))?;

    let points = polyline::decode(&encoded, DEFAULT_PRECISION)
        .map_err(|err| RouteProviderError::InvalidResponse(err.to_string()))?;
    if points.is_empty() {
        return Err(RouteProviderError::InvalidResponse(
            "route geometry decoded to zero points".to_string(),
        ));
    }

    let mut route = Route::new(points);
    if let Some(summary) = first.summary {
        route = route.with_summary(RouteSummary {
            distance_m: summary.distance,
            duration_s: summary.duration,
        });
    }
    tracing::debug!("Decoded route with {} points", route.len());

    Ok(route)
}
