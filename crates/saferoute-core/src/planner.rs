//! Safe-route planning.
//!
//! A planning call walks a small state machine:
//! `ResolvingEndpoints -> Requesting -> Validating -> (Accepted | Perturbing -> Requesting)`.
//! Geocoding failures end the call before any route request; provider failures end
//! it on the attempt they occur. Only hazard violations are retried, by shifting
//! both endpoints a little and asking the provider again, at most
//! [`MAX_ATTEMPTS`] times.

use crate::hazards::HazardZoneIndex;
use crate::models::{Coordinate, LocationDescriptor, PlanningAttempt, Route};
use crate::perturb::{OffsetSource, RandomOffsets, DEFAULT_MAX_PERTURBATION_DEG};
use crate::provider::{GeocodeError, Geocoder, RouteProvider, RouteProviderError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Route requests allowed per planning call.
pub const MAX_ATTEMPTS: u32 = 5;

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Per-axis bound on endpoint perturbation, in degrees
    pub max_perturbation_deg: f64,
    /// Applied to every geocoder and provider call
    pub call_timeout: Duration,
    /// Fixed seed for the perturbation RNG; fresh entropy per call when unset
    pub perturbation_seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_perturbation_deg: DEFAULT_MAX_PERTURBATION_DEG,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            perturbation_seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::End => write!(f, "end"),
        }
    }
}

/// Terminal outcome of one planning call.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanningResult {
    /// Hazard-free route found on attempt `attempts`.
    Safe { route: Route, attempts: u32 },
    /// Every attempt intersected an excluded zone. No route is returned.
    Unsafe { attempts: u32 },
    GeocodingFailed {
        endpoint: Endpoint,
        error: GeocodeError,
    },
    RouteProviderFailed {
        attempts: u32,
        error: RouteProviderError,
    },
}

impl PlanningResult {
    pub fn is_safe(&self) -> bool {
        matches!(self, PlanningResult::Safe { .. })
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            PlanningResult::Safe { route, .. } => Some(route),
            _ => None,
        }
    }

    pub fn into_route(self) -> Option<Route> {
        match self {
            PlanningResult::Safe { route, .. } => Some(route),
            _ => None,
        }
    }

    /// Number of route requests issued during the call.
    pub fn attempts(&self) -> u32 {
        match self {
            PlanningResult::Safe { attempts, .. }
            | PlanningResult::Unsafe { attempts }
            | PlanningResult::RouteProviderFailed { attempts, .. } => *attempts,
            PlanningResult::GeocodingFailed { .. } => 0,
        }
    }
}

/// Orchestrates geocoding, routing and hazard validation.
///
/// Holds no mutable state; one planner can serve concurrent calls.
pub struct SafeRoutePlanner<G, R> {
    geocoder: G,
    provider: R,
    hazards: Arc<HazardZoneIndex>,
    config: PlannerConfig,
}

impl<G, R> SafeRoutePlanner<G, R>
where
    G: Geocoder,
    R: RouteProvider,
{
    pub fn new(geocoder: G, provider: R, hazards: Arc<HazardZoneIndex>) -> Self {
        Self {
            geocoder,
            provider,
            hazards,
            config: PlannerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn hazards(&self) -> &Arc<HazardZoneIndex> {
        &self.hazards
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn provider(&self) -> &R {
        &self.provider
    }

    /// Plan a hazard-free route between two descriptors.
    pub async fn plan_safe_route(
        &self,
        start: &LocationDescriptor,
        end: &LocationDescriptor,
    ) -> PlanningResult {
        let max_deg = self.config.max_perturbation_deg;
        let mut offsets = match self.config.perturbation_seed {
            Some(seed) => RandomOffsets::seeded(max_deg, seed),
            None => RandomOffsets::new(max_deg),
        };
        self.plan_safe_route_with(start, end, &mut offsets).await
    }

    /// Same as [`plan_safe_route`](Self::plan_safe_route) with a caller-supplied
    /// perturbation source.
    pub async fn plan_safe_route_with<O>(
        &self,
        start: &LocationDescriptor,
        end: &LocationDescriptor,
        offsets: &mut O,
    ) -> PlanningResult
    where
        O: OffsetSource + Send,
    {
        let start = match self.resolve(start).await {
            Ok(point) => point,
            Err(error) => {
                tracing::warn!("Geocoding start failed: {}", error);
                return PlanningResult::GeocodingFailed {
                    endpoint: Endpoint::Start,
                    error,
                };
            }
        };
        let end = match self.resolve(end).await {
            Ok(point) => point,
            Err(error) => {
                tracing::warn!("Geocoding end failed: {}", error);
                return PlanningResult::GeocodingFailed {
                    endpoint: Endpoint::End,
                    error,
                };
            }
        };

        let mut attempt = PlanningAttempt {
            start,
            end,
            attempt_number: 1,
        };

        loop {
            tracing::debug!(
                "Route attempt {}/{}: {} -> {}",
                attempt.attempt_number,
                MAX_ATTEMPTS,
                attempt.start,
                attempt.end
            );

            let route = match self.request_route(attempt.start, attempt.end).await {
                Ok(route) => route,
                Err(error) => {
                    tracing::warn!(
                        "Route provider failed on attempt {}: {}",
                        attempt.attempt_number,
                        error
                    );
                    return PlanningResult::RouteProviderFailed {
                        attempts: attempt.attempt_number,
                        error,
                    };
                }
            };

            if !self.hazards.any_intersect(&route) {
                tracing::info!(
                    "Safe route found on attempt {} ({} points)",
                    attempt.attempt_number,
                    route.len()
                );
                return PlanningResult::Safe {
                    route,
                    attempts: attempt.attempt_number,
                };
            }

            if attempt.attempt_number >= MAX_ATTEMPTS {
                tracing::warn!(
                    "No hazard-free route after {} attempts",
                    attempt.attempt_number
                );
                return PlanningResult::Unsafe {
                    attempts: attempt.attempt_number,
                };
            }

            tracing::debug!(
                "Attempt {} crosses a hazard zone; perturbing endpoints",
                attempt.attempt_number
            );
            // Offsets are taken from the resolved endpoints so drift stays bounded.
            attempt = PlanningAttempt {
                start: offsets.perturb(start),
                end: offsets.perturb(end),
                attempt_number: attempt.attempt_number + 1,
            };
        }
    }

    async fn resolve(&self, descriptor: &LocationDescriptor) -> Result<Coordinate, GeocodeError> {
        let text = match descriptor {
            LocationDescriptor::Coordinate(point) => return Ok(*point),
            LocationDescriptor::Place(text) => text.trim(),
        };
        if text.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        match tokio::time::timeout(self.config.call_timeout, self.geocoder.resolve(text)).await {
            Ok(result) => result,
            Err(_) => Err(GeocodeError::ServiceUnavailable(format!(
                "timed out after {:?}",
                self.config.call_timeout
            ))),
        }
    }

    async fn request_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Route, RouteProviderError> {
        let route = match tokio::time::timeout(
            self.config.call_timeout,
            self.provider.fetch_route(start, end),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(RouteProviderError::ServiceUnavailable(format!(
                    "timed out after {:?}",
                    self.config.call_timeout
                )))
            }
        };

        // An empty polyline would pass validation vacuously.
        if route.is_empty() {
            return Err(RouteProviderError::InvalidResponse(
                "route has no points".to_string(),
            ));
        }
        Ok(route)
    }
}
