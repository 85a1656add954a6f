//! Seams to the external geocoding and directions services.
//!
//! Both traits return `Send` futures so a planner built on them can run inside
//! a multi-threaded server. Implementations issue exactly one outbound request
//! per call and never retry internally.

use crate::models::{Coordinate, Route};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("place text is empty")]
    EmptyQuery,
    #[error("no match found for '{0}'")]
    NoMatchFound(String),
    #[error("geocoding service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteProviderError {
    #[error("directions response has no usable route: {0}")]
    InvalidResponse(String),
    #[error("directions service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Resolves free-text place descriptions to coordinates.
pub trait Geocoder: Send + Sync {
    /// Return the best-ranked match for `place`.
    fn resolve(&self, place: &str) -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send;
}

/// Fetches a single-leg driving route between two points.
pub trait RouteProvider: Send + Sync {
    fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> impl Future<Output = Result<Route, RouteProviderError>> + Send;
}
