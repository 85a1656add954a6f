//! OpenRouteService-backed implementations of the geocoder and route
//! provider contracts.

pub mod client;
pub mod directions;
pub mod geocode;

pub use client::{OrsClient, OrsConfig, DEFAULT_BASE_URL, DEFAULT_PROFILE};
pub use directions::OrsDirections;
pub use geocode::OrsGeocoder;
