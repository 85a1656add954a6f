//! Core data models for the SafeRoute system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "longitude", alias = "lng")]
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Build a coordinate, pinning out-of-range values to the nearest valid bound.
    /// Non-finite inputs collapse to 0.
    pub fn clamped(lat: f64, lon: f64) -> Self {
        let lat = if lat.is_finite() { lat.clamp(-90.0, 90.0) } else { 0.0 };
        let lon = if lon.is_finite() { lon.clamp(-180.0, 180.0) } else { 0.0 };
        Self { lat, lon }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Shift by a (lat, lon) delta in degrees, staying inside valid ranges.
    pub fn offset(&self, dlat: f64, dlon: f64) -> Self {
        Self::clamped(self.lat + dlat, self.lon + dlon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Either end of a planning request: a known position or a place name to geocode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationDescriptor {
    Coordinate(Coordinate),
    Place(String),
}

impl From<Coordinate> for LocationDescriptor {
    fn from(coordinate: Coordinate) -> Self {
        LocationDescriptor::Coordinate(coordinate)
    }
}

/// Parses `"lat,lon"` as a coordinate; anything else is treated as place text.
///
/// A numeric pair outside valid ranges is an error rather than place text.
impl FromStr for LocationDescriptor {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pair = s.split_once(',').and_then(|(lat, lon)| {
            let lat = lat.trim().parse::<f64>().ok()?;
            let lon = lon.trim().parse::<f64>().ok()?;
            Some((lat, lon))
        });
        Ok(match pair {
            Some((lat, lon)) => LocationDescriptor::Coordinate(Coordinate::new(lat, lon)?),
            None => LocationDescriptor::Place(s.trim().to_string()),
        })
    }
}

/// Distance/duration reported by the directions service for a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_m: f64,
    pub duration_s: f64,
}

/// An ordered polyline from start to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub points: Vec<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<RouteSummary>,
}

impl Route {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self {
            points,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: RouteSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Shown on the map as yellow
    #[default]
    #[serde(alias = "yellow", alias = "Low")]
    Low,
    /// Shown on the map as orange
    #[serde(alias = "orange", alias = "Medium")]
    Medium,
    /// Shown on the map as red
    #[serde(alias = "red", alias = "High")]
    High,
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "yellow" => Ok(Severity::Low),
            "medium" | "orange" => Ok(Severity::Medium),
            "high" | "red" => Ok(Severity::High),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Circular disaster-affected area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardZone {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub center: Coordinate,
    #[serde(alias = "radiusMeters", alias = "radius")]
    pub radius_m: f64,
    #[serde(default)]
    pub severity: Severity,
}

impl HazardZone {
    pub fn new(center: Coordinate, radius_m: f64, severity: Severity) -> Self {
        Self {
            id: None,
            name: None,
            center,
            radius_m,
            severity,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// One route-request-and-validate cycle within a planning call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanningAttempt {
    pub start: Coordinate,
    pub end: Coordinate,
    pub attempt_number: u32,
}

// === Route planning wire types ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlanRequest {
    pub start: LocationDescriptor,
    pub end: LocationDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Safe,
    Unsafe,
    GeocodingFailed,
    RouteProviderFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlanResponse {
    pub status: PlanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// === Incident reports ===

/// A crowd-sourced incident report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub user_id: String,
    pub incident_type: String,
    #[serde(default)]
    pub description: String,
    pub location: Coordinate,
    pub severity: Severity,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub image_uri: Option<String>,
    pub upvotes: u32,
    pub downvotes: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    pub user_id: String,
    pub incident_type: String,
    #[serde(default)]
    pub description: String,
    pub location: Coordinate,
    #[serde(default)]
    pub severity: Severity,
    /// Defaults to submission time
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub image_uri: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub user_id: String,
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteIncidentRequest {
    pub user_id: String,
}
