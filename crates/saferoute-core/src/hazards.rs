//! Static hazard-zone index used to validate candidate routes.
//!
//! The zone set is loaded once and never mutated, so a single index can be
//! shared behind an `Arc` by every concurrent planning call.

use crate::models::{Coordinate, HazardZone, Route, Severity};
use crate::spatial::{planar_distance_m, planar_distance_to_segment_m};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HazardConfigError {
    #[error("failed to read hazard zones from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse hazard zones: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("hazard zone {index} has invalid radius {radius_m}")]
    InvalidRadius { index: usize, radius_m: f64 },
}

/// How a route is tested against zone circles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardCheckMode {
    /// Only polyline vertices are tested. A route can cross a zone between two
    /// vertices without being flagged.
    #[default]
    Vertices,
    /// Every segment is tested against every circle.
    Segments,
}

impl FromStr for HazardCheckMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertices" | "vertex" | "points" => Ok(HazardCheckMode::Vertices),
            "segments" | "segment" => Ok(HazardCheckMode::Segments),
            other => Err(format!("unknown hazard check mode '{}'", other)),
        }
    }
}

/// Which zones block routes and how routes are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardIndexOptions {
    /// Zones below this severity are shown but never block a route.
    pub min_excluded_severity: Severity,
    pub check_mode: HazardCheckMode,
}

impl Default for HazardIndexOptions {
    fn default() -> Self {
        Self {
            min_excluded_severity: Severity::Low,
            check_mode: HazardCheckMode::Vertices,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HazardZoneIndex {
    zones: Vec<HazardZone>,
    options: HazardIndexOptions,
}

impl HazardZoneIndex {
    pub fn new(zones: Vec<HazardZone>, options: HazardIndexOptions) -> Result<Self, HazardConfigError> {
        for (index, zone) in zones.iter().enumerate() {
            if !zone.radius_m.is_finite() || zone.radius_m < 0.0 {
                return Err(HazardConfigError::InvalidRadius {
                    index,
                    radius_m: zone.radius_m,
                });
            }
        }
        Ok(Self { zones, options })
    }

    pub fn empty() -> Self {
        Self {
            zones: Vec::new(),
            options: HazardIndexOptions::default(),
        }
    }

    /// Parse a JSON array of zones.
    pub fn from_json(json: &str, options: HazardIndexOptions) -> Result<Self, HazardConfigError> {
        let zones: Vec<HazardZone> = serde_json::from_str(json)?;
        Self::new(zones, options)
    }

    /// Load a JSON array of zones from disk.
    pub fn load(path: impl AsRef<Path>, options: HazardIndexOptions) -> Result<Self, HazardConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| HazardConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json, options)
    }

    pub fn zones(&self) -> &[HazardZone] {
        &self.zones
    }

    pub fn options(&self) -> HazardIndexOptions {
        self.options
    }

    /// Zones that currently gate route safety.
    pub fn excluded_zones(&self) -> impl Iterator<Item = &HazardZone> {
        let min = self.options.min_excluded_severity;
        self.zones.iter().filter(move |zone| zone.severity >= min)
    }

    /// True if `point` lies within the radius of any excluded zone.
    pub fn intersects(&self, point: Coordinate) -> bool {
        self.excluded_zones().any(|zone| zone_contains(zone, point))
    }

    /// True if the route touches any excluded zone under the configured check mode.
    pub fn any_intersect(&self, route: &Route) -> bool {
        self.any_intersect_points(&route.points)
    }

    pub fn any_intersect_points(&self, points: &[Coordinate]) -> bool {
        match self.options.check_mode {
            HazardCheckMode::Vertices => points.iter().any(|point| self.intersects(*point)),
            HazardCheckMode::Segments => {
                if points.len() == 1 {
                    return self.intersects(points[0]);
                }
                points.windows(2).any(|pair| {
                    self.excluded_zones().any(|zone| {
                        planar_distance_to_segment_m(zone.center, pair[0], pair[1]) <= zone.radius_m
                    })
                })
            }
        }
    }

    /// All zones covering `point`, regardless of the exclusion policy.
    pub fn zones_containing(&self, point: Coordinate) -> Vec<&HazardZone> {
        self.zones
            .iter()
            .filter(|zone| zone_contains(zone, point))
            .collect()
    }
}

fn zone_contains(zone: &HazardZone, point: Coordinate) -> bool {
    planar_distance_m(zone.center, point) <= zone.radius_m
}

/// Zones shipped with the app for the Thrissur district.
pub fn builtin_zones() -> Vec<HazardZone> {
    [
        ("1", 10.52, 76.21, 1000.0, Severity::High),
        ("2", 10.54, 76.25, 800.0, Severity::Medium),
        ("3", 10.48, 76.22, 600.0, Severity::Low),
        ("4", 10.56, 76.26, 900.0, Severity::High),
        ("5", 10.49, 76.23, 700.0, Severity::Medium),
        ("6", 10.47, 76.27, 500.0, Severity::Low),
        ("7", 10.50, 76.28, 1000.0, Severity::High),
        ("8", 10.53, 76.29, 800.0, Severity::Medium),
    ]
    .into_iter()
    .map(|(id, lat, lon, radius_m, severity)| {
        HazardZone::new(Coordinate::clamped(lat, lon), radius_m, severity).with_id(id)
    })
    .collect()
}
