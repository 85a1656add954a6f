//! Nearest police station lookup over a static station list.

use crate::models::Coordinate;
use crate::spatial::haversine_distance;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoliceStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearestStation {
    pub name: String,
    pub phone: String,
    pub distance_km: f64,
}

/// Linear scan for the closest station by great-circle distance.
///
/// Stations with invalid coordinates are skipped. Returns `None` when no
/// usable station exists.
pub fn nearest_station(stations: &[PoliceStation], from: Coordinate) -> Option<NearestStation> {
    stations
        .iter()
        .filter_map(|station| {
            let position = Coordinate::new(station.latitude, station.longitude).ok()?;
            Some((station, haversine_distance(from, position) / 1000.0))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(station, distance_km)| NearestStation {
            name: station.name.clone(),
            phone: station.phone.clone(),
            distance_km,
        })
}

/// Stations shipped with the app.
pub fn builtin_stations() -> Vec<PoliceStation> {
    vec![
        PoliceStation {
            name: "Thrissur Town Police Station".to_string(),
            latitude: 10.5241,
            longitude: 76.2190,
            phone: "+91 487 2422222".to_string(),
        },
        PoliceStation {
            name: "Ollur Police Station".to_string(),
            latitude: 10.4720,
            longitude: 76.2423,
            phone: "+91 487 2356789".to_string(),
        },
    ]
}
