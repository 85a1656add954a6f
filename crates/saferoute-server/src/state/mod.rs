//! Shared application state.

pub mod store;

use anyhow::{Context, Result};
use saferoute_core::hazards::builtin_zones;
use saferoute_core::stations::builtin_stations;
use saferoute_core::{HazardZoneIndex, PoliceStation, SafeRoutePlanner};
use saferoute_providers::{OrsClient, OrsDirections, OrsGeocoder};
use std::sync::Arc;

use crate::config::Config;
use crate::route_planner::RoutePlanning;
pub use store::{IncidentError, IncidentStore};

pub struct AppState {
    planner: Arc<dyn RoutePlanning>,
    hazards: Arc<HazardZoneIndex>,
    stations: Vec<PoliceStation>,
    incidents: IncidentStore,
}

impl AppState {
    pub fn new(
        planner: Arc<dyn RoutePlanning>,
        hazards: Arc<HazardZoneIndex>,
        stations: Vec<PoliceStation>,
    ) -> Self {
        Self {
            planner,
            hazards,
            stations,
            incidents: IncidentStore::new(),
        }
    }

    /// Wire the OpenRouteService-backed planner and load zone/station data.
    pub fn from_config(config: &Config) -> Result<Self> {
        let hazards = match &config.hazard_zones_path {
            Some(path) => HazardZoneIndex::load(path, config.hazard_options())
                .with_context(|| format!("loading hazard zones from {}", path))?,
            None => HazardZoneIndex::new(builtin_zones(), config.hazard_options())
                .context("building built-in hazard zones")?,
        };
        let hazards = Arc::new(hazards);
        tracing::info!(
            "Loaded {} hazard zones ({} excluded at severity >= {:?})",
            hazards.zones().len(),
            hazards.excluded_zones().count(),
            config.min_excluded_severity
        );

        let stations = match &config.police_stations_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading police stations from {}", path))?;
                serde_json::from_str::<Vec<PoliceStation>>(&json)
                    .with_context(|| format!("parsing police stations from {}", path))?
            }
            None => builtin_stations(),
        };

        if config.ors_api_key.is_empty() {
            tracing::warn!("ORS_API_KEY is not set; geocoding and directions requests will likely be rejected");
        }
        let client = OrsClient::new(config.ors_config()).context("building HTTP client")?;
        let planner = SafeRoutePlanner::new(
            OrsGeocoder::new(client.clone()),
            OrsDirections::new(client),
            hazards.clone(),
        )
        .with_config(config.planner_config());

        Ok(Self::new(Arc::new(planner), hazards, stations))
    }

    pub fn planner(&self) -> &dyn RoutePlanning {
        self.planner.as_ref()
    }

    pub fn hazards(&self) -> &HazardZoneIndex {
        &self.hazards
    }

    pub fn stations(&self) -> &[PoliceStation] {
        &self.stations
    }

    pub fn incidents(&self) -> &IncidentStore {
        &self.incidents
    }
}
