//! Server configuration from environment.

use saferoute_core::perturb::DEFAULT_MAX_PERTURBATION_DEG;
use saferoute_core::{HazardCheckMode, HazardIndexOptions, PlannerConfig, Severity};
use saferoute_providers::{OrsConfig, DEFAULT_BASE_URL};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub ors_base_url: String,
    pub ors_api_key: String,
    /// JSON array of hazard zones; built-in zones are used when unset
    pub hazard_zones_path: Option<String>,
    pub min_excluded_severity: Severity,
    pub hazard_check: HazardCheckMode,
    pub max_perturbation_deg: f64,
    pub perturbation_seed: Option<u64>,
    /// Per-call budget for geocoder and directions requests
    pub http_timeout_s: u64,
    /// JSON array of police stations; built-in stations are used when unset
    pub police_stations_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SAFEROUTE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            ors_base_url: env::var("ORS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            ors_api_key: env::var("ORS_API_KEY").unwrap_or_default(),
            hazard_zones_path: env::var("SAFEROUTE_HAZARD_ZONES_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            min_excluded_severity: env::var("SAFEROUTE_MIN_EXCLUDED_SEVERITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            hazard_check: env::var("SAFEROUTE_HAZARD_CHECK")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            max_perturbation_deg: env::var("SAFEROUTE_MAX_PERTURBATION_DEG")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v: &f64| v.is_finite() && *v >= 0.0)
                .unwrap_or(DEFAULT_MAX_PERTURBATION_DEG),
            perturbation_seed: env::var("SAFEROUTE_PERTURBATION_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
            http_timeout_s: env::var("SAFEROUTE_HTTP_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(10),
            police_stations_path: env::var("SAFEROUTE_POLICE_STATIONS_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn hazard_options(&self) -> HazardIndexOptions {
        HazardIndexOptions {
            min_excluded_severity: self.min_excluded_severity,
            check_mode: self.hazard_check,
        }
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            max_perturbation_deg: self.max_perturbation_deg,
            call_timeout: Duration::from_secs(self.http_timeout_s),
            perturbation_seed: self.perturbation_seed,
        }
    }

    pub fn ors_config(&self) -> OrsConfig {
        OrsConfig::new(self.ors_api_key.clone())
            .with_base_url(self.ors_base_url.clone())
            .with_timeout(Duration::from_secs(self.http_timeout_s))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            ors_base_url: DEFAULT_BASE_URL.to_string(),
            ors_api_key: String::new(),
            hazard_zones_path: None,
            min_excluded_severity: Severity::Low,
            hazard_check: HazardCheckMode::Vertices,
            max_perturbation_deg: DEFAULT_MAX_PERTURBATION_DEG,
            perturbation_seed: None,
            http_timeout_s: 10,
            police_stations_path: None,
        }
    }
}
