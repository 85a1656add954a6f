pub mod hazards;
pub mod models;
pub mod perturb;
pub mod planner;
pub mod polyline;
pub mod provider;
pub mod spatial;
pub mod stations;

pub use hazards::{HazardCheckMode, HazardConfigError, HazardIndexOptions, HazardZoneIndex};
pub use models::{
    Coordinate, CoordinateError, CreateIncidentRequest, DeleteIncidentRequest, HazardZone,
    Incident, LocationDescriptor, PlanStatus, PlanningAttempt, Route, RoutePlanRequest,
    RoutePlanResponse, RouteSummary, Severity, VoteRequest, VoteType,
};
pub use perturb::{FixedOffsets, OffsetSource, RandomOffsets};
pub use planner::{Endpoint, PlannerConfig, PlanningResult, SafeRoutePlanner, MAX_ATTEMPTS};
pub use provider::{GeocodeError, Geocoder, RouteProvider, RouteProviderError};
pub use stations::{nearest_station, NearestStation, PoliceStation};
