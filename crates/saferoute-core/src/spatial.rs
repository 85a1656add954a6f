//! Spatial math for hazard checks and distance calculations.

use crate::models::Coordinate;

/// Flat meters-per-degree factor used by the planar hazard metric.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Planar approximation of the distance between two points in meters.
///
/// Euclidean distance in degree space scaled by [`METERS_PER_DEGREE`]. Longitude
/// degrees are not shrunk by latitude, so east/west distances are overstated
/// away from the equator. Adequate for zone radii of a few hundred meters to a
/// few kilometers at low latitudes; not geodesically exact.
pub fn planar_distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = a.lat() - b.lat();
    let dlon = a.lon() - b.lon();
    (dlat * dlat + dlon * dlon).sqrt() * METERS_PER_DEGREE
}

/// Minimum planar distance from `point` to the segment `seg_start`..`seg_end`, in meters.
///
/// Uses the same degree-space metric as [`planar_distance_m`].
pub fn planar_distance_to_segment_m(
    point: Coordinate,
    seg_start: Coordinate,
    seg_end: Coordinate,
) -> f64 {
    let px = point.lon() - seg_start.lon();
    let py = point.lat() - seg_start.lat();
    let sx = seg_end.lon() - seg_start.lon();
    let sy = seg_end.lat() - seg_start.lat();

    let seg_len_sq = sx * sx + sy * sy;
    if seg_len_sq <= f64::EPSILON {
        return planar_distance_m(point, seg_start);
    }

    // Project point onto segment line: t = ((P-A) · (B-A)) / |B-A|²
    let t = ((px * sx + py * sy) / seg_len_sq).clamp(0.0, 1.0);
    let dx = px - t * sx;
    let dy = py - t * sy;

    (dx * dx + dy * dy).sqrt() * METERS_PER_DEGREE
}

/// Great-circle distance between two points in meters (Haversine formula).
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat().to_radians();
    let phi2 = b.lat().to_radians();
    let dphi = (b.lat() - a.lat()).to_radians();
    let dlambda = (b.lon() - a.lon()).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}
