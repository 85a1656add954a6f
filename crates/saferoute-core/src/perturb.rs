//! Endpoint perturbation for route retries.

use crate::models::Coordinate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound on the per-axis perturbation, in degrees (~110 m).
pub const DEFAULT_MAX_PERTURBATION_DEG: f64 = 0.001;

/// Produces `(dlat, dlon)` offsets in degrees.
pub trait OffsetSource {
    fn next_offset(&mut self) -> (f64, f64);

    /// Shift `point` by the next offset, clamped to valid coordinate ranges.
    fn perturb(&mut self, point: Coordinate) -> Coordinate {
        let (dlat, dlon) = self.next_offset();
        point.offset(dlat, dlon)
    }
}

/// Uniform offsets in `[-max_deg, max_deg]` on each axis.
#[derive(Debug, Clone)]
pub struct RandomOffsets {
    rng: StdRng,
    max_deg: f64,
}

impl RandomOffsets {
    pub fn new(max_deg: f64) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            max_deg: sanitize_bound(max_deg),
        }
    }

    /// Deterministic sequence for reproducible runs.
    pub fn seeded(max_deg: f64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_deg: sanitize_bound(max_deg),
        }
    }

    pub fn max_deg(&self) -> f64 {
        self.max_deg
    }
}

impl OffsetSource for RandomOffsets {
    fn next_offset(&mut self) -> (f64, f64) {
        if self.max_deg <= 0.0 {
            return (0.0, 0.0);
        }
        let dlat = self.rng.random_range(-self.max_deg..=self.max_deg);
        let dlon = self.rng.random_range(-self.max_deg..=self.max_deg);
        (dlat, dlon)
    }
}

/// Replays a fixed list of offsets, cycling when exhausted.
#[derive(Debug, Clone, Default)]
pub struct FixedOffsets {
    offsets: Vec<(f64, f64)>,
    next: usize,
}

impl FixedOffsets {
    pub fn new(offsets: Vec<(f64, f64)>) -> Self {
        Self { offsets, next: 0 }
    }

    /// How many offsets have been handed out so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl OffsetSource for FixedOffsets {
    fn next_offset(&mut self) -> (f64, f64) {
        if self.offsets.is_empty() {
            self.next += 1;
            return (0.0, 0.0);
        }
        let offset = self.offsets[self.next % self.offsets.len()];
        self.next += 1;
        offset
    }
}

fn sanitize_bound(max_deg: f64) -> f64 {
    if max_deg.is_finite() && max_deg > 0.0 {
        max_deg
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_offsets_stay_in_bounds() {
        let mut offsets = RandomOffsets::new(0.001);
        for _ in 0..1000 {
            let (dlat, dlon) = offsets.next_offset();
            assert!(dlat.abs() <= 0.001);
            assert!(dlon.abs() <= 0.001);
        }
    }

    #[test]
    fn seeded_offsets_are_reproducible() {
        let mut a = RandomOffsets::seeded(0.001, 42);
        let mut b = RandomOffsets::seeded(0.001, 42);
        for _ in 0..20 {
            assert_eq!(a.next_offset(), b.next_offset());
        }
    }

    #[test]
    fn invalid_bound_disables_perturbation() {
        let mut offsets = RandomOffsets::seeded(f64::NAN, 1);
        assert_eq!(offsets.next_offset(), (0.0, 0.0));
        let mut offsets = RandomOffsets::seeded(-0.5, 1);
        assert_eq!(offsets.next_offset(), (0.0, 0.0));
    }

    #[test]
    fn fixed_offsets_cycle() {
        let mut offsets = FixedOffsets::new(vec![(0.001, 0.0), (0.0, -0.001)]);
        assert_eq!(offsets.next_offset(), (0.001, 0.0));
        assert_eq!(offsets.next_offset(), (0.0, -0.001));
        assert_eq!(offsets.next_offset(), (0.001, 0.0));
        assert_eq!(offsets.consumed(), 3);
    }

    #[test]
    fn perturb_applies_offset() {
        let mut offsets = FixedOffsets::new(vec![(0.0005, -0.0005)]);
        let moved = offsets.perturb(Coordinate::new(10.6, 76.3).unwrap());
        assert!((moved.lat() - 10.6005).abs() < 1e-12);
        assert!((moved.lon() - 76.2995).abs() < 1e-12);
    }
}
