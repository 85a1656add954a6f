//! Encoded polyline codec (Google polyline algorithm).
//!
//! Directions services ship route geometry as a compact ASCII string: each
//! coordinate is a zig-zag encoded delta from the previous one, split into
//! 5-bit chunks offset by 63.

use crate::models::{Coordinate, CoordinateError};
use thiserror::Error;

/// Decimal places used by OpenRouteService and Google for 2D geometry.
pub const DEFAULT_PRECISION: u32 = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolylineError {
    #[error("invalid polyline character at byte {0}")]
    InvalidCharacter(usize),
    #[error("polyline ended mid-value at byte {0}")]
    Truncated(usize),
    #[error("polyline value at byte {0} overflows")]
    Overflow(usize),
    #[error("decoded point {index} is not a valid coordinate: {source}")]
    OutOfRange {
        index: usize,
        #[source]
        source: CoordinateError,
    },
}

/// Decode an encoded polyline into coordinates.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, PolylineError> {
    let factor = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut index = 0usize;
    let mut lat = 0i64;
    let mut lon = 0i64;
    let mut points = Vec::with_capacity(bytes.len() / 4);

    while index < bytes.len() {
        lat += next_value(bytes, &mut index)?;
        lon += next_value(bytes, &mut index)?;

        let point = Coordinate::new(lat as f64 / factor, lon as f64 / factor).map_err(
            |source| PolylineError::OutOfRange {
                index: points.len(),
                source,
            },
        )?;
        points.push(point);
    }

    Ok(points)
}

/// Encode coordinates as a polyline string.
pub fn encode(points: &[Coordinate], precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat = 0i64;
    let mut prev_lon = 0i64;

    for point in points {
        let lat = (point.lat() * factor).round() as i64;
        let lon = (point.lon() * factor).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated(*index));
        };
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter(*index));
        }
        if shift > 60 {
            return Err(PolylineError::Overflow(start));
        }

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        *index += 1;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn push_value(out: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= 0x20 {
        out.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
        value >>= 5;
    }
    out.push((value as u8 + 63) as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn decodes_reference_polyline() {
        let points = decode(REFERENCE, DEFAULT_PRECISION).unwrap();
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(points.len(), expected.len());
        for (point, (lat, lon)) in points.iter().zip(expected) {
            assert!((point.lat() - lat).abs() < 1e-9);
            assert!((point.lon() - lon).abs() < 1e-9);
        }
    }

    #[test]
    fn encodes_reference_polyline() {
        let points = vec![
            Coordinate::new(38.5, -120.2).unwrap(),
            Coordinate::new(40.7, -120.95).unwrap(),
            Coordinate::new(43.252, -126.453).unwrap(),
        ];
        assert_eq!(encode(&points, DEFAULT_PRECISION), REFERENCE);
    }

    #[test]
    fn empty_string_is_empty_route() {
        assert!(decode("", DEFAULT_PRECISION).unwrap().is_empty());
    }

    #[test]
    fn rejects_truncated_input() {
        // Drop the final longitude chunk.
        let truncated = &REFERENCE[..REFERENCE.len() - 1];
        assert!(matches!(
            decode(truncated, DEFAULT_PRECISION),
            Err(PolylineError::Truncated(_))
        ));
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(matches!(
            decode("_p~iF ~ps|U", DEFAULT_PRECISION),
            Err(PolylineError::InvalidCharacter(5))
        ));
    }

    #[test]
    fn rejects_points_outside_valid_range() {
        let encoded = {
            let mut out = String::new();
            push_value(&mut out, 9_500_000);
            push_value(&mut out, 0);
            out
        };
        assert!(matches!(
            decode(&encoded, DEFAULT_PRECISION),
            Err(PolylineError::OutOfRange { index: 0, .. })
        ));
    }
}
