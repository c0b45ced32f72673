// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Measurements and predicates shared by the partitioner, the coverage
//! expander and the manifest filter.
//!
//! All functions expect projected coordinates; lengths and areas are in
//! the unit of the CRS (metres for UTM).

use crate::GeomError;
use geo::{Area, Buffer, Contains, Coord, LineString, MultiPolygon, Point, Polygon};

/// Regions at or below this area (m²) are treated as empty.
pub const AREA_EPSILON: f64 = 1e-6;

/// Length of a ring or line string.
pub fn ring_length(ring: &LineString<f64>) -> f64 {
    ring.lines().map(|l| l.dx().hypot(l.dy())).sum()
}

/// Perimeter of a polygon: exterior plus every hole.
pub fn polygon_perimeter(polygon: &Polygon<f64>) -> f64 {
    ring_length(polygon.exterior()) + polygon.interiors().iter().map(ring_length).sum::<f64>()
}

/// Perimeter of every part of a multipolygon.
pub fn perimeter(region: &MultiPolygon<f64>) -> f64 {
    region.0.iter().map(polygon_perimeter).sum()
}

/// Perimeter-to-area ratio; lower is more compact.
///
/// Returns `None` for degenerate regions, which have no meaningful score.
///
/// ```
/// use geo::{polygon, MultiPolygon};
/// use survey_geom::complexity_score;
///
/// let square = MultiPolygon::new(vec![polygon![
///     (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0),
/// ]]);
/// assert_eq!(complexity_score(&square), Some(0.4));
/// ```
pub fn complexity_score(region: &MultiPolygon<f64>) -> Option<f64> {
    if is_degenerate(region) {
        return None;
    }
    Some(perimeter(region) / region.unsigned_area())
}

/// `true` when a region is empty, has non-finite coordinates or no area.
pub fn is_degenerate(region: &MultiPolygon<f64>) -> bool {
    if region.0.is_empty() {
        return true;
    }
    let finite = region.0.iter().all(|p| {
        std::iter::once(p.exterior())
            .chain(p.interiors())
            .all(|r| r.0.iter().all(|c| c.x.is_finite() && c.y.is_finite()))
    });
    if !finite {
        return true;
    }
    let area = region.unsigned_area();
    !area.is_finite() || area <= AREA_EPSILON
}

/// Grows a region outward by `distance`.
///
/// A zero distance returns the region unchanged.
pub fn buffer(region: &MultiPolygon<f64>, distance: f64) -> MultiPolygon<f64> {
    if distance == 0.0 {
        return region.clone();
    }
    region.buffer(distance)
}

/// Strict point-in-region test; boundary points are outside.
pub fn strictly_contains(region: &MultiPolygon<f64>, coord: Coord<f64>) -> bool {
    region.contains(&Point::from(coord))
}

/// Number of coordinates strictly inside a region.
pub fn count_strictly_within(region: &MultiPolygon<f64>, coords: &[Coord<f64>]) -> usize {
    coords
        .iter()
        .filter(|c| strictly_contains(region, **c))
        .count()
}

/// Rejects NaN and infinite coordinates.
pub fn check_finite<'a>(
    coords: impl IntoIterator<Item = &'a Coord<f64>>,
    context: &str,
) -> Result<(), GeomError> {
    for c in coords {
        if !c.x.is_finite() || !c.y.is_finite() {
            return Err(GeomError::NonFiniteCoordinate {
                x: c.x,
                y: c.y,
                context: context.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn unit_square(origin: f64, side: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: origin, y: origin),
            (x: origin + side, y: origin),
            (x: origin + side, y: origin + side),
            (x: origin, y: origin + side),
        ]])
    }

    #[test]
    fn test_perimeter_counts_holes() {
        let with_hole = MultiPolygon::new(vec![polygon!(
            exterior: [
                (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0),
            ],
            interiors: [
                [(x: 4.0, y: 4.0), (x: 6.0, y: 4.0), (x: 6.0, y: 6.0), (x: 4.0, y: 6.0)],
            ],
        )]);
        assert!((perimeter(&with_hole) - 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_complexity_prefers_compact() {
        let square = unit_square(0.0, 100.0);
        let strip = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0), (x: 1000.0, y: 0.0), (x: 1000.0, y: 10.0), (x: 0.0, y: 10.0),
        ]]);
        // Same area, very different shape.
        let cs = complexity_score(&square).unwrap();
        let ss = complexity_score(&strip).unwrap();
        assert!((cs - 0.04).abs() < 1e-12);
        assert!(ss > cs * 4.0);
    }

    #[test]
    fn test_degenerate() {
        assert!(is_degenerate(&MultiPolygon::new(vec![])));
        let flat = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0),
        ]]);
        assert!(is_degenerate(&flat));
        assert_eq!(complexity_score(&flat), None);
        assert!(!is_degenerate(&unit_square(0.0, 1.0)));
    }

    #[test]
    fn test_buffer_grows() {
        let sq = unit_square(0.0, 10.0);
        let grown = buffer(&sq, 5.0);
        assert!(grown.unsigned_area() > sq.unsigned_area());
        assert!(strictly_contains(&grown, Coord { x: -4.0, y: 5.0 }));
        assert!(!strictly_contains(&grown, Coord { x: -6.0, y: 5.0 }));
    }

    #[test]
    fn test_buffer_zero_is_identity() {
        let sq = unit_square(0.0, 10.0);
        assert_eq!(buffer(&sq, 0.0), sq);
    }

    #[test]
    fn test_count_strictly_within_excludes_boundary() {
        let sq = unit_square(0.0, 10.0);
        let pts = [
            Coord { x: 5.0, y: 5.0 },
            Coord { x: 0.0, y: 5.0 },
            Coord { x: 10.0, y: 10.0 },
            Coord { x: 9.9, y: 0.1 },
            Coord { x: 20.0, y: 5.0 },
        ];
        assert_eq!(count_strictly_within(&sq, &pts), 2);
    }

    #[test]
    fn test_check_finite() {
        let ok = [Coord { x: 1.0, y: 2.0 }];
        assert!(check_finite(ok.iter(), "t").is_ok());
        let bad = [Coord { x: f64::INFINITY, y: 2.0 }];
        assert!(matches!(
            check_finite(bad.iter(), "t"),
            Err(GeomError::NonFiniteCoordinate { .. })
        ));
    }
}
