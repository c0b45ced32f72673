// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded Voronoi tessellation by half-plane clipping.
//!
//! The Voronoi region of seed `i` is the intersection of the half-planes
//! `{ p : |p - s_i| <= |p - s_j| }` over every other seed `j`. Starting from
//! a finite square frame and clipping it against each bisector yields the
//! region directly as a convex polygon; boundary regions, which are
//! unbounded in the true diagram, are closed off by the frame.
//!
//! Cost is O(k²) clips per tessellation, which is fine for the tens of
//! cells a compute array uses.

use geo::{Coord, LineString, Polygon};

/// A square frame enclosing both the seeds and the survey bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub centre: Coord<f64>,
    pub half_side: f64,
}

impl Frame {
    /// Frame centred on the seed centroid, with a half side of twice the
    /// larger of the seed spread and `min_extent`.
    pub fn around(seeds: &[Coord<f64>], min_extent: f64) -> Self {
        let n = seeds.len().max(1) as f64;
        let sum = seeds
            .iter()
            .fold(Coord { x: 0.0, y: 0.0 }, |acc, c| acc + *c);
        let centre = Coord {
            x: sum.x / n,
            y: sum.y / n,
        };

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for c in seeds {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }
        let spread = if seeds.is_empty() {
            0.0
        } else {
            (max_x - min_x).max(max_y - min_y)
        };

        let extent = spread.max(min_extent);
        let half_side = if extent > 0.0 { 2.0 * extent } else { 1.0 };
        Self { centre, half_side }
    }

    fn corners(&self) -> Vec<Coord<f64>> {
        let Coord { x, y } = self.centre;
        let h = self.half_side;
        vec![
            Coord { x: x - h, y: y - h },
            Coord { x: x + h, y: y - h },
            Coord { x: x + h, y: y + h },
            Coord { x: x - h, y: y + h },
        ]
    }
}

/// Keeps the part of a convex polygon on the `keep` side of the bisector
/// between `site` and `other` (Sutherland–Hodgman, one edge).
pub fn clip_half_plane(
    ring: &[Coord<f64>],
    site: Coord<f64>,
    other: Coord<f64>,
) -> Vec<Coord<f64>> {
    let normal = other - site;
    let mid = Coord {
        x: (site.x + other.x) / 2.0,
        y: (site.y + other.y) / 2.0,
    };
    // <= 0 on the site's side.
    let side = |p: Coord<f64>| (p.x - mid.x) * normal.x + (p.y - mid.y) * normal.y;

    let mut out = Vec::with_capacity(ring.len() + 1);
    for (i, &current) in ring.iter().enumerate() {
        let previous = ring[(i + ring.len() - 1) % ring.len()];
        let d_cur = side(current);
        let d_prev = side(previous);

        if d_cur <= 0.0 {
            if d_prev > 0.0 {
                out.push(crossing(previous, current, d_prev, d_cur));
            }
            out.push(current);
        } else if d_prev <= 0.0 {
            out.push(crossing(previous, current, d_prev, d_cur));
        }
    }
    out
}

fn crossing(a: Coord<f64>, b: Coord<f64>, da: f64, db: f64) -> Coord<f64> {
    let t = da / (da - db);
    Coord {
        x: a.x + t * (b.x - a.x),
        y: a.y + t * (b.y - a.y),
    }
}

/// One convex region per seed, in seed order. Regions are unclipped
/// against the survey area. When seeds coincide the first one keeps the
/// region and the later duplicates get an empty one.
pub fn voronoi_regions(seeds: &[Coord<f64>], frame: Frame) -> Vec<Polygon<f64>> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, &site)| {
            let mut ring = frame.corners();
            for (j, &other) in seeds.iter().enumerate() {
                if i == j {
                    continue;
                }
                if other == site {
                    if j < i {
                        ring.clear();
                        break;
                    }
                    continue;
                }
                ring = clip_half_plane(&ring, site, other);
                if ring.len() < 3 {
                    ring.clear();
                    break;
                }
            }
            Polygon::new(LineString::from(ring), vec![])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_frame_covers_spread() {
        let f = Frame::around(&[c(0.0, 0.0), c(10.0, 4.0)], 0.0);
        assert_eq!(f.centre, c(5.0, 2.0));
        assert_eq!(f.half_side, 20.0);
    }

    #[test]
    fn test_frame_single_point_uses_min_extent() {
        let f = Frame::around(&[c(3.0, 3.0)], 50.0);
        assert_eq!(f.half_side, 100.0);
        let f = Frame::around(&[c(3.0, 3.0)], 0.0);
        assert_eq!(f.half_side, 1.0);
    }

    #[test]
    fn test_clip_half_plane_square() {
        let square = vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(0.0, 10.0)];
        // Bisector between (2,5) and (8,5) is x = 5.
        let left = clip_half_plane(&square, c(2.0, 5.0), c(8.0, 5.0));
        let poly = Polygon::new(LineString::from(left.clone()), vec![]);
        assert!((poly.unsigned_area() - 50.0).abs() < 1e-9);
        assert!(left.iter().all(|p| p.x <= 5.0 + 1e-12));
    }

    #[test]
    fn test_two_seeds_split_frame_evenly() {
        let seeds = [c(-1.0, 0.0), c(1.0, 0.0)];
        let frame = Frame::around(&seeds, 0.0);
        let regions = voronoi_regions(&seeds, frame);
        assert_eq!(regions.len(), 2);
        let total = (2.0 * frame.half_side).powi(2);
        for r in &regions {
            assert!((r.unsigned_area() - total / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_regions_tile_frame() {
        let seeds = [c(1.0, 1.0), c(7.0, 2.0), c(4.0, 8.0), c(9.0, 9.0)];
        let frame = Frame::around(&seeds, 10.0);
        let regions = voronoi_regions(&seeds, frame);
        let sum: f64 = regions.iter().map(|r| r.unsigned_area()).sum();
        let total = (2.0 * frame.half_side).powi(2);
        assert!((sum - total).abs() / total < 1e-9);
    }

    #[test]
    fn test_coincident_seeds_first_keeps_region() {
        let seeds = [c(1.0, 1.0), c(6.0, 1.0), c(1.0, 1.0)];
        let frame = Frame::around(&seeds, 4.0);
        let regions = voronoi_regions(&seeds, frame);
        assert_eq!(regions.len(), 3);
        assert!(regions[0].unsigned_area() > 0.0);
        assert_eq!(regions[2].unsigned_area(), 0.0);
        let sum: f64 = regions.iter().map(|r| r.unsigned_area()).sum();
        let total = (2.0 * frame.half_side).powi(2);
        assert!((sum - total).abs() / total < 1e-9);
    }
}
