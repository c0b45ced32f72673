// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded outward growth of a cell under a control point quota.
//!
//! Step `n` (0 = initial) buffers the *original* cell by
//! `initial_buffer + n × step_size`. Buffering the original by the total
//! distance gives the same region as buffering repeatedly, without the
//! vertex count growing on every step. The distances increase strictly,
//! so a cell never shrinks.

use crate::CoverageError;
use geo::{Area, MultiPolygon};
use partition_planner::Cell;
use survey_geom::{buffer, ControlPointSet, GeomError};

/// Default minimum number of control points per cell.
pub const DEFAULT_MIN_COUNT: usize = 5;
/// Default buffer increment per growth step (m).
pub const DEFAULT_STEP_SIZE: f64 = 30.0;
/// Default buffer applied before the first count (m).
pub const DEFAULT_INITIAL_BUFFER: f64 = 50.0;
/// Default cap on additional growth steps.
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Growth policy.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CoverageParams {
    /// Control points that must lie strictly inside the grown cell.
    #[serde(rename = "min_control_points")]
    pub min_count: usize,
    /// Extra buffer distance per growth step (m).
    pub step_size: f64,
    /// Buffer distance before the first count (m).
    pub initial_buffer: f64,
    /// Growth steps allowed after the initial buffer.
    pub max_steps: usize,
}

impl Default for CoverageParams {
    fn default() -> Self {
        Self {
            min_count: DEFAULT_MIN_COUNT,
            step_size: DEFAULT_STEP_SIZE,
            initial_buffer: DEFAULT_INITIAL_BUFFER,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl CoverageParams {
    /// Rejects parameters that could shrink a cell or stall growth.
    pub fn validate(&self) -> Result<(), CoverageError> {
        if !self.initial_buffer.is_finite() || self.initial_buffer < 0.0 {
            return Err(CoverageError::InvalidParameter(format!(
                "initial buffer must be a non-negative distance, got {}",
                self.initial_buffer
            )));
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(CoverageError::InvalidParameter(format!(
                "step size must be positive, got {}",
                self.step_size
            )));
        }
        Ok(())
    }

    /// Total buffer distance at growth step `step`.
    pub fn distance_at(&self, step: usize) -> f64 {
        self.initial_buffer + step as f64 * self.step_size
    }
}

/// A cell after coverage growth.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExpandedCell {
    /// Index of the source cell.
    pub index: usize,
    /// Buffered geometry.
    pub geometry: MultiPolygon<f64>,
    /// Total buffer distance applied (m).
    pub buffer_distance: f64,
    /// Growth steps taken after the initial buffer.
    pub steps: usize,
    /// Control points strictly inside `geometry`.
    pub control_points: usize,
}

impl ExpandedCell {
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}

/// Grows cells until they satisfy [`CoverageParams::min_count`].
#[derive(Debug, Clone, Default)]
pub struct CoverageExpander {
    params: CoverageParams,
}

impl CoverageExpander {
    pub fn new(params: CoverageParams) -> Result<Self, CoverageError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &CoverageParams {
        &self.params
    }

    /// Grows `cell` until at least `min_count` points of `control` are
    /// strictly inside, or the step budget runs out.
    pub fn expand(
        &self,
        cell: &Cell,
        control: &ControlPointSet,
    ) -> Result<ExpandedCell, CoverageError> {
        let p = &self.params;

        let mut step = 0;
        loop {
            let distance = p.distance_at(step);
            let grown = buffer(&cell.geometry, distance);
            let found = control.count_within(&grown);
            tracing::debug!(
                "cell {}: step {step}, buffer {distance} m → {found}/{} control points",
                cell.index,
                p.min_count,
            );

            if found >= p.min_count {
                tracing::info!(
                    "cell {} covered by {found} control points after {step} growth steps ({distance} m buffer)",
                    cell.index,
                );
                return Ok(ExpandedCell {
                    index: cell.index,
                    geometry: grown,
                    buffer_distance: distance,
                    steps: step,
                    control_points: found,
                });
            }

            if step >= p.max_steps {
                tracing::warn!(
                    "cell {}: coverage budget exhausted with {found}/{} control points",
                    cell.index,
                    p.min_count,
                );
                return Err(CoverageError::Insufficient {
                    cell_index: cell.index,
                    found,
                    required: p.min_count,
                    steps: step,
                    buffer_distance: distance,
                });
            }
            step += 1;
        }
    }

    /// Like [`expand`](Self::expand), but first checks that the cell and
    /// the control points share a coordinate system.
    pub fn expand_in(
        &self,
        cell: &Cell,
        cell_crs: survey_geom::Crs,
        control: &ControlPointSet,
    ) -> Result<ExpandedCell, CoverageError> {
        if control.crs() != cell_crs {
            return Err(GeomError::CrsMismatch {
                expected: cell_crs,
                actual: control.crs(),
            }
            .into());
        }
        self.expand(cell, control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Coord};
    use survey_geom::Crs;

    fn utm() -> Crs {
        Crs::from_epsg(26911).unwrap()
    }

    fn cell() -> Cell {
        Cell {
            index: 3,
            geometry: MultiPolygon::new(vec![polygon![
                (x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 100.0), (x: 0.0, y: 100.0),
            ]]),
            complexity: 0.04,
        }
    }

    fn points(coords: &[(f64, f64)]) -> ControlPointSet {
        ControlPointSet::new(coords.iter().map(|&(x, y)| Coord { x, y }).collect(), utm()).unwrap()
    }

    fn params(min_count: usize, step_size: f64, initial_buffer: f64, max_steps: usize) -> CoverageParams {
        CoverageParams {
            min_count,
            step_size,
            initial_buffer,
            max_steps,
        }
    }

    #[test]
    fn test_already_covered() {
        let cp = points(&[(10.0, 10.0), (50.0, 50.0)]);
        let e = CoverageExpander::new(params(2, 10.0, 0.0, 5)).unwrap();
        let out = e.expand(&cell(), &cp).unwrap();
        assert_eq!(out.steps, 0);
        assert_eq!(out.control_points, 2);
        assert_eq!(out.geometry, cell().geometry);
    }

    #[test]
    fn test_grows_until_covered() {
        // Point 45 m east of the cell: reached at 50 m, i.e. after 2 steps of 20 m past 10 m.
        let cp = points(&[(50.0, 50.0), (145.0, 50.0)]);
        let e = CoverageExpander::new(params(2, 20.0, 10.0, 10)).unwrap();
        let out = e.expand(&cell(), &cp).unwrap();
        assert_eq!(out.steps, 2);
        assert_eq!(out.buffer_distance, 50.0);
        assert_eq!(out.index, 3);
        assert!(out.control_points >= 2);
    }

    #[test]
    fn test_never_shrinks() {
        let cp = points(&[(400.0, 400.0)]);
        let e = CoverageExpander::new(params(1, 25.0, 5.0, 20)).unwrap();
        let out = e.expand(&cell(), &cp).unwrap();
        assert!(out.area() > 10_000.0);
        assert!(survey_geom::strictly_contains(&out.geometry, Coord { x: 50.0, y: 50.0 }));
    }

    #[test]
    fn test_zero_points_bounded_failure() {
        let cp = points(&[]);
        let e = CoverageExpander::new(params(3, 30.0, 50.0, 5)).unwrap();
        match e.expand(&cell(), &cp) {
            Err(CoverageError::Insufficient {
                cell_index,
                found,
                required,
                steps,
                buffer_distance,
            }) => {
                assert_eq!(cell_index, 3);
                assert_eq!(found, 0);
                assert_eq!(required, 3);
                assert_eq!(steps, 5);
                assert_eq!(buffer_distance, 200.0);
            }
            other => panic!("expected Insufficient, got {other:?}"),
        }
    }

    #[test]
    fn test_min_count_zero() {
        let e = CoverageExpander::new(params(0, 30.0, 50.0, 0)).unwrap();
        let out = e.expand(&cell(), &points(&[])).unwrap();
        assert_eq!(out.steps, 0);
        assert_eq!(out.buffer_distance, 50.0);
    }

    #[test]
    fn test_invalid_params() {
        assert!(CoverageExpander::new(params(1, 0.0, 0.0, 5)).is_err());
        assert!(CoverageExpander::new(params(1, 10.0, -1.0, 5)).is_err());
        assert!(CoverageExpander::new(params(1, f64::NAN, 0.0, 5)).is_err());
    }

    #[test]
    fn test_crs_mismatch() {
        let cp = ControlPointSet::new(vec![Coord { x: -114.0, y: 46.0 }], Crs::Wgs84).unwrap();
        let e = CoverageExpander::default();
        assert!(matches!(
            e.expand_in(&cell(), utm(), &cp),
            Err(CoverageError::Geometry(GeomError::CrsMismatch { .. }))
        ));
    }

    #[test]
    fn test_params_from_toml() {
        let p: CoverageParams = toml::from_str("min_control_points = 8\nmax_steps = 3").unwrap();
        assert_eq!(p.min_count, 8);
        assert_eq!(p.max_steps, 3);
        assert_eq!(p.step_size, DEFAULT_STEP_SIZE);
    }
}
