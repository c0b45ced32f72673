// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Grid-size search strategy.
//!
//! Tiles the survey bounding box with axis-aligned squares and keeps the
//! squares that touch the survey polygon. The side length starts small and
//! grows in fixed steps until no more than `k` squares survive.
//!
//! # Properties
//! - Deterministic; no seed.
//! - Approximate: the count usually lands *below* `k` because it can only
//!   move in steps of whole rows/columns. The result is then
//!   [`crate::Partition::Partial`].
//! - Squares are kept whole, so cells may reach past the survey boundary.
//!
//! # Cost
//! Each step is O(bbox_area / side²) intersection tests. Steps whose
//! square count provably exceeds `k` (area / side² > k) are skipped
//! without tiling.

use crate::plan::PlanBuilder;
use crate::strategy::{check_request, PartitionStrategy};
use crate::{Partition, PlannerError};
use geo::{Coord, Intersects, MultiPolygon, Rect};
use survey_geom::{SurveyArea, Validated};

/// Default starting side length (m).
pub const DEFAULT_INITIAL_SIDE: f64 = 10.0;
/// Default side increment per step (m).
pub const DEFAULT_SIDE_STEP: f64 = 10.0;
/// Default cap on side-length steps.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Coarsening grid search.
#[derive(Debug, Clone)]
pub struct GridSearch {
    initial_side: f64,
    side_step: f64,
    max_iterations: usize,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_SIDE, DEFAULT_SIDE_STEP, DEFAULT_MAX_ITERATIONS)
    }
}

impl GridSearch {
    pub fn new(initial_side: f64, side_step: f64, max_iterations: usize) -> Self {
        Self {
            initial_side,
            side_step,
            max_iterations,
        }
    }

    pub fn initial_side(&self) -> f64 {
        self.initial_side
    }

    pub fn side_step(&self) -> f64 {
        self.side_step
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn check_params(&self) -> Result<(), PlannerError> {
        if !self.initial_side.is_finite() || self.initial_side <= 0.0 {
            return Err(PlannerError::InvalidRequest(format!(
                "grid initial side must be positive, got {}",
                self.initial_side
            )));
        }
        if !self.side_step.is_finite() || self.side_step <= 0.0 {
            return Err(PlannerError::InvalidRequest(format!(
                "grid side step must be positive, got {}",
                self.side_step
            )));
        }
        Ok(())
    }
}

/// Squares of `side` tiling `bounds`, x-major, that intersect the area.
/// Stops once more than `limit` squares have been kept.
fn tile(area: &SurveyArea<Validated>, side: f64, limit: usize) -> Vec<Rect<f64>> {
    let bounds = area.bounds();
    let min = bounds.min();
    let nx = (bounds.width() / side).ceil().max(1.0) as usize;
    let ny = (bounds.height() / side).ceil().max(1.0) as usize;

    let mut kept = Vec::new();
    for ix in 0..nx {
        let x = min.x + ix as f64 * side;
        for iy in 0..ny {
            let y = min.y + iy as f64 * side;
            let square = Rect::new(Coord { x, y }, Coord { x: x + side, y: y + side });
            if area.polygon().intersects(&square) {
                kept.push(square);
                if kept.len() > limit {
                    return kept;
                }
            }
        }
    }
    kept
}

impl PartitionStrategy for GridSearch {
    fn name(&self) -> &str {
        "grid"
    }

    fn partition(
        &self,
        area: &SurveyArea<Validated>,
        k: usize,
    ) -> Result<Partition, PlannerError> {
        check_request(self.name(), k)?;
        self.check_params()?;

        let surface = area.area();
        let mut side = self.initial_side;

        for iteration in 0..self.max_iterations {
            side = self.initial_side + iteration as f64 * self.side_step;

            // Squares cover the polygon, so there are at least area / side² of them.
            if surface / (side * side) > k as f64 {
                continue;
            }

            let squares = tile(area, side, k);
            tracing::debug!(
                "grid: side {side} m → {}{} squares",
                squares.len(),
                if squares.len() > k { "+" } else { "" },
            );
            if squares.len() > k {
                continue;
            }

            tracing::info!(
                "grid: side {side} m gives {} cells (target {k}) after {} steps",
                squares.len(),
                iteration + 1,
            );
            let mut builder = PlanBuilder::new(self.name(), k);
            for square in squares {
                builder.add_region(MultiPolygon::new(vec![square.to_polygon()]));
            }
            return builder.finish();
        }

        Err(PlannerError::SearchExhausted {
            iterations: self.max_iterations,
            side,
            requested: k,
        })
    }
}
