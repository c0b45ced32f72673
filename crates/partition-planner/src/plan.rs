// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partition plan: the output of the partitioner.
//!
//! A plan is an ordered sequence of [`Cell`]s. Each cell is one unit of
//! parallel work; worker `i` of the compute array processes cell `i`. The
//! plan is the contract between the partitioner, the job selector and the
//! coverage expander.

use crate::PlannerError;
use geo::{Area, MultiPolygon};
use survey_geom::{complexity_score, is_degenerate};

/// One polygon of the partition, addressed by its position.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Cell {
    /// Index of this cell in the plan; equals the worker index that owns it.
    pub index: usize,
    /// Cell geometry in the survey CRS. May have several parts when a
    /// concave survey boundary splits a region.
    pub geometry: MultiPolygon<f64>,
    /// Perimeter / area of `geometry`.
    pub complexity: f64,
}

impl Cell {
    /// Enclosed area in square metres.
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    /// Number of disjoint parts.
    pub fn num_parts(&self) -> usize {
        self.geometry.0.len()
    }
}

/// The complete partition produced by a [`crate::PartitionStrategy`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct PartitionPlan {
    /// Strategy name that produced this plan.
    pub strategy_name: String,
    /// The number of cells that was asked for.
    pub requested: usize,
    /// Ordered cells.
    pub cells: Vec<Cell>,
    /// Mean complexity after every optimizer iteration; empty for
    /// deterministic strategies.
    pub trace: Vec<f64>,
}

impl PartitionPlan {
    /// Returns the number of cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Sum of all cell areas.
    pub fn total_area(&self) -> f64 {
        self.cells.iter().map(Cell::area).sum()
    }

    /// Mean complexity score across cells (the optimizer objective).
    pub fn mean_complexity(&self) -> f64 {
        if self.cells.is_empty() {
            return f64::INFINITY;
        }
        self.cells.iter().map(|c| c.complexity).sum::<f64>() / self.cells.len() as f64
    }

    /// Returns the cell for a worker index.
    pub fn select(&self, index: i64) -> Result<&Cell, PlannerError> {
        crate::select(&self.cells, index)
    }

    /// Validates the plan.
    ///
    /// Checks:
    /// - Plan is non-empty.
    /// - No more cells than requested.
    /// - Cell indices are consecutive starting from 0.
    /// - No degenerate cells.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.cells.is_empty() {
            return Err(PlannerError::StrategyFailed {
                strategy: self.strategy_name.clone(),
                detail: "plan contains no cells".into(),
            });
        }

        if self.cells.len() > self.requested {
            return Err(PlannerError::StrategyFailed {
                strategy: self.strategy_name.clone(),
                detail: format!(
                    "{} cells produced but only {} requested",
                    self.cells.len(),
                    self.requested,
                ),
            });
        }

        for (expected, cell) in self.cells.iter().enumerate() {
            if cell.index != expected {
                return Err(PlannerError::StrategyFailed {
                    strategy: self.strategy_name.clone(),
                    detail: format!("expected cell index {expected}, got {}", cell.index),
                });
            }
            if is_degenerate(&cell.geometry) {
                return Err(PlannerError::StrategyFailed {
                    strategy: self.strategy_name.clone(),
                    detail: format!("cell {} is degenerate", cell.index),
                });
            }
        }

        Ok(())
    }

    /// Returns a human-readable summary of the plan.
    pub fn summary(&self) -> String {
        let areas: Vec<f64> = self.cells.iter().map(Cell::area).collect();
        let (min, max) = areas
            .iter()
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), &a| (lo.min(a), hi.max(a)));
        let mean = if areas.is_empty() {
            0.0
        } else {
            self.total_area() / areas.len() as f64
        };

        let mut s = format!(
            "Plan '{}': {}/{} cells, {:.3} km² total, cell area mean {:.0} m² \
             (min {:.0}, max {:.0}), mean complexity {:.5}",
            self.strategy_name,
            self.num_cells(),
            self.requested,
            self.total_area() / 1.0e6,
            mean,
            if areas.is_empty() { 0.0 } else { min },
            max,
            self.mean_complexity(),
        );
        if let (Some(first), Some(last)) = (self.trace.first(), self.trace.last()) {
            s.push_str(&format!(
                ", {} iterations ({:.5} → {:.5})",
                self.trace.len(),
                first,
                last,
            ));
        }
        s
    }
}

/// A plan that came up short of the requested cell count.
///
/// Produced when clipping drops degenerate regions, or when the grid search
/// converges below `k`. The plan itself is valid and usable; callers decide
/// whether the idle workers are acceptable.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PartialPartition {
    pub plan: PartitionPlan,
}

impl PartialPartition {
    pub fn requested(&self) -> usize {
        self.plan.requested
    }

    pub fn produced(&self) -> usize {
        self.plan.num_cells()
    }

    /// Number of workers that will have no cell.
    pub fn shortfall(&self) -> usize {
        self.requested().saturating_sub(self.produced())
    }
}

/// Outcome of a partitioning run.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Partition {
    /// Exactly `k` cells.
    Complete(PartitionPlan),
    /// Fewer than `k` cells.
    Partial(PartialPartition),
}

impl Partition {
    /// Classifies a plan by comparing its length with the request.
    pub fn from_plan(plan: PartitionPlan) -> Self {
        if plan.num_cells() < plan.requested {
            Partition::Partial(PartialPartition { plan })
        } else {
            Partition::Complete(plan)
        }
    }

    pub fn plan(&self) -> &PartitionPlan {
        match self {
            Partition::Complete(plan) => plan,
            Partition::Partial(partial) => &partial.plan,
        }
    }

    pub fn into_plan(self) -> PartitionPlan {
        match self {
            Partition::Complete(plan) => plan,
            Partition::Partial(partial) => partial.plan,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Partition::Partial(_))
    }
}

/// Builder helper for constructing a `PartitionPlan` incrementally.
///
/// Used internally by strategy implementations. Degenerate regions are
/// dropped on insertion so indices stay consecutive.
pub(crate) struct PlanBuilder {
    strategy_name: String,
    requested: usize,
    cells: Vec<Cell>,
    trace: Vec<f64>,
    dropped: usize,
}

impl PlanBuilder {
    /// Creates a new builder.
    pub fn new(strategy_name: &str, requested: usize) -> Self {
        Self {
            strategy_name: strategy_name.to_string(),
            requested,
            cells: Vec::with_capacity(requested),
            trace: Vec::new(),
            dropped: 0,
        }
    }

    /// Appends a region as the next cell. Returns `false` (and keeps no
    /// cell) when the region is degenerate.
    pub fn add_region(&mut self, geometry: MultiPolygon<f64>) -> bool {
        match complexity_score(&geometry) {
            Some(complexity) => {
                let index = self.cells.len();
                self.cells.push(Cell {
                    index,
                    geometry,
                    complexity,
                });
                true
            }
            None => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Attaches the optimizer convergence trace.
    pub fn with_trace(mut self, trace: Vec<f64>) -> Self {
        self.trace = trace;
        self
    }

    /// Consumes the builder and returns the finished plan.
    pub fn build(self) -> PartitionPlan {
        if self.dropped > 0 {
            tracing::warn!(
                "{}: dropped {} degenerate region(s) after clipping",
                self.strategy_name,
                self.dropped,
            );
        }
        PartitionPlan {
            strategy_name: self.strategy_name,
            requested: self.requested,
            cells: self.cells,
            trace: self.trace,
        }
    }

    /// Builds, validates and classifies the plan.
    pub fn finish(self) -> Result<Partition, PlannerError> {
        let plan = self.build();
        plan.validate()?;
        Ok(Partition::from_plan(plan))
    }
}
