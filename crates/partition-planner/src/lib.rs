// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partition-planner
//!
//! Splits a validated [`SurveyArea`] into at most `k` addressable cells
//! using pluggable strategies, and maps worker indices onto those cells.
//!
//! # Strategies
//!
//! | Strategy | Cells | Deterministic | Shape |
//! |---|---|---|---|
//! | [`GridSearch`] | ≤ k (often fewer) | Yes | Squares, may cross the boundary |
//! | [`VoronoiOptimizer`] | k (minus degenerate clips) | Per seed | Compact, clipped to the area |
//! | [`ExternalCells`] | As supplied | Yes | As supplied, clipped |
//!
//! A result with fewer than `k` cells is returned as
//! [`Partition::Partial`] so callers can see that some workers will idle.
//!
//! # Trait-Based Extensibility
//!
//! ```ignore
//! struct Strips;
//! impl PartitionStrategy for Strips {
//!     fn name(&self) -> &str { "strips" }
//!     fn partition(&self, area: &SurveyArea<Validated>, k: usize)
//!         -> Result<Partition, PlannerError> { /* ... */ }
//! }
//! ```
//!
//! # Example
//! ```
//! use geo::polygon;
//! use partition_planner::{partition, select, VoronoiOptimizer};
//! use survey_geom::{Crs, SurveyArea};
//!
//! let area = SurveyArea::new(
//!     polygon![(x: 0.0, y: 0.0), (x: 1000.0, y: 0.0), (x: 1000.0, y: 1000.0), (x: 0.0, y: 1000.0)],
//!     Crs::from_epsg(26911).unwrap(),
//! )
//! .validate()
//! .unwrap();
//!
//! let result = partition(&area, 4, &VoronoiOptimizer::new(0).with_max_iterations(10)).unwrap();
//! let cell = select(&result.plan().cells, 2).unwrap();
//! assert_eq!(cell.index, 2);
//! ```

mod error;
pub(crate) mod plan;
mod select;
pub mod strategy;
pub mod tessellation;

pub use error::PlannerError;
pub use plan::{Cell, PartialPartition, Partition, PartitionPlan};
pub use select::select;
pub use strategy::external::ExternalCells;
pub use strategy::grid::GridSearch;
pub use strategy::voronoi::VoronoiOptimizer;
pub use strategy::PartitionStrategy;

use survey_geom::{SurveyArea, Validated};

/// Partitions `area` into at most `k` cells with the given strategy.
pub fn partition(
    area: &SurveyArea<Validated>,
    k: usize,
    strategy: &dyn PartitionStrategy,
) -> Result<Partition, PlannerError> {
    tracing::info!(
        "partitioning {:.3} km² into {k} cells with '{}'",
        area.area() / 1.0e6,
        strategy.name(),
    );
    let result = strategy.partition(area, k)?;
    tracing::info!("{}", result.plan().summary());
    Ok(result)
}
