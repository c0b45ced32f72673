// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`PartitionStrategy`] trait and strategy implementations.

pub mod external;
pub mod grid;
pub mod voronoi;

use crate::{Partition, PlannerError};
use survey_geom::{SurveyArea, Validated};

/// Trait for partition strategies.
///
/// Each strategy takes a validated survey area and a target cell count,
/// and produces an ordered [`Partition`] with at most `k` cells.
///
/// Strategies are purely computational (no I/O, no clocks) and must be
/// deterministic for a given configuration: every worker of the array
/// recomputes the same partition and picks its own cell from it.
pub trait PartitionStrategy: Send + Sync {
    /// Human-readable name of this strategy.
    fn name(&self) -> &str;

    /// Splits `area` into at most `k` cells.
    fn partition(
        &self,
        area: &SurveyArea<Validated>,
        k: usize,
    ) -> Result<Partition, PlannerError>;
}

/// Rejects requests no strategy can serve.
pub(crate) fn check_request(strategy: &str, k: usize) -> Result<(), PlannerError> {
    if k == 0 {
        return Err(PlannerError::InvalidRequest(format!(
            "{strategy}: partition count must be at least 1"
        )));
    }
    Ok(())
}
