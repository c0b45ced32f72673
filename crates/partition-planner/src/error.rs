// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partition planner.

/// Errors that can occur during partitioning or cell selection.
///
/// A *shorter than requested* partition is not an error; it is reported
/// as [`crate::Partition::Partial`].
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// The request itself is unusable (e.g. `k = 0`, non-positive step).
    #[error("invalid partition request: {0}")]
    InvalidRequest(String),

    /// The grid search hit its iteration cap without reaching `k` cells.
    #[error("grid search exhausted after {iterations} iterations (side {side} m, target {requested} cells)")]
    SearchExhausted {
        iterations: usize,
        side: f64,
        requested: usize,
    },

    /// Rejection sampling could not place enough seed points in the area.
    #[error("sampled only {accepted} of {requested} seed points after {attempts} attempts")]
    SamplingFailed {
        attempts: usize,
        accepted: usize,
        requested: usize,
    },

    /// The chosen strategy cannot satisfy the given constraints.
    #[error("strategy '{strategy}' failed: {detail}")]
    StrategyFailed { strategy: String, detail: String },

    /// A worker index does not address any cell.
    #[error("worker index {index} out of range for {len} cells")]
    IndexOutOfRange { index: i64, len: usize },

    /// Geometry validation failed.
    #[error("geometry error: {0}")]
    Geometry(#[from] survey_geom::GeomError),
}
