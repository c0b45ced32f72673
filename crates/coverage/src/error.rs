// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for coverage expansion.

/// Errors from growing a cell to its control point quota.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    /// The growth budget ran out before enough control points were inside.
    ///
    /// Recoverable: the caller may relax `min_count`, raise `max_steps`,
    /// try another seed, or report this one worker as failed.
    #[error(
        "cell {cell_index}: only {found} of {required} control points after \
         {steps} growth steps ({buffer_distance} m buffer)"
    )]
    Insufficient {
        cell_index: usize,
        found: usize,
        required: usize,
        steps: usize,
        buffer_distance: f64,
    },

    /// Growth parameters that could shrink the cell or never progress.
    #[error("invalid coverage parameter: {0}")]
    InvalidParameter(String),

    /// Cell and control points are in different coordinate systems.
    #[error("geometry error: {0}")]
    Geometry(#[from] survey_geom::GeomError),
}
