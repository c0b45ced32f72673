// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the job pipeline.

use std::path::PathBuf;

/// Errors that can occur while running a survey job.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// An input file is missing, unreadable or malformed.
    #[error("input file '{}': {detail}", path.display())]
    InputFile { path: PathBuf, detail: String },

    /// Geometry validation or reprojection failed.
    #[error("geometry error: {0}")]
    Geometry(#[from] survey_geom::GeomError),

    /// The partition planner returned an error.
    #[error("planner error: {0}")]
    Planner(#[from] partition_planner::PlannerError),

    /// The selected cell could not be covered by enough control points.
    #[error("coverage error: {0}")]
    Coverage(#[from] coverage::CoverageError),

    /// The photo manifest could not be read.
    #[error("manifest error: {0}")]
    Manifest(#[from] photo_manifest::ManifestError),

    /// Writing the work unit failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A work unit could not be serialised.
    #[error("serialisation error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RuntimeError {
    /// `true` when the failure is specific to this worker and retrying with
    /// relaxed coverage settings may succeed; every other error comes from
    /// the shared inputs and would fail for all workers alike.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RuntimeError::Coverage(coverage::CoverageError::Insufficient { .. })
        )
    }
}
