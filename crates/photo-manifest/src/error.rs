// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for manifest parsing and filtering.

/// Errors that can occur when reading or filtering a photo manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest: {0}")]
    ReadError(#[from] std::io::Error),

    /// The manifest has no header row.
    #[error("manifest is empty")]
    Empty,

    /// A required column is absent from the header.
    #[error("manifest has no '{0}' column")]
    MissingColumn(String),

    /// A data row could not be parsed (1-based line number).
    #[error("manifest line {line}: {detail}")]
    ParseError { line: usize, detail: String },

    /// Reprojecting a photo position failed.
    #[error("geometry error: {0}")]
    Geometry(#[from] survey_geom::GeomError),
}
