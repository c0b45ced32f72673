// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for geometry validation and reprojection.

use crate::Crs;

/// Errors raised while validating or reprojecting survey geometry.
///
/// All variants describe malformed input: retrying with the same data
/// cannot succeed, so callers should abort the run.
#[derive(Debug, thiserror::Error)]
pub enum GeomError {
    /// A polygon or point collection has no usable content.
    #[error("empty geometry: {0}")]
    EmptyGeometry(String),

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate ({x}, {y}) in {context}")]
    NonFiniteCoordinate { x: f64, y: f64, context: String },

    /// A polygon collapses to a line or point (zero area, too few vertices).
    #[error("degenerate polygon: {0}")]
    DegenerateArea(String),

    /// The EPSG code is not one of the supported systems.
    #[error("unsupported coordinate reference system EPSG:{0}")]
    UnsupportedCrs(u32),

    /// A geographic CRS was supplied where metric coordinates are required.
    #[error("{0} is not a projected metric coordinate system")]
    NotProjected(Crs),

    /// Two inputs that must share a CRS do not.
    #[error("coordinate system mismatch: expected {expected}, got {actual}")]
    CrsMismatch { expected: Crs, actual: Crs },

    /// A coordinate lies outside the valid domain of its CRS.
    #[error("coordinate ({x}, {y}) out of range for {crs}")]
    OutOfRange { crs: Crs, x: f64, y: f64 },

    /// A numeric parameter (spacing, distance) is unusable.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
