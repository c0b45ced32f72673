// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # coverage
//!
//! Photogrammetric alignment needs ground-control points inside every
//! processed cell. [`CoverageExpander`] buffers a [`partition_planner::Cell`]
//! outward in fixed steps until it contains at least `min_count` control
//! points, and gives up with [`CoverageError::Insufficient`] once the step
//! budget is spent.
//!
//! Expanded cells may overlap their neighbours; the overlap is the price of
//! the coverage guarantee.

mod error;
mod expander;

pub use error::CoverageError;
pub use expander::{
    CoverageExpander, CoverageParams, ExpandedCell, DEFAULT_INITIAL_BUFFER, DEFAULT_MAX_STEPS,
    DEFAULT_MIN_COUNT, DEFAULT_STEP_SIZE,
};
