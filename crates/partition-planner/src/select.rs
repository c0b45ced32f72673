// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Job selection: maps a worker index onto its cell.

use crate::{Cell, PlannerError};

/// Returns the cell owned by worker `index`.
///
/// The index comes from outside the process (array-job environment,
/// command line), so it is taken as a signed integer and range-checked
/// here rather than trusted.
pub fn select(cells: &[Cell], index: i64) -> Result<&Cell, PlannerError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| cells.get(i))
        .ok_or(PlannerError::IndexOutOfRange {
            index,
            len: cells.len(),
        })
}
