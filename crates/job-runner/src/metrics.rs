// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-worker job metrics.
//!
//! [`JobMetrics`] records how long each pipeline stage took and how much
//! the selected cell had to grow, which is what decides whether a strategy
//! or coverage setting is worth changing.

use std::time::Duration;

/// Stage timings and counts for one assigned cell.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct JobMetrics {
    /// Time spent partitioning.
    pub partition_duration: Duration,
    /// Time spent growing the cell to its control point quota.
    pub coverage_duration: Duration,
    /// Time spent selecting photos.
    pub filter_duration: Duration,
    /// Cells produced / requested.
    pub cells: usize,
    pub requested: usize,
    /// Growth steps after the initial buffer.
    pub growth_steps: usize,
    /// Control points inside the grown cell.
    pub control_points: usize,
    /// Photos selected / in the manifest.
    pub photos_selected: usize,
    pub photos_total: usize,
}

impl JobMetrics {
    /// Sum of all stage durations.
    pub fn total_duration(&self) -> Duration {
        self.partition_duration + self.coverage_duration + self.filter_duration
    }

    /// Fraction of manifest photos assigned to this worker.
    pub fn photo_share(&self) -> f64 {
        if self.photos_total == 0 {
            return 0.0;
        }
        self.photos_selected as f64 / self.photos_total as f64
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Job: {:.2}ms total ({:.2}ms partition, {:.2}ms coverage, {:.2}ms filter), \
             {}/{} cells, {} growth steps, {} control points, {}/{} photos ({:.1}%)",
            self.total_duration().as_secs_f64() * 1000.0,
            self.partition_duration.as_secs_f64() * 1000.0,
            self.coverage_duration.as_secs_f64() * 1000.0,
            self.filter_duration.as_secs_f64() * 1000.0,
            self.cells,
            self.requested,
            self.growth_steps,
            self.control_points,
            self.photos_selected,
            self.photos_total,
            self.photo_share() * 100.0,
        )
    }
}
