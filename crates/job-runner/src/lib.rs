// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # job-runner
//!
//! The per-worker pipeline that turns a survey job into one work unit.
//!
//! Every worker of the compute array runs the same job with its own index:
//! - load the survey area, control points and photo manifest,
//!   reprojected into one metric CRS;
//! - partition the area (`partition-planner`);
//! - select this worker's cell and grow it until it holds enough control
//!   points (`coverage`);
//! - select the photos inside the grown cell (`photo-manifest`);
//! - hand the result to a [`WorkSink`].
//!
//! The partition is recomputed by every worker from identical inputs, so
//! no coordination between workers is needed.
//!
//! # Type-State Pipeline
//! ```text
//! SurveyJob<Idle> → SurveyJob<Loaded> → SurveyJob<Partitioned> → WorkUnit
//! ```
//! Transitions are compile-time checked.

mod config;
mod error;
pub mod inputs;
mod job;
mod metrics;
mod sink;

pub use config::{ControlGridConfig, GridConfig, JobConfig, OptimizerConfig};
pub use error::RuntimeError;
pub use inputs::JobInputs;
pub use job::{Idle, JobState, Loaded, Partitioned, SurveyJob};
pub use metrics::JobMetrics;
pub use sink::{JsonFileSink, MemorySink, WorkSink, WorkUnit};

/// Runs the whole pipeline for worker `index` and submits the result.
pub fn run_job(
    config: &JobConfig,
    index: i64,
    sink: &dyn WorkSink,
) -> Result<WorkUnit, RuntimeError> {
    let unit = SurveyJob::new(config.clone())
        .load_inputs()?
        .partition()?
        .assign(index)?;
    sink.submit(&unit)?;
    Ok(unit)
}
