// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The per-worker survey job with a type-state–enforced pipeline.
//!
//! ```text
//! SurveyJob<Idle>
//!     │  .load_inputs()   (or SurveyJob::from_inputs)
//!     ▼
//! SurveyJob<Loaded>
//!     │  .partition()
//!     ▼
//! SurveyJob<Partitioned>
//!     │  .assign(index)
//!     ▼
//!   WorkUnit
//! ```
//!
//! Each state transition consumes the old value and returns a new one,
//! so a cell can never be assigned from an unpartitioned job. The data a
//! stage produced lives in its state type.

use crate::inputs::RingsDoc;
use crate::{JobConfig, JobInputs, JobMetrics, RuntimeError, WorkUnit};
use coverage::CoverageExpander;
use partition_planner::{Partition, PartitionPlan};
use std::time::{Duration, Instant};

// ── Type-state markers ─────────────────────────────────────────

/// Job is configured; nothing is loaded.
#[derive(Debug)]
pub struct Idle;

/// Inputs are loaded and reprojected.
#[derive(Debug)]
pub struct Loaded {
    inputs: JobInputs,
}

/// The survey area has been partitioned.
#[derive(Debug)]
pub struct Partitioned {
    inputs: JobInputs,
    partition: Partition,
    elapsed: Duration,
}

/// Sealed trait for job states.
pub trait JobState: std::fmt::Debug {}
impl JobState for Idle {}
impl JobState for Loaded {}
impl JobState for Partitioned {}

// ── Job ────────────────────────────────────────────────────────

/// One worker's view of a survey job.
///
/// # Example
/// ```no_run
/// use job_runner::{JobConfig, SurveyJob};
///
/// # fn example() -> Result<(), job_runner::RuntimeError> {
/// let unit = SurveyJob::new(JobConfig::default())
///     .load_inputs()?
///     .partition()?
///     .assign(0)?;
/// println!("{}", unit.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SurveyJob<S: JobState = Idle> {
    config: JobConfig,
    state: S,
}

impl<S: JobState> SurveyJob<S> {
    pub fn config(&self) -> &JobConfig {
        &self.config
    }
}

// ── Idle → Loaded ──────────────────────────────────────────────

impl SurveyJob<Idle> {
    pub fn new(config: JobConfig) -> Self {
        tracing::info!(
            "job created: {} partitions, strategy '{}'",
            config.partitions,
            config.strategy,
        );
        Self {
            config,
            state: Idle,
        }
    }

    /// Reads every input file named by the config.
    pub fn load_inputs(self) -> Result<SurveyJob<Loaded>, RuntimeError> {
        let inputs = JobInputs::load(&self.config)?;
        Ok(SurveyJob {
            config: self.config,
            state: Loaded { inputs },
        })
    }

    /// Uses inputs that are already in memory.
    pub fn from_inputs(config: JobConfig, inputs: JobInputs) -> SurveyJob<Loaded> {
        SurveyJob {
            config,
            state: Loaded { inputs },
        }
    }
}

// ── Loaded → Partitioned ───────────────────────────────────────

impl SurveyJob<Loaded> {
    pub fn inputs(&self) -> &JobInputs {
        &self.state.inputs
    }

    /// Splits the survey area with the configured strategy.
    pub fn partition(self) -> Result<SurveyJob<Partitioned>, RuntimeError> {
        let Loaded { mut inputs } = self.state;
        let strategy = self.config.create_strategy(inputs.external_cells.take())?;

        let start = Instant::now();
        let partition =
            partition_planner::partition(&inputs.area, self.config.partitions, strategy.as_ref())?;
        let elapsed = start.elapsed();

        if let Partition::Partial(partial) = &partition {
            tracing::warn!(
                "partition has {} of {} cells; {} worker(s) will have nothing to do",
                partial.produced(),
                partial.requested(),
                partial.shortfall(),
            );
        }

        Ok(SurveyJob {
            config: self.config,
            state: Partitioned {
                inputs,
                partition,
                elapsed,
            },
        })
    }
}

// ── Partitioned → WorkUnit ─────────────────────────────────────

impl SurveyJob<Partitioned> {
    pub fn inputs(&self) -> &JobInputs {
        &self.state.inputs
    }

    pub fn partition(&self) -> &Partition {
        &self.state.partition
    }

    pub fn plan(&self) -> &PartitionPlan {
        self.state.partition.plan()
    }

    /// Builds the work unit for worker `index`.
    pub fn assign(&self, index: i64) -> Result<WorkUnit, RuntimeError> {
        self.assign_profiled(index).map(|(unit, _)| unit)
    }

    /// Like [`assign`](Self::assign), also returning stage metrics.
    ///
    /// Steps:
    /// 1. Select the cell for `index`.
    /// 2. Grow it until it holds enough control points.
    /// 3. Select the photos inside the grown cell.
    pub fn assign_profiled(&self, index: i64) -> Result<(WorkUnit, JobMetrics), RuntimeError> {
        let inputs = &self.state.inputs;
        let plan = self.plan();
        let mut metrics = JobMetrics {
            partition_duration: self.state.elapsed,
            cells: plan.num_cells(),
            requested: plan.requested,
            photos_total: inputs.photos.len(),
            ..Default::default()
        };

        let cell = plan.select(index)?;
        tracing::info!(
            "worker {index}: cell {} ({:.1} ha, complexity {:.5})",
            cell.index,
            cell.area() / 10_000.0,
            cell.complexity,
        );

        let start = Instant::now();
        let expander = CoverageExpander::new(self.config.coverage_params()?)?;
        let expanded = expander.expand_in(cell, inputs.area.crs(), &inputs.control)?;
        metrics.coverage_duration = start.elapsed();
        metrics.growth_steps = expanded.steps;
        metrics.control_points = expanded.control_points;

        let start = Instant::now();
        let photos = photo_manifest::filter_records(
            &inputs.photos,
            &expanded.geometry,
            inputs.photo_crs,
            inputs.area.crs(),
        )?;
        metrics.filter_duration = start.elapsed();
        metrics.photos_selected = photos.len();

        let unit = WorkUnit {
            index: cell.index,
            strategy: plan.strategy_name.clone(),
            num_cells: plan.num_cells(),
            partial: self.state.partition.is_partial(),
            crs: inputs.area.crs().epsg(),
            cell: expanded.geometry.0.iter().map(RingsDoc::from_polygon).collect(),
            buffer_distance: expanded.buffer_distance,
            control_points: expanded.control_points,
            ortho_resolution: self.config.ortho_resolution,
            photos,
            trace: plan.trace.clone(),
        };
        tracing::info!("{}", unit.summary());
        tracing::debug!("{}", metrics.summary());
        Ok((unit, metrics))
    }
}
