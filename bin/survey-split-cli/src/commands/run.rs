// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `survey-split run` command: produce this worker's work unit.
//!
//! Walks the full type-state pipeline:
//! ```text
//! SurveyJob<Idle> → load_inputs → <Loaded> → partition → <Partitioned> → assign
//! ```

use crate::Overrides;
use job_runner::{JsonFileSink, RuntimeError, SurveyJob, WorkSink};
use std::path::{Path, PathBuf};

pub fn execute(
    config_path: &Path,
    index: i64,
    output_dir: Option<PathBuf>,
    overrides: Overrides,
) -> anyhow::Result<()> {
    super::banner("Work Unit Builder");
    let mut config = super::load_config(config_path, overrides)?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    println!("  Worker {index} of {} ({})", config.partitions, config.strategy);
    println!();

    // Step 1: Idle → Loaded.
    println!("  [1/3] Loading inputs...");
    let loaded = SurveyJob::new(config.clone()).load_inputs()?;
    let inputs = loaded.inputs();
    println!(
        "        {} control points, {} photos",
        inputs.control.len(),
        inputs.photos.len()
    );
    println!();

    // Step 2: Loaded → Partitioned.
    println!("  [2/3] Partitioning...");
    let job = loaded.partition()?;
    println!("        {}", job.plan().summary());
    println!();

    // Step 3: assign this worker's cell.
    println!("  [3/3] Growing cell {index} and selecting photos...");
    let (unit, metrics) = match job.assign_profiled(index) {
        Ok(assigned) => assigned,
        Err(e @ RuntimeError::Coverage(_)) if e.is_recoverable() => {
            tracing::error!("{e}");
            println!("        ✗ {e}");
            println!("        Relax [coverage] min_control_points or raise max_steps and retry.");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    println!("        {}", unit.summary());
    println!("        {}", metrics.summary());
    println!();

    let sink = JsonFileSink::new(&config.output_dir);
    sink.submit(&unit)?;
    println!("  ✓ Written to {}", sink.path_for(&unit).display());

    Ok(())
}
