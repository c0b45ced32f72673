// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `survey-split plan` command: partition and print the cell table.

use crate::Overrides;
use job_runner::SurveyJob;
use partition_planner::Partition;
use std::path::Path;

/// Trace values shown without `--full-trace`.
const TRACE_TAIL: usize = 10;

pub fn execute(config_path: &Path, overrides: Overrides, full_trace: bool) -> anyhow::Result<()> {
    super::banner("Partition Planner");
    let config = super::load_config(config_path, overrides)?;

    println!("  Config:");
    println!("   Strategy:   {}", config.strategy);
    println!("   Partitions: {}", config.partitions);
    println!("   Seed:       {}", config.seed);
    println!("   CRS:        EPSG:{}", config.target_epsg);
    println!();

    println!("  [1/2] Loading inputs...");
    let loaded = SurveyJob::new(config).load_inputs()?;
    println!("        {}", loaded.inputs().area.summary());
    println!();

    println!("  [2/2] Partitioning...");
    let job = loaded.partition()?;
    let plan = job.plan();
    println!("        {}", plan.summary());
    if let Partition::Partial(partial) = job.partition() {
        println!(
            "        ⚠ only {} of {} cells; {} worker(s) would idle",
            partial.produced(),
            partial.requested(),
            partial.shortfall(),
        );
    }
    println!();

    // ── Cell Table ─────────────────────────────────────────────
    println!(
        "  {:<6} {:>12} {:>12} {:>8} {:>10}",
        "Cell", "Area (ha)", "Complexity", "Parts", "Control",
    );
    println!("  {}", "-".repeat(52));
    let control = &job.inputs().control;
    for cell in &plan.cells {
        println!(
            "  {:<6} {:>12.2} {:>12.6} {:>8} {:>10}",
            cell.index,
            cell.area() / 10_000.0,
            cell.complexity,
            cell.num_parts(),
            control.count_within(&cell.geometry),
        );
    }
    println!();

    // ── Convergence ────────────────────────────────────────────
    if !plan.trace.is_empty() {
        let skip = if full_trace {
            0
        } else {
            plan.trace.len().saturating_sub(TRACE_TAIL)
        };
        println!("  Convergence (mean complexity):");
        for (i, score) in plan.trace.iter().enumerate().skip(skip) {
            println!("   {:>5}  {:.6}", i, score);
        }
        println!();
    }

    Ok(())
}
