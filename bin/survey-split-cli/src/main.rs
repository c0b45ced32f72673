// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # survey-split
//!
//! Command-line interface for splitting an aerial survey across a compute
//! array. Every worker runs the same command with its own index.
//!
//! ## Usage
//! ```bash
//! # Preview the partition
//! survey-split --config job.toml plan --strategy grid
//!
//! # Produce the work unit for worker 3
//! survey-split --config job.toml run --index 3
//!
//! # Check inputs before launching the array
//! survey-split --config job.toml inspect
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "survey-split",
    about = "Partition an aerial survey into per-worker photogrammetry work units",
    version,
    author
)]
struct Cli {
    /// Path to the job's TOML configuration file.
    #[arg(short, long, global = true, default_value = "survey-split.toml")]
    config: PathBuf,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Settings that can be overridden on the command line.
#[derive(clap::Args, Debug, Default)]
pub struct Overrides {
    /// Partition strategy: grid, voronoi, external.
    #[arg(short, long)]
    strategy: Option<String>,

    /// Number of cells (workers).
    #[arg(short = 'k', long)]
    partitions: Option<usize>,

    /// Seed for the voronoi strategy.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition the survey area and print the cells.
    Plan {
        #[command(flatten)]
        overrides: Overrides,

        /// Print the full optimizer trace instead of its tail.
        #[arg(long)]
        full_trace: bool,
    },

    /// Build and write the work unit for one worker.
    Run {
        /// Worker index in the compute array.
        #[arg(short, long, env = "SURVEY_SPLIT_INDEX", allow_negative_numbers = true)]
        index: i64,

        /// Directory for the work unit (overrides `output_dir`).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print survey area, control point and manifest statistics.
    Inspect,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Plan {
            overrides,
            full_trace,
        } => commands::plan::execute(&cli.config, overrides, full_trace),
        Commands::Run {
            index,
            output_dir,
            overrides,
        } => commands::run::execute(&cli.config, index, output_dir, overrides),
        Commands::Inspect => commands::inspect::execute(&cli.config),
    }
}
