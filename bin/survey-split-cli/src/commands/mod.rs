// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared helpers.

pub mod inspect;
pub mod plan;
pub mod run;

use crate::Overrides;
use anyhow::Context;
use job_runner::JobConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the job config and applies command-line overrides.
pub fn load_config(path: &Path, overrides: Overrides) -> anyhow::Result<JobConfig> {
    let mut config = JobConfig::from_file(path)
        .with_context(|| format!("loading job config '{}'", path.display()))?;
    if let Some(strategy) = overrides.strategy {
        config.strategy = strategy;
    }
    if let Some(partitions) = overrides.partitions {
        config.partitions = partitions;
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

pub fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║ {:^52} ║", format!("survey-split · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}
