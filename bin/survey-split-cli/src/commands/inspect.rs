// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `survey-split inspect` command: check inputs before launching the array.
//!
//! Loads every input, then reports how much of the area is reachable with
//! the configured coverage settings.

use crate::Overrides;
use coverage::CoverageParams;
use geo::Area;
use job_runner::SurveyJob;
use std::path::Path;

pub fn execute(config_path: &Path) -> anyhow::Result<()> {
    super::banner("Input Inspector");
    let config = super::load_config(config_path, Overrides::default())?;
    let job = SurveyJob::new(config.clone()).load_inputs()?;
    let inputs = job.inputs();
    let area = &inputs.area;

    // ── Survey Area ────────────────────────────────────────────
    println!("  {}", area.summary());
    let bounds = area.bounds();
    println!(
        "  Bounds: ({:.1}, {:.1}) – ({:.1}, {:.1})",
        bounds.min().x,
        bounds.min().y,
        bounds.max().x,
        bounds.max().y,
    );
    println!();

    // ── Control Points ─────────────────────────────────────────
    let inside = inputs
        .control
        .count_within(&geo::MultiPolygon::new(vec![area.polygon().clone()]));
    println!(
        "  Control points: {} ({} inside the area, {})",
        inputs.control.len(),
        inside,
        if config.control_points.is_some() { "surveyed" } else { "synthetic grid" },
    );
    let per_cell = inside as f64 / config.partitions as f64;
    let CoverageParams { min_count, .. } = config.coverage;
    println!(
        "  Mean per cell at k = {}: {:.1} (need {min_count}){}",
        config.partitions,
        per_cell,
        if per_cell < min_count as f64 { "  ⚠ expect growth or coverage failures" } else { "" },
    );
    println!();

    // ── Manifest ───────────────────────────────────────────────
    let photos_inside = photo_manifest::filter_records(
        &inputs.photos,
        &geo::MultiPolygon::new(vec![area.polygon().clone()]),
        inputs.photo_crs,
        area.crs(),
    )?;
    println!(
        "  Photos: {} in manifest, {} inside the area",
        inputs.photos.len(),
        photos_inside.len(),
    );
    if inputs.photos.is_empty() {
        println!("  ⚠ manifest is empty");
    }
    println!(
        "  Density: {:.1} photos/ha",
        photos_inside.len() as f64 / (area.polygon().unsigned_area() / 10_000.0),
    );
    println!();

    Ok(())
}
