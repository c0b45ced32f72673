// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Compare partitioning strategies on an L-shaped survey area.
//!
//! Shows the trade-off between the strategies: the grid search is fast
//! but rarely hits the requested cell count, while the Voronoi optimizer
//! always produces `k` compact cells at a higher compute cost.
//!
//! ```bash
//! cargo run -p job-runner --example strategy_comparison
//! ```

use geo::{polygon, Coord};
use job_runner::{JobConfig, JobInputs, SurveyJob};
use partition_planner::{GridSearch, PartitionStrategy, VoronoiOptimizer};
use photo_manifest::PhotoRecord;
use survey_geom::{ControlPointSet, Crs, SurveyArea};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing.
    tracing_subscriber::fmt().with_env_filter("warn").init();

    // An L-shaped area on the zone 11 central meridian.
    let utm = Crs::from_epsg(26911)?;
    let (e0, n0) = (500_000.0, 5_000_000.0);
    let area = SurveyArea::new(
        polygon![
            (x: e0, y: n0),
            (x: e0 + 3000.0, y: n0),
            (x: e0 + 3000.0, y: n0 + 1200.0),
            (x: e0 + 1200.0, y: n0 + 1200.0),
            (x: e0 + 1200.0, y: n0 + 3000.0),
            (x: e0, y: n0 + 3000.0),
        ],
        utm,
    )
    .validate()?;
    println!("{}\n", area.summary());

    let strategies: Vec<Box<dyn PartitionStrategy>> = vec![
        Box::new(GridSearch::default()),
        Box::new(VoronoiOptimizer::new(0).with_max_iterations(0)),
        Box::new(VoronoiOptimizer::new(0).with_max_iterations(100)),
    ];

    println!(
        "{:<10} {:>6} {:>6} {:>10} {:>14} {:>14}",
        "Strategy", "k", "Cells", "Iter", "Mean cmplx", "Max/min area",
    );
    println!("{}", "-".repeat(66));

    for strategy in &strategies {
        for k in [3, 6, 12] {
            match strategy.partition(&area, k) {
                Ok(result) => {
                    let plan = result.plan();
                    let areas: Vec<f64> = plan.cells.iter().map(|c| c.area()).collect();
                    let max = areas.iter().cloned().fold(0.0, f64::max);
                    let min = areas.iter().cloned().fold(f64::INFINITY, f64::min);
                    println!(
                        "{:<10} {:>6} {:>6} {:>10} {:>14.6} {:>14.2}",
                        strategy.name(),
                        k,
                        plan.num_cells(),
                        plan.trace.len(),
                        plan.mean_complexity(),
                        max / min,
                    );
                }
                Err(e) => {
                    println!("{:<10} {:>6} {:>6}", strategy.name(), k, format!("FAIL: {e}"));
                }
            }
        }
    }

    // Run the full pipeline for one worker.
    println!("\n--- Assigning worker 1 of 6 (voronoi) ---\n");
    let control = ControlPointSet::synthetic_grid(&area, None, 250.0)?;
    let photos: Vec<PhotoRecord> = (0..15)
        .flat_map(|i| (0..15).map(move |j| (i, j)))
        .filter_map(|(i, j)| {
            let p = Coord {
                x: e0 + 100.0 + i as f64 * 200.0,
                y: n0 + 100.0 + j as f64 * 200.0,
            };
            utm.transform(Crs::Wgs84, p)
                .ok()
                .map(|ll| PhotoRecord::new(format!("IMG_{i:02}{j:02}.JPG"), ll.x, ll.y))
        })
        .collect();

    let config = JobConfig {
        partitions: 6,
        ..Default::default()
    };
    let job = SurveyJob::from_inputs(config, JobInputs::new(area, control, photos)).partition()?;
    let (unit, metrics) = job.assign_profiled(1)?;
    println!("{}", unit.summary());
    println!("{}", metrics.summary());

    Ok(())
}
