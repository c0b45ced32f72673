// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Voronoi hill-climbing strategy.
//!
//! Places `k` random seeds inside the survey area, tessellates, clips every
//! region to the area and then nudges one seed at a time to minimise the
//! mean complexity score (perimeter / area) of the cells.
//!
//! # Algorithm
//!
//! ```text
//! seeds  ← k rejection-sampled points inside the area
//! score  ← mean complexity of clip(voronoi(seeds), area)
//! repeat max_iterations times:
//!     i ← random seed index
//!     for each of ±x, ±y moves of learning_rate metres:
//!         skip if the moved seed leaves the area
//!         evaluate the full tessellation with seed i moved
//!     commit the best move if it strictly lowers the score
//!     trace.push(score)
//! ```
//!
//! Every trial recomputes the whole tessellation. With `k` in the tens this
//! is cheap next to the photogrammetry it feeds.
//!
//! # Determinism
//! All randomness comes from one [`StdRng`] seeded with `seed`, so the same
//! `(area, k, seed, learning_rate, max_iterations)` yields identical cells
//! on every worker.

use crate::plan::PlanBuilder;
use crate::strategy::{check_request, PartitionStrategy};
use crate::tessellation::{voronoi_regions, Frame};
use crate::{Partition, PlannerError};
use geo::{Coord, MultiPolygon};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use survey_geom::{complexity_score, SurveyArea, Validated};

/// Default seed move length (m).
pub const DEFAULT_LEARNING_RATE: f64 = 25.0;
/// Default hill-climb iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
/// Rejection-sampling attempts allowed per requested seed.
const SAMPLE_ATTEMPTS_PER_POINT: usize = 10_000;

const MOVES: [(f64, f64); 4] = [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)];

/// Seeded Voronoi optimiser.
#[derive(Debug, Clone)]
pub struct VoronoiOptimizer {
    seed: u64,
    learning_rate: f64,
    max_iterations: usize,
}

impl Default for VoronoiOptimizer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl VoronoiOptimizer {
    /// Creates an optimiser with default step length and iteration budget.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            learning_rate: DEFAULT_LEARNING_RATE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Sets the seed move length in metres.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the hill-climb iteration budget (0 returns the initial tessellation).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

/// Draws `k` points uniformly from the area's bounding box, keeping those
/// strictly inside the polygon.
fn sample_seeds(
    area: &SurveyArea<Validated>,
    k: usize,
    rng: &mut StdRng,
) -> Result<Vec<Coord<f64>>, PlannerError> {
    let bounds = area.bounds();
    let (min, max) = (bounds.min(), bounds.max());
    let max_attempts = k.saturating_mul(SAMPLE_ATTEMPTS_PER_POINT);

    let mut seeds = Vec::with_capacity(k);
    let mut attempts = 0;
    while seeds.len() < k {
        if attempts >= max_attempts {
            return Err(PlannerError::SamplingFailed {
                attempts,
                accepted: seeds.len(),
                requested: k,
            });
        }
        attempts += 1;
        let candidate = Coord {
            x: rng.gen_range(min.x..max.x),
            y: rng.gen_range(min.y..max.y),
        };
        if area.contains(candidate) {
            seeds.push(candidate);
        }
    }

    tracing::debug!("voronoi: sampled {k} seeds in {attempts} attempts");
    Ok(seeds)
}

/// Voronoi regions of `seeds` clipped to the area, in seed order.
/// Degenerate regions are kept so positions line up with seeds.
fn tessellate(area: &SurveyArea<Validated>, seeds: &[Coord<f64>]) -> Vec<MultiPolygon<f64>> {
    let bounds = area.bounds();
    let frame = Frame::around(seeds, bounds.width().max(bounds.height()));
    voronoi_regions(seeds, frame)
        .iter()
        .map(|region| area.clip(region))
        .collect()
}

/// Mean complexity over non-degenerate regions; infinite when none remain.
fn mean_complexity(regions: &[MultiPolygon<f64>]) -> f64 {
    let scores: Vec<f64> = regions.iter().filter_map(complexity_score).collect();
    if scores.is_empty() {
        return f64::INFINITY;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

impl PartitionStrategy for VoronoiOptimizer {
    fn name(&self) -> &str {
        "voronoi"
    }

    fn partition(
        &self,
        area: &SurveyArea<Validated>,
        k: usize,
    ) -> Result<Partition, PlannerError> {
        check_request(self.name(), k)?;
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(PlannerError::InvalidRequest(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut seeds = sample_seeds(area, k, &mut rng)?;
        let mut regions = tessellate(area, &seeds);
        let mut score = mean_complexity(&regions);
        let initial_score = score;
        let mut trace = Vec::with_capacity(self.max_iterations);
        let mut accepted = 0usize;

        for iteration in 0..self.max_iterations {
            let i = rng.gen_range(0..k);
            let mut best: Option<(Coord<f64>, Vec<MultiPolygon<f64>>, f64)> = None;

            for (dx, dy) in MOVES {
                let moved = Coord {
                    x: seeds[i].x + dx * self.learning_rate,
                    y: seeds[i].y + dy * self.learning_rate,
                };
                if !area.contains(moved) {
                    continue;
                }
                let mut trial = seeds.clone();
                trial[i] = moved;
                let trial_regions = tessellate(area, &trial);
                let trial_score = mean_complexity(&trial_regions);

                let to_beat = best.as_ref().map_or(score, |(_, _, s)| *s);
                if trial_score < to_beat {
                    best = Some((moved, trial_regions, trial_score));
                }
            }

            if let Some((moved, trial_regions, trial_score)) = best {
                tracing::debug!(
                    "voronoi: iteration {iteration}: seed {i} → ({:.1}, {:.1}), score {score:.6} → {trial_score:.6}",
                    moved.x,
                    moved.y,
                );
                seeds[i] = moved;
                regions = trial_regions;
                score = trial_score;
                accepted += 1;
            }
            trace.push(score);
        }

        tracing::info!(
            "voronoi: {} iterations, {accepted} moves accepted, mean complexity {initial_score:.6} → {score:.6}",
            self.max_iterations,
        );

        let mut builder = PlanBuilder::new(self.name(), k);
        for region in regions {
            builder.add_region(region);
        }
        let result = builder.with_trace(trace).finish()?;
        if let Partition::Partial(partial) = &result {
            tracing::warn!(
                "voronoi: only {} of {} cells survived clipping",
                partial.produced(),
                partial.requested(),
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Area};
    use survey_geom::Crs;

    fn utm() -> Crs {
        Crs::from_epsg(26911).unwrap()
    }

    fn square_area(side: f64) -> SurveyArea<Validated> {
        SurveyArea::new(
            polygon![
                (x: 0.0, y: 0.0),
                (x: side, y: 0.0),
                (x: side, y: side),
                (x: 0.0, y: side),
            ],
            utm(),
        )
        .validate()
        .unwrap()
    }

    fn l_shape() -> SurveyArea<Validated> {
        SurveyArea::new(
            polygon![
                (x: 0.0, y: 0.0),
                (x: 2000.0, y: 0.0),
                (x: 2000.0, y: 800.0),
                (x: 800.0, y: 800.0),
                (x: 800.0, y: 2000.0),
                (x: 0.0, y: 2000.0),
            ],
            utm(),
        )
        .validate()
        .unwrap()
    }

    #[test]
    fn test_voronoi_covers_area() {
        let area = square_area(1000.0);
        let plan = VoronoiOptimizer::new(0)
            .with_max_iterations(20)
            .partition(&area, 4)
            .unwrap()
            .into_plan();
        assert_eq!(plan.num_cells(), 4);
        assert!((plan.total_area() - 1.0e6).abs() < 1.0);
        plan.validate().unwrap();
    }

    #[test]
    fn test_voronoi_deterministic() {
        let area = l_shape();
        let opt = VoronoiOptimizer::new(42).with_max_iterations(15);
        let a = opt.partition(&area, 6).unwrap().into_plan();
        let b = opt.partition(&area, 6).unwrap().into_plan();
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.trace, b.trace);
    }

    #[test]
    fn test_voronoi_seed_changes_result() {
        let area = square_area(1000.0);
        let a = VoronoiOptimizer::new(1).with_max_iterations(0).partition(&area, 5).unwrap();
        let b = VoronoiOptimizer::new(2).with_max_iterations(0).partition(&area, 5).unwrap();
        assert_ne!(a.plan().cells, b.plan().cells);
    }

    #[test]
    fn test_trace_is_monotone_non_increasing() {
        let plan = VoronoiOptimizer::new(7)
            .with_max_iterations(30)
            .partition(&l_shape(), 5)
            .unwrap()
            .into_plan();
        assert_eq!(plan.trace.len(), 30);
        for w in plan.trace.windows(2) {
            assert!(w[1] <= w[0]);
        }
        let last = *plan.trace.last().unwrap();
        assert!((plan.mean_complexity() - last).abs() < 1e-9);
    }

    #[test]
    fn test_cells_stay_inside_area() {
        let area = l_shape();
        let plan = VoronoiOptimizer::new(3)
            .with_max_iterations(10)
            .partition(&area, 5)
            .unwrap()
            .into_plan();
        let total: f64 = plan.cells.iter().map(|c| c.geometry.unsigned_area()).sum();
        assert!(total <= area.area() + 1.0);
        assert!(plan.num_cells() <= 5);
    }

    #[test]
    fn test_single_cell_is_whole_area() {
        let area = square_area(500.0);
        let plan = VoronoiOptimizer::new(0)
            .with_max_iterations(3)
            .partition(&area, 1)
            .unwrap()
            .into_plan();
        assert_eq!(plan.num_cells(), 1);
        assert!((plan.cells[0].area() - 250_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_zero_k_and_bad_rate() {
        let area = square_area(100.0);
        assert!(matches!(
            VoronoiOptimizer::new(0).partition(&area, 0),
            Err(PlannerError::InvalidRequest(_))
        ));
        assert!(matches!(
            VoronoiOptimizer::new(0).with_learning_rate(0.0).partition(&area, 2),
            Err(PlannerError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_mean_complexity_empty_is_infinite() {
        assert!(mean_complexity(&[]).is_infinite());
        assert!(mean_complexity(&[MultiPolygon::new(vec![])]).is_infinite());
    }
}
