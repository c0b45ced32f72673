// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Job configuration loaded from TOML files or constructed programmatically.
//!
//! One file describes the whole compute array; every worker reads the same
//! file and differs only in its index.
//!
//! # TOML Format
//! ```toml
//! survey_area = "./data/flight_plan.json"
//! exclusion_area = "./data/drainage_buffer.json"
//! photo_manifest = "./data/manifest.csv"
//! output_dir = "./out"
//! target_epsg = 26911
//! partitions = 8
//! strategy = "voronoi"
//! seed = 0
//! ortho_resolution = 5.0
//!
//! [optimizer]
//! learning_rate = 25.0
//! max_iterations = 100
//!
//! [coverage]
//! min_control_points = 5
//! step_size = 30.0
//! initial_buffer = 50.0
//! max_steps = 100
//!
//! [control_grid]
//! spacing = 200.0
//! ```

use crate::RuntimeError;
use coverage::CoverageParams;
use geo::Polygon;
use partition_planner::{ExternalCells, GridSearch, PartitionStrategy, VoronoiOptimizer};
use std::path::{Path, PathBuf};
use survey_geom::Crs;

/// Hill-climb settings for the `voronoi` strategy.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Seed move length in metres.
    pub learning_rate: f64,
    /// Hill-climb iterations.
    pub max_iterations: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: partition_planner::strategy::voronoi::DEFAULT_LEARNING_RATE,
            max_iterations: partition_planner::strategy::voronoi::DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Search settings for the `grid` strategy.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub initial_side: f64,
    pub side_step: f64,
    pub max_iterations: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            initial_side: partition_planner::strategy::grid::DEFAULT_INITIAL_SIDE,
            side_step: partition_planner::strategy::grid::DEFAULT_SIDE_STEP,
            max_iterations: partition_planner::strategy::grid::DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Synthetic control point grid, used when no control point file is given.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ControlGridConfig {
    /// Grid spacing in metres.
    pub spacing: f64,
}

impl Default for ControlGridConfig {
    fn default() -> Self {
        Self { spacing: 200.0 }
    }
}

/// Configuration for one survey job.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JobConfig {
    /// Survey area polygon file.
    pub survey_area: PathBuf,
    /// Areas where no control points can be placed (e.g. a drainage buffer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_area: Option<PathBuf>,
    /// Surveyed control point file; a synthetic grid is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_points: Option<PathBuf>,
    /// Pre-drawn cell polygons for the `external` strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_cells: Option<PathBuf>,
    /// Photo manifest (CSV).
    pub photo_manifest: PathBuf,
    /// Where work units are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Projected CRS all geometry is processed in.
    #[serde(default = "default_target_epsg")]
    pub target_epsg: u32,
    /// Number of workers in the compute array.
    pub partitions: usize,
    /// Partition strategy name: `"grid"`, `"voronoi"`, `"external"`.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Seed for the `voronoi` strategy.
    #[serde(default)]
    pub seed: u64,
    /// Ground resolution handed to the processing step (cm/px).
    #[serde(default = "default_ortho_resolution")]
    pub ortho_resolution: f64,
    /// Manifest column holding the photo address.
    #[serde(default = "default_address_column")]
    pub address_column: String,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub coverage: CoverageParams,
    #[serde(default)]
    pub control_grid: ControlGridConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./out")
}

fn default_target_epsg() -> u32 {
    26911
}

fn default_strategy() -> String {
    "voronoi".to_string()
}

fn default_ortho_resolution() -> f64 {
    5.0
}

fn default_address_column() -> String {
    photo_manifest::DEFAULT_ADDRESS_COLUMN.to_string()
}

impl JobConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Relative input paths are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.partitions == 0 {
            return Err(RuntimeError::ConfigError(
                "partitions must be at least 1".into(),
            ));
        }
        if !self.ortho_resolution.is_finite() || self.ortho_resolution <= 0.0 {
            return Err(RuntimeError::ConfigError(format!(
                "ortho_resolution must be positive, got {}",
                self.ortho_resolution
            )));
        }
        if !self.control_grid.spacing.is_finite() || self.control_grid.spacing <= 0.0 {
            return Err(RuntimeError::ConfigError(format!(
                "control_grid.spacing must be positive, got {}",
                self.control_grid.spacing
            )));
        }
        self.coverage_params()?;
        self.target_crs()?;
        Ok(())
    }

    /// The projected CRS geometry is processed in.
    pub fn target_crs(&self) -> Result<Crs, RuntimeError> {
        let crs = Crs::from_epsg(self.target_epsg)
            .map_err(|e| RuntimeError::ConfigError(format!("target_epsg: {e}")))?;
        if !crs.is_projected() {
            return Err(RuntimeError::ConfigError(format!(
                "target_epsg {} is not a projected (metric) CRS",
                self.target_epsg
            )));
        }
        Ok(crs)
    }

    /// Validated coverage growth parameters.
    pub fn coverage_params(&self) -> Result<CoverageParams, RuntimeError> {
        self.coverage
            .validate()
            .map_err(|e| RuntimeError::ConfigError(format!("[coverage] {e}")))?;
        Ok(self.coverage)
    }

    /// Creates the partition strategy specified by this config.
    ///
    /// `external` needs the polygons loaded from [`JobConfig::external_cells`].
    pub fn create_strategy(
        &self,
        external: Option<Vec<Polygon<f64>>>,
    ) -> Result<Box<dyn PartitionStrategy>, RuntimeError> {
        match self.strategy.to_lowercase().as_str() {
            "grid" => Ok(Box::new(GridSearch::new(
                self.grid.initial_side,
                self.grid.side_step,
                self.grid.max_iterations,
            ))),
            "voronoi" | "optimizer" => Ok(Box::new(
                VoronoiOptimizer::new(self.seed)
                    .with_learning_rate(self.optimizer.learning_rate)
                    .with_max_iterations(self.optimizer.max_iterations),
            )),
            "external" => match external {
                Some(polygons) => Ok(Box::new(ExternalCells::new(polygons))),
                None => Err(RuntimeError::ConfigError(
                    "strategy 'external' requires an external_cells file".into(),
                )),
            },
            other => Err(RuntimeError::ConfigError(format!(
                "unknown strategy '{other}'; expected 'grid', 'voronoi', or 'external'"
            ))),
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.survey_area);
        resolve(&mut self.photo_manifest);
        resolve(&mut self.output_dir);
        for p in [
            &mut self.exclusion_area,
            &mut self.control_points,
            &mut self.external_cells,
        ]
        .into_iter()
        .flatten()
        {
            resolve(p);
        }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            survey_area: PathBuf::from("./data/survey_area.json"),
            exclusion_area: None,
            control_points: None,
            external_cells: None,
            photo_manifest: PathBuf::from("./data/manifest.csv"),
            output_dir: default_output_dir(),
            target_epsg: default_target_epsg(),
            partitions: 4,
            strategy: default_strategy(),
            seed: 0,
            ortho_resolution: default_ortho_resolution(),
            address_column: default_address_column(),
            optimizer: OptimizerConfig::default(),
            grid: GridConfig::default(),
            coverage: CoverageParams::default(),
            control_grid: ControlGridConfig::default(),
        }
    }
}
