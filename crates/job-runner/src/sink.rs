// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Work units and where they go.
//!
//! A [`WorkUnit`] is everything the downstream photogrammetry step needs
//! for one worker: the grown cell to cut along, the photos to fetch and the
//! output resolution. The pipeline hands it to a [`WorkSink`].

use crate::inputs::RingsDoc;
use crate::RuntimeError;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Processing order for one worker.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkUnit {
    /// Worker index; also the cell index.
    pub index: usize,
    /// Strategy that produced the partition.
    pub strategy: String,
    /// Cells in the partition.
    pub num_cells: usize,
    /// `true` when the partition had fewer cells than workers.
    pub partial: bool,
    /// EPSG code of `cell`.
    pub crs: u32,
    /// Coverage-expanded cell geometry, one entry per part.
    pub cell: Vec<RingsDoc>,
    /// Buffer applied to the partition cell (m).
    pub buffer_distance: f64,
    /// Control points strictly inside `cell`.
    pub control_points: usize,
    /// Ground resolution for the orthophoto (cm/px).
    pub ortho_resolution: f64,
    /// Photo addresses, in manifest order.
    pub photos: Vec<String>,
    /// Optimizer convergence trace, if the strategy produced one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<f64>,
}

impl WorkUnit {
    /// File name used by [`JsonFileSink`].
    pub fn file_name(&self) -> String {
        format!("work_unit_{}.json", self.index)
    }

    pub fn summary(&self) -> String {
        format!(
            "Work unit {}/{} ({}{}): {} photos, {} control points, {:.0} m buffer, {} part(s)",
            self.index,
            self.num_cells,
            self.strategy,
            if self.partial { ", partial" } else { "" },
            self.photos.len(),
            self.control_points,
            self.buffer_distance,
            self.cell.len(),
        )
    }
}

/// Receives finished work units.
pub trait WorkSink: Send + Sync {
    fn submit(&self, unit: &WorkUnit) -> Result<(), RuntimeError>;
}

/// Writes each unit as pretty JSON into a directory.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a unit is written to.
    pub fn path_for(&self, unit: &WorkUnit) -> PathBuf {
        self.dir.join(unit.file_name())
    }
}

impl WorkSink for JsonFileSink {
    fn submit(&self, unit: &WorkUnit) -> Result<(), RuntimeError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(unit);
        let json = serde_json::to_string_pretty(unit)?;
        std::fs::write(&path, json)?;
        tracing::info!("work unit {} written to '{}'", unit.index, path.display());
        Ok(())
    }
}

/// Keeps units in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    units: Mutex<Vec<WorkUnit>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units submitted so far.
    pub fn units(&self) -> Vec<WorkUnit> {
        match self.units.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl WorkSink for MemorySink {
    fn submit(&self, unit: &WorkUnit) -> Result<(), RuntimeError> {
        let mut guard = match self.units.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(unit.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(index: usize) -> WorkUnit {
        WorkUnit {
            index,
            strategy: "grid".into(),
            num_cells: 4,
            partial: false,
            crs: 26911,
            cell: vec![RingsDoc {
                exterior: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
                interiors: vec![],
            }],
            buffer_distance: 50.0,
            control_points: 6,
            ortho_resolution: 5.0,
            photos: vec!["a.jpg".into(), "b.jpg".into()],
            trace: vec![],
        }
    }

    #[test]
    fn test_json_file_sink_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("nested"));
        let u = unit(2);
        sink.submit(&u).unwrap();

        let path = sink.path_for(&u);
        assert!(path.ends_with("work_unit_2.json"));
        let back: WorkUnit = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back, u);
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        sink.submit(&unit(0)).unwrap();
        sink.submit(&unit(1)).unwrap();
        let units = sink.units();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].index, 1);
    }

    #[test]
    fn test_summary() {
        let s = unit(3).summary();
        assert!(s.contains("Work unit 3/4"));
        assert!(s.contains("2 photos"));
    }
}
