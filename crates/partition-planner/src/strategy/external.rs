// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Externally supplied cells.
//!
//! For surveys where the split has been drawn by hand (or produced by
//! another tool), the polygons are taken as given: each one is clipped to
//! the survey area and kept in the supplied order.

use crate::plan::PlanBuilder;
use crate::strategy::{check_request, PartitionStrategy};
use crate::{Partition, PlannerError};
use geo::Polygon;
use survey_geom::{SurveyArea, Validated};

/// Caller-supplied cell polygons, in the survey CRS.
#[derive(Debug, Clone, Default)]
pub struct ExternalCells {
    polygons: Vec<Polygon<f64>>,
}

impl ExternalCells {
    pub fn new(polygons: Vec<Polygon<f64>>) -> Self {
        Self { polygons }
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

impl PartitionStrategy for ExternalCells {
    fn name(&self) -> &str {
        "external"
    }

    fn partition(
        &self,
        area: &SurveyArea<Validated>,
        k: usize,
    ) -> Result<Partition, PlannerError> {
        check_request(self.name(), k)?;
        if self.polygons.len() > k {
            return Err(PlannerError::StrategyFailed {
                strategy: self.name().to_string(),
                detail: format!(
                    "{} polygons supplied for {k} workers",
                    self.polygons.len()
                ),
            });
        }

        let mut builder = PlanBuilder::new(self.name(), k);
        for (i, polygon) in self.polygons.iter().enumerate() {
            if !builder.add_region(area.clip(polygon)) {
                tracing::warn!("external: polygon {i} does not overlap the survey area");
            }
        }
        builder.finish()
    }
}
