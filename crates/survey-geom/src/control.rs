// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Ground-control point sets.
//!
//! A [`ControlPointSet`] is only ever used for membership counting, so it is
//! a flat list of coordinates tagged with their CRS. Sets come either from a
//! surveyed point file or, when no survey exists yet, from a regular grid of
//! candidate positions laid over the flyable part of the survey area.

use crate::area::{SurveyArea, Validated};
use crate::ops;
use crate::{Crs, GeomError};
use geo::{BoundingRect, Coord, MultiPolygon};

/// Upper bound on synthetic grid candidates, to catch a spacing typo before
/// it allocates gigabytes.
const MAX_GRID_CANDIDATES: usize = 25_000_000;

/// An unordered collection of control points in one CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPointSet {
    points: Vec<Coord<f64>>,
    crs: Crs,
}

impl ControlPointSet {
    /// Creates a set from explicit points, rejecting non-finite coordinates.
    pub fn new(points: Vec<Coord<f64>>, crs: Crs) -> Result<Self, GeomError> {
        ops::check_finite(points.iter(), "control point set")?;
        Ok(Self { points, crs })
    }

    /// Lays a regular grid of candidate control points over the survey area,
    /// keeping only those strictly inside `area − exclusion`.
    ///
    /// Grid lines start at the bounding-box minimum and advance by `spacing`
    /// while strictly below the maximum; points are emitted column by column
    /// (x outer, y inner).
    pub fn synthetic_grid(
        area: &SurveyArea<Validated>,
        exclusion: Option<&MultiPolygon<f64>>,
        spacing: f64,
    ) -> Result<Self, GeomError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(GeomError::InvalidParameter(format!(
                "control grid spacing must be a positive number of metres, got {spacing}"
            )));
        }

        let region = match exclusion {
            Some(ex) => area.subtract(ex),
            None => MultiPolygon::new(vec![area.polygon().clone()]),
        };
        let Some(bounds) = region.bounding_rect() else {
            tracing::warn!("exclusion zone covers the whole survey area; no control points");
            return Ok(Self {
                points: Vec::new(),
                crs: area.crs(),
            });
        };

        let nx = (bounds.width() / spacing).ceil() as usize;
        let ny = (bounds.height() / spacing).ceil() as usize;
        if nx.saturating_mul(ny) > MAX_GRID_CANDIDATES {
            return Err(GeomError::InvalidParameter(format!(
                "control grid spacing {spacing} m yields {nx} × {ny} candidates"
            )));
        }

        let min = bounds.min();
        let mut points = Vec::new();
        for ix in 0..nx {
            let x = min.x + ix as f64 * spacing;
            for iy in 0..ny {
                let c = Coord {
                    x,
                    y: min.y + iy as f64 * spacing,
                };
                if ops::strictly_contains(&region, c) {
                    points.push(c);
                }
            }
        }

        tracing::info!(
            "synthesised {} control points on a {spacing} m grid ({} candidates)",
            points.len(),
            nx * ny,
        );

        Ok(Self {
            points,
            crs: area.crs(),
        })
    }

    /// Reprojects every point into another CRS.
    pub fn reproject(&self, target: Crs) -> Result<Self, GeomError> {
        let points = self
            .points
            .iter()
            .map(|c| self.crs.transform(target, *c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            points,
            crs: target,
        })
    }

    /// The points in insertion order.
    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    /// The CRS of every point.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points strictly inside `region`.
    pub fn count_within(&self, region: &MultiPolygon<f64>) -> usize {
        ops::count_strictly_within(region, &self.points)
    }
}
