// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The survey area: the flight region every partition is cut from.
//!
//! # Type-State Pattern
//!
//! ```text
//! SurveyArea<Unchecked>   — polygon as read from the input layer.
//!       │  .validate()
//!       ▼
//! SurveyArea<Validated>   — finite, non-degenerate, projected. Ready for partitioning.
//! ```
//!
//! Partition strategies only accept `SurveyArea<Validated>`, so a malformed
//! boundary is rejected once, at load time, instead of inside every
//! tessellation.

use crate::ops::{self, AREA_EPSILON};
use crate::{Crs, GeomError};
use geo::{
    Area, BooleanOps, BoundingRect, Contains, Coord, LineString, MultiPolygon, Point, Polygon,
    Rect,
};
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: area has been constructed but not checked.
#[derive(Debug, Clone)]
pub struct Unchecked;

/// Marker: area has been validated and can be partitioned.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for area states.
pub trait AreaState: fmt::Debug + Clone {}
impl AreaState for Unchecked {}
impl AreaState for Validated {}

// ── SurveyArea ─────────────────────────────────────────────────────

/// A single survey polygon in a projected, metre-based CRS.
#[derive(Debug, Clone)]
pub struct SurveyArea<S: AreaState = Unchecked> {
    polygon: Polygon<f64>,
    crs: Crs,
    bounds: Rect<f64>,
    _state: std::marker::PhantomData<S>,
}

impl SurveyArea<Unchecked> {
    /// Wraps a polygon in the `Unchecked` state.
    pub fn new(polygon: Polygon<f64>, crs: Crs) -> Self {
        let origin = Coord { x: 0.0, y: 0.0 };
        let bounds = polygon
            .bounding_rect()
            .unwrap_or_else(|| Rect::new(origin, origin));
        Self {
            polygon,
            crs,
            bounds,
            _state: std::marker::PhantomData,
        }
    }

    /// Validates the area and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The CRS is projected (metres).
    /// - Every coordinate, including holes, is finite.
    /// - The exterior ring has at least three distinct vertices.
    /// - The polygon encloses a positive, finite area.
    pub fn validate(self) -> Result<SurveyArea<Validated>, GeomError> {
        if !self.crs.is_projected() {
            return Err(GeomError::NotProjected(self.crs));
        }

        let exterior = self.polygon.exterior();
        if exterior.0.is_empty() {
            return Err(GeomError::EmptyGeometry("survey area has no exterior ring".into()));
        }

        let rings = std::iter::once(exterior).chain(self.polygon.interiors());
        for ring in rings {
            ops::check_finite(ring.0.iter(), "survey area")?;
        }

        let distinct = distinct_vertices(exterior);
        if distinct < 3 {
            return Err(GeomError::DegenerateArea(format!(
                "survey area exterior has {distinct} distinct vertices, need at least 3"
            )));
        }

        let area = self.polygon.unsigned_area();
        if !area.is_finite() || area <= AREA_EPSILON {
            return Err(GeomError::DegenerateArea(format!(
                "survey area encloses {area} m²"
            )));
        }

        tracing::debug!(
            "survey area validated: {:.1} ha, {} vertices, {}",
            area / 10_000.0,
            distinct,
            self.crs,
        );

        Ok(SurveyArea {
            polygon: self.polygon,
            crs: self.crs,
            bounds: self.bounds,
            _state: std::marker::PhantomData,
        })
    }
}

impl<S: AreaState> SurveyArea<S> {
    /// The boundary polygon.
    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// The coordinate system of the polygon.
    pub fn crs(&self) -> Crs {
        self.crs
    }
}

impl SurveyArea<Validated> {
    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// Enclosed area in square metres.
    pub fn area(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    /// Boundary length in metres, holes included.
    pub fn perimeter(&self) -> f64 {
        ops::polygon_perimeter(&self.polygon)
    }

    /// Strict containment: points on the boundary are outside.
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        self.polygon.contains(&Point::from(coord))
    }

    /// The area minus an exclusion zone (e.g. a drainage buffer).
    pub fn subtract(&self, exclusion: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![self.polygon.clone()]).difference(exclusion)
    }

    /// Clips a region to the survey area.
    pub fn clip(&self, region: &Polygon<f64>) -> MultiPolygon<f64> {
        self.polygon.intersection(region)
    }

    /// One-line description for logs and CLI output.
    pub fn summary(&self) -> String {
        let w = self.bounds.width();
        let h = self.bounds.height();
        format!(
            "Survey area: {:.2} km² ({:.0} × {:.0} m bbox), perimeter {:.1} km, {} holes, {}",
            self.area() / 1.0e6,
            w,
            h,
            self.perimeter() / 1000.0,
            self.polygon.interiors().len(),
            self.crs,
        )
    }
}

/// Counts distinct vertices of a ring, ignoring the closing coordinate.
fn distinct_vertices(ring: &LineString<f64>) -> usize {
    let mut seen: Vec<Coord<f64>> = Vec::new();
    for c in &ring.0 {
        if !seen.contains(c) {
            seen.push(*c);
        }
    }
    seen.len()
}
