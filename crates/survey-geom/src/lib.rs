// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # survey-geom
//!
//! Geometry primitives shared by every stage of survey partitioning:
//!
//! - [`SurveyArea`] — the flight region polygon, with a **type-state**
//!   (`Unchecked` → `Validated`) so strategies never see a malformed boundary.
//! - [`Crs`] / [`reproject`] — WGS84 ↔ UTM conversion, so buffers and areas
//!   are computed in metres while photo geotags stay in longitude/latitude.
//! - [`ControlPointSet`] — ground-control points, surveyed or synthesised
//!   on a grid around an exclusion zone.
//! - Measurements: [`complexity_score`], [`perimeter`], [`buffer`],
//!   strict point-in-polygon counting.
//!
//! Polygon algebra (clipping, difference, buffering) is delegated to the
//! [`geo`] crate; this crate adds the survey-specific policy on top.
//!
//! # Example
//! ```
//! use geo::polygon;
//! use survey_geom::{Crs, SurveyArea};
//!
//! let area = SurveyArea::new(
//!     polygon![(x: 0.0, y: 0.0), (x: 1000.0, y: 0.0), (x: 1000.0, y: 1000.0), (x: 0.0, y: 1000.0)],
//!     Crs::from_epsg(26911).unwrap(),
//! )
//! .validate()
//! .unwrap();
//! println!("{}", area.summary());
//! ```

pub mod area;
mod control;
mod crs;
mod error;
mod ops;

pub use area::{SurveyArea, Unchecked, Validated};
pub use control::ControlPointSet;
pub use crs::{reproject, Crs, Datum, Hemisphere};
pub use error::GeomError;
pub use ops::{
    buffer, check_finite, complexity_score, count_strictly_within, is_degenerate, perimeter,
    polygon_perimeter, ring_length, strictly_contains, AREA_EPSILON,
};
