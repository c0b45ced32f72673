// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # photo-manifest
//!
//! Reads the survey's photo manifest and selects the photos that belong to
//! one cell.
//!
//! # Example
//! ```
//! use geo::{polygon, MultiPolygon};
//! use photo_manifest::{filter_records, PhotoManifest};
//! use survey_geom::Crs;
//!
//! let manifest = PhotoManifest::from_csv(
//!     "url,latitude,longitude\na.jpg,0.5,0.5\nb.jpg,3.0,3.0\n",
//!     "url",
//! )
//! .unwrap();
//! let cell = MultiPolygon::new(vec![polygon![
//!     (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0),
//! ]]);
//! let ids = filter_records(manifest.records(), &cell, Crs::Wgs84, Crs::Wgs84).unwrap();
//! assert_eq!(ids, vec!["a.jpg"]);
//! ```

mod error;
mod filter;
mod manifest;
mod record;

pub use error::ManifestError;
pub use filter::filter_records;
pub use manifest::{PhotoManifest, DEFAULT_ADDRESS_COLUMN};
pub use record::PhotoRecord;
