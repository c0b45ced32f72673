// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

use geo::Coord;

/// One geotagged photograph.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoRecord {
    /// Address the photo is fetched from (URL or storage path).
    pub id: String,
    /// Geotag longitude in degrees.
    pub longitude: f64,
    /// Geotag latitude in degrees.
    pub latitude: f64,
}

impl PhotoRecord {
    pub fn new(id: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            id: id.into(),
            longitude,
            latitude,
        }
    }

    /// Geotag as an `(x = lon, y = lat)` coordinate.
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}
