// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Coordinate reference systems and reprojection.
//!
//! Survey inputs arrive in geographic longitude/latitude (EPSG:4326) and are
//! processed in a UTM zone so that buffers, areas and perimeters are in
//! metres. Only the systems needed for that round trip are supported:
//!
//! | EPSG | System |
//! |---|---|
//! | 4326 | WGS84 geographic (x = longitude, y = latitude, degrees) |
//! | 32601–32660 | WGS84 / UTM north |
//! | 32701–32760 | WGS84 / UTM south |
//! | 26901–26923 | NAD83 / UTM north (GRS80 ellipsoid) |
//!
//! The transverse Mercator series follow Snyder, *Map Projections: A Working
//! Manual* (USGS PP 1395), which is accurate to well under a millimetre
//! inside a zone. No datum shift is applied between WGS84 and NAD83; the
//! two differ by about a metre, below the accuracy of consumer-grade photo
//! geotags.

use crate::GeomError;
use geo::{Coord, MapCoords};
use std::f64::consts::PI;
use std::fmt;

/// UTM scale factor on the central meridian.
const UTM_SCALE: f64 = 0.9996;
/// UTM false easting in metres.
const FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing for southern-hemisphere zones.
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Reference ellipsoid of a datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Datum {
    Wgs84,
    Nad83,
}

impl Datum {
    fn semi_major_axis(self) -> f64 {
        6_378_137.0
    }

    fn inverse_flattening(self) -> f64 {
        match self {
            Datum::Wgs84 => 298.257_223_563,
            Datum::Nad83 => 298.257_222_101,
        }
    }

    fn eccentricity_sq(self) -> f64 {
        let f = 1.0 / self.inverse_flattening();
        f * (2.0 - f)
    }
}

/// Hemisphere of a UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

/// A supported coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Crs {
    /// Geographic WGS84, x = longitude and y = latitude in degrees.
    Wgs84,
    /// Universal Transverse Mercator, metres.
    Utm {
        zone: u8,
        hemisphere: Hemisphere,
        datum: Datum,
    },
}

impl Crs {
    /// Resolves an EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self, GeomError> {
        let utm = |zone: u32, hemisphere, datum| Crs::Utm {
            zone: zone as u8,
            hemisphere,
            datum,
        };
        match code {
            4326 => Ok(Crs::Wgs84),
            32601..=32660 => Ok(utm(code - 32600, Hemisphere::North, Datum::Wgs84)),
            32701..=32760 => Ok(utm(code - 32700, Hemisphere::South, Datum::Wgs84)),
            26901..=26923 => Ok(utm(code - 26900, Hemisphere::North, Datum::Nad83)),
            other => Err(GeomError::UnsupportedCrs(other)),
        }
    }

    /// Returns the EPSG code of this system.
    pub fn epsg(&self) -> u32 {
        match *self {
            Crs::Wgs84 => 4326,
            Crs::Utm {
                zone,
                hemisphere,
                datum,
            } => {
                let base = match (datum, hemisphere) {
                    (Datum::Wgs84, Hemisphere::North) => 32600,
                    (Datum::Wgs84, Hemisphere::South) => 32700,
                    // NAD83 UTM codes only exist north of the equator.
                    (Datum::Nad83, _) => 26900,
                };
                base + zone as u32
            }
        }
    }

    /// Returns `true` for metric (projected) systems.
    pub fn is_projected(&self) -> bool {
        matches!(self, Crs::Utm { .. })
    }

    /// Transforms a single coordinate from `self` into `target`.
    pub fn transform(&self, target: Crs, coord: Coord<f64>) -> Result<Coord<f64>, GeomError> {
        if !coord.x.is_finite() || !coord.y.is_finite() {
            return Err(GeomError::NonFiniteCoordinate {
                x: coord.x,
                y: coord.y,
                context: format!("{self} → {target} transform"),
            });
        }
        if *self == target {
            return Ok(coord);
        }
        let (lon, lat) = self.to_geographic(coord)?;
        target.from_geographic(lon, lat)
    }

    fn to_geographic(&self, coord: Coord<f64>) -> Result<(f64, f64), GeomError> {
        match *self {
            Crs::Wgs84 => {
                check_geographic(coord.x, coord.y)?;
                Ok((coord.x, coord.y))
            }
            Crs::Utm {
                zone,
                hemisphere,
                datum,
            } => Ok(utm_inverse(coord, zone, hemisphere, datum)),
        }
    }

    fn from_geographic(&self, lon: f64, lat: f64) -> Result<Coord<f64>, GeomError> {
        match *self {
            Crs::Wgs84 => Ok(Coord { x: lon, y: lat }),
            Crs::Utm {
                zone,
                hemisphere,
                datum,
            } => {
                check_geographic(lon, lat)?;
                Ok(utm_forward(lon, lat, zone, hemisphere, datum))
            }
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// Reprojects every coordinate of a geometry.
///
/// ```
/// use geo::polygon;
/// use survey_geom::{reproject, Crs};
///
/// let ll = polygon![(x: -114.0, y: 46.8), (x: -113.99, y: 46.8), (x: -113.99, y: 46.81)];
/// let utm = reproject(&ll, Crs::Wgs84, Crs::from_epsg(26911).unwrap()).unwrap();
/// assert!(utm.exterior().0[0].x > 500_000.0);
/// ```
pub fn reproject<G>(geometry: &G, from: Crs, to: Crs) -> Result<G::Output, GeomError>
where
    G: MapCoords<f64, f64>,
{
    geometry.try_map_coords(move |c| from.transform(to, c))
}

fn check_geographic(lon: f64, lat: f64) -> Result<(), GeomError> {
    if (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(GeomError::OutOfRange {
            crs: Crs::Wgs84,
            x: lon,
            y: lat,
        })
    }
}

fn central_meridian(zone: u8) -> f64 {
    (zone as f64 * 6.0 - 183.0).to_radians()
}

/// Meridional arc length from the equator to latitude `phi`.
fn meridian_arc(phi: f64, a: f64, e2: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    a * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

fn utm_forward(lon: f64, lat: f64, zone: u8, hemisphere: Hemisphere, datum: Datum) -> Coord<f64> {
    let a = datum.semi_major_axis();
    let e2 = datum.eccentricity_sq();
    let ep2 = e2 / (1.0 - e2);

    let phi = lat.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();

    let n = a / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let big_a = (lon.to_radians() - central_meridian(zone)) * cos_phi;
    let m = meridian_arc(phi, a, e2);

    let a2 = big_a * big_a;
    let a3 = a2 * big_a;
    let a4 = a3 * big_a;
    let a5 = a4 * big_a;
    let a6 = a5 * big_a;

    let x = UTM_SCALE
        * n
        * (big_a
            + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
        + FALSE_EASTING;

    let mut y = UTM_SCALE
        * (m + n
            * tan_phi
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

    if hemisphere == Hemisphere::South {
        y += FALSE_NORTHING_SOUTH;
    }

    Coord { x, y }
}

fn utm_inverse(coord: Coord<f64>, zone: u8, hemisphere: Hemisphere, datum: Datum) -> (f64, f64) {
    let a = datum.semi_major_axis();
    let e2 = datum.eccentricity_sq();
    let ep2 = e2 / (1.0 - e2);
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    let x = coord.x - FALSE_EASTING;
    let y = match hemisphere {
        Hemisphere::North => coord.y,
        Hemisphere::South => coord.y - FALSE_NORTHING_SOUTH,
    };

    let m = y / UTM_SCALE;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
    let sqrt_1_e2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let tan_phi1 = phi1.tan();
    let c1 = ep2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let denom = 1.0 - e2 * sin_phi1 * sin_phi1;
    let n1 = a / denom.sqrt();
    let r1 = a * (1.0 - e2) / denom.powf(1.5);
    let d = x / (n1 * UTM_SCALE);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let phi = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let lambda = central_meridian(zone)
        + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5
                / 120.0)
            / cos_phi1;

    (wrap_degrees(lambda * 180.0 / PI), phi.to_degrees())
}

fn wrap_degrees(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}
