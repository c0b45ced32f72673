// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Input documents and the bundle of loaded job inputs.
//!
//! # File formats
//! Polygon files:
//! ```json
//! { "crs": 4326,
//!   "polygons": [ { "exterior": [[-114.01, 46.70], [-113.99, 46.70], [-113.99, 46.72]],
//!                   "interiors": [] } ] }
//! ```
//! Point files:
//! ```json
//! { "crs": 26911, "points": [[725000.0, 5176000.0], [725400.0, 5176300.0]] }
//! ```
//! `crs` is an EPSG code and defaults to 4326. Everything is reprojected
//! into the job's target CRS on load.

use crate::{JobConfig, RuntimeError};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use photo_manifest::{PhotoManifest, PhotoRecord};
use std::path::Path;
use survey_geom::{reproject, ControlPointSet, Crs, SurveyArea, Validated};

fn wgs84_epsg() -> u32 {
    4326
}

/// One polygon as coordinate rings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RingsDoc {
    pub exterior: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interiors: Vec<Vec<[f64; 2]>>,
}

impl RingsDoc {
    pub fn from_polygon(polygon: &Polygon<f64>) -> Self {
        let ring = |r: &LineString<f64>| r.0.iter().map(|c| [c.x, c.y]).collect::<Vec<_>>();
        Self {
            exterior: ring(polygon.exterior()),
            interiors: polygon.interiors().iter().map(ring).collect(),
        }
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        let ring = |pts: &[[f64; 2]]| {
            LineString::from(pts.iter().map(|&[x, y]| Coord { x, y }).collect::<Vec<_>>())
        };
        Polygon::new(
            ring(&self.exterior),
            self.interiors.iter().map(|r| ring(r)).collect(),
        )
    }
}

/// A polygon file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PolygonDoc {
    #[serde(default = "wgs84_epsg")]
    pub crs: u32,
    pub polygons: Vec<RingsDoc>,
}

impl PolygonDoc {
    pub fn from_polygons(crs: Crs, polygons: &[Polygon<f64>]) -> Self {
        Self {
            crs: crs.epsg(),
            polygons: polygons.iter().map(RingsDoc::from_polygon).collect(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        read_json(path)
    }

    /// The polygons reprojected into `target`.
    pub fn polygons_in(&self, target: Crs) -> Result<Vec<Polygon<f64>>, RuntimeError> {
        let source = Crs::from_epsg(self.crs)?;
        self.polygons
            .iter()
            .map(|doc| Ok(reproject(&doc.to_polygon(), source, target)?))
            .collect()
    }
}

/// A point file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointDoc {
    #[serde(default = "wgs84_epsg")]
    pub crs: u32,
    pub points: Vec<[f64; 2]>,
}

impl PointDoc {
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        read_json(path)
    }

    /// The points as a control point set in `target`.
    pub fn control_points_in(&self, target: Crs) -> Result<ControlPointSet, RuntimeError> {
        let source = Crs::from_epsg(self.crs)?;
        let points = self.points.iter().map(|&[x, y]| Coord { x, y }).collect();
        Ok(ControlPointSet::new(points, source)?.reproject(target)?)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RuntimeError> {
    let input_error = |detail: String| RuntimeError::InputFile {
        path: path.to_path_buf(),
        detail,
    };
    let text = std::fs::read_to_string(path).map_err(|e| input_error(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| input_error(e.to_string()))
}

/// Everything a job needs, in the target CRS.
#[derive(Debug, Clone)]
pub struct JobInputs {
    pub area: SurveyArea<Validated>,
    pub control: ControlPointSet,
    pub photos: Vec<PhotoRecord>,
    /// Record CRS of `photos` (geotags are longitude/latitude).
    pub photo_crs: Crs,
    pub external_cells: Option<Vec<Polygon<f64>>>,
}

impl JobInputs {
    /// Bundles inputs that are already in memory.
    pub fn new(area: SurveyArea<Validated>, control: ControlPointSet, photos: Vec<PhotoRecord>) -> Self {
        Self {
            area,
            control,
            photos,
            photo_crs: Crs::Wgs84,
            external_cells: None,
        }
    }

    pub fn with_external_cells(mut self, cells: Vec<Polygon<f64>>) -> Self {
        self.external_cells = Some(cells);
        self
    }

    /// Loads and reprojects every input named by `config`.
    pub fn load(config: &JobConfig) -> Result<Self, RuntimeError> {
        let target = config.target_crs()?;

        let area = load_area(&config.survey_area, target)?;
        tracing::info!("{}", area.summary());

        let control = match &config.control_points {
            Some(path) => {
                let set = PointDoc::from_file(path)?.control_points_in(target)?;
                tracing::info!("loaded {} control points from '{}'", set.len(), path.display());
                set
            }
            None => {
                let exclusion = match &config.exclusion_area {
                    Some(path) => Some(MultiPolygon::new(
                        PolygonDoc::from_file(path)?.polygons_in(target)?,
                    )),
                    None => None,
                };
                ControlPointSet::synthetic_grid(
                    &area,
                    exclusion.as_ref(),
                    config.control_grid.spacing,
                )?
            }
        };

        let photos =
            PhotoManifest::from_file(&config.photo_manifest, &config.address_column)?.into_records();

        let external_cells = match &config.external_cells {
            Some(path) => Some(PolygonDoc::from_file(path)?.polygons_in(target)?),
            None => None,
        };

        Ok(Self {
            area,
            control,
            photos,
            photo_crs: Crs::Wgs84,
            external_cells,
        })
    }
}

fn load_area(path: &Path, target: Crs) -> Result<SurveyArea<Validated>, RuntimeError> {
    let mut polygons = PolygonDoc::from_file(path)?.polygons_in(target)?.into_iter();
    let first = polygons.next().ok_or_else(|| RuntimeError::InputFile {
        path: path.to_path_buf(),
        detail: "no polygons".into(),
    })?;
    let extra = polygons.count();
    if extra > 0 {
        tracing::warn!(
            "'{}' holds {} polygons; using the first as the survey area",
            path.display(),
            extra + 1,
        );
    }
    Ok(SurveyArea::new(first, target).validate()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_rings_doc_roundtrip() {
        let p = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0)]],
        );
        assert_eq!(RingsDoc::from_polygon(&p).to_polygon(), p);
    }

    #[test]
    fn test_polygon_doc_defaults_to_wgs84() {
        let doc: PolygonDoc =
            serde_json::from_str(r#"{"polygons":[{"exterior":[[-114.0,46.9],[-113.99,46.9],[-113.99,46.91]]}]}"#)
                .unwrap();
        assert_eq!(doc.crs, 4326);
        let utm = doc.polygons_in(Crs::from_epsg(26911).unwrap()).unwrap();
        assert!(utm[0].exterior().0[0].x > 500_000.0);
    }

    #[test]
    fn test_point_doc_reprojects() {
        let doc = PointDoc {
            crs: 4326,
            points: vec![[-114.0, 46.9]],
        };
        let set = doc.control_points_in(Crs::from_epsg(26911).unwrap()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.crs().epsg(), 26911);
    }

    #[test]
    fn test_unsupported_crs() {
        let doc = PointDoc {
            crs: 3857,
            points: vec![],
        };
        assert!(matches!(
            doc.control_points_in(Crs::from_epsg(26911).unwrap()),
            Err(RuntimeError::Geometry(_))
        ));
    }

    #[test]
    fn test_load_area_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "area.json", "{ not json");
        match load_area(&path, Crs::from_epsg(26911).unwrap()) {
            Err(RuntimeError::InputFile { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected InputFile, got {other:?}"),
        }

        let empty = write(dir.path(), "empty.json", r#"{"crs":26911,"polygons":[]}"#);
        assert!(matches!(
            load_area(&empty, Crs::from_epsg(26911).unwrap()),
            Err(RuntimeError::InputFile { .. })
        ));
    }

    #[test]
    fn test_load_with_synthetic_control_grid() {
        let dir = tempfile::tempdir().unwrap();
        let area = write(
            dir.path(),
            "area.json",
            r#"{"crs":26911,"polygons":[{"exterior":[[0,0],[1000,0],[1000,1000],[0,1000]]}]}"#,
        );
        let exclusion = write(
            dir.path(),
            "ex.json",
            r#"{"crs":26911,"polygons":[{"exterior":[[-1,-1],[500,-1],[500,1001],[-1,1001]]}]}"#,
        );
        let manifest = write(dir.path(), "m.csv", "url,latitude,longitude\na,46.9,-114.0\n");

        let config = JobConfig {
            survey_area: area,
            exclusion_area: Some(exclusion),
            photo_manifest: manifest,
            ..Default::default()
        };
        let inputs = JobInputs::load(&config).unwrap();
        assert!((inputs.area.area() - 1.0e6).abs() < 1e-6);
        assert!(!inputs.control.is_empty());
        assert!(inputs.control.points().iter().all(|c| c.x > 500.0));
        assert_eq!(inputs.photos.len(), 1);
        assert!(inputs.external_cells.is_none());
    }
}
