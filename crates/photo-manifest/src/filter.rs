// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Cell-based photo selection.

use crate::{ManifestError, PhotoRecord};
use geo::MultiPolygon;
use survey_geom::{strictly_contains, Crs};

/// Identifiers of the records whose geotag lies strictly inside `cell`,
/// in manifest order.
///
/// Record positions are reprojected from `record_crs` into `cell_crs`
/// before testing, so the cell keeps its metric geometry. Photos exactly
/// on the cell boundary are excluded.
pub fn filter_records(
    records: &[PhotoRecord],
    cell: &MultiPolygon<f64>,
    record_crs: Crs,
    cell_crs: Crs,
) -> Result<Vec<String>, ManifestError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let mut selected = Vec::new();
    for record in records {
        let position = record_crs.transform(cell_crs, record.coord())?;
        if strictly_contains(cell, position) {
            selected.push(record.id.clone());
        }
    }

    tracing::info!(
        "selected {} of {} photos inside the cell",
        selected.len(),
        records.len()
    );
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Coord};

    fn square(min: f64, max: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: min, y: min), (x: max, y: min), (x: max, y: max), (x: min, y: max),
        ]])
    }

    #[test]
    fn test_same_crs_keeps_order() {
        let records = vec![
            PhotoRecord::new("c", 5.0, 5.0),
            PhotoRecord::new("out", 50.0, 5.0),
            PhotoRecord::new("a", 1.0, 9.0),
        ];
        let ids = filter_records(&records, &square(0.0, 10.0), Crs::Wgs84, Crs::Wgs84).unwrap();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_boundary_excluded() {
        let records = vec![
            PhotoRecord::new("edge", 0.0, 5.0),
            PhotoRecord::new("corner", 10.0, 10.0),
        ];
        let ids = filter_records(&records, &square(0.0, 10.0), Crs::Wgs84, Crs::Wgs84).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_empty_records() {
        let ids = filter_records(&[], &square(0.0, 1.0), Crs::Wgs84, Crs::Wgs84).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_reprojects_into_cell_crs() {
        // A 2 km UTM square around a geotag near Missoula.
        let utm = Crs::from_epsg(26911).unwrap();
        let centre = Crs::Wgs84.transform(utm, Coord { x: -114.0, y: 46.9 }).unwrap();
        let cell = MultiPolygon::new(vec![polygon![
            (x: centre.x - 1000.0, y: centre.y - 1000.0),
            (x: centre.x + 1000.0, y: centre.y - 1000.0),
            (x: centre.x + 1000.0, y: centre.y + 1000.0),
            (x: centre.x - 1000.0, y: centre.y + 1000.0),
        ]]);
        let records = vec![
            PhotoRecord::new("near", -114.001, 46.901),
            PhotoRecord::new("far", -113.5, 46.9),
        ];
        let ids = filter_records(&records, &cell, Crs::Wgs84, utm).unwrap();
        assert_eq!(ids, vec!["near"]);
    }

    #[test]
    fn test_unreachable_record_errors() {
        let utm = Crs::from_epsg(32611).unwrap();
        let records = vec![PhotoRecord::new("nan", f64::NAN, 0.0)];
        assert!(filter_records(&records, &square(0.0, 10.0), Crs::Wgs84, utm).is_err());
    }
}
