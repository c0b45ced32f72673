// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tabular photo manifest.
//!
//! # Format
//! Comma-separated text with a header row. Column order is free; the
//! `latitude`, `longitude` and address columns are located by name
//! (case-insensitive), other columns are ignored. Fields may be wrapped in
//! double quotes, with `""` standing for a literal quote; a quoted field
//! may span several lines. Errors report the line a row starts on.
//!
//! ```text
//! url,latitude,longitude,altitude
//! https://example.org/DJI_0001.JPG,46.70215,-114.00912,1023.4
//! ```

use crate::{ManifestError, PhotoRecord};
use std::path::Path;

/// Default name of the address column.
pub const DEFAULT_ADDRESS_COLUMN: &str = "url";

/// An ordered list of photo records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoManifest {
    records: Vec<PhotoRecord>,
}

impl PhotoManifest {
    pub fn new(records: Vec<PhotoRecord>) -> Self {
        Self { records }
    }

    /// Reads a manifest file.
    pub fn from_file(path: &Path, address_column: &str) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path)?;
        let manifest = Self::from_csv(&text, address_column)?;
        tracing::info!(
            "loaded {} photo records from '{}'",
            manifest.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Parses manifest text.
    pub fn from_csv(text: &str, address_column: &str) -> Result<Self, ManifestError> {
        let mut rows = logical_rows(text).into_iter();

        let (header_line, header) = rows.next().ok_or(ManifestError::Empty)?;
        let columns = split_fields(&header, header_line)?;
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| ManifestError::MissingColumn(name.to_string()))
        };
        let id_col = find(address_column)?;
        let lat_col = find("latitude")?;
        let lon_col = find("longitude")?;
        let needed = id_col.max(lat_col).max(lon_col) + 1;

        let mut records = Vec::new();
        for (line, row) in rows {
            let fields = split_fields(&row, line)?;
            if fields.len() < needed {
                return Err(ManifestError::ParseError {
                    line,
                    detail: format!("expected at least {needed} fields, found {}", fields.len()),
                });
            }
            let latitude = parse_degrees(&fields[lat_col], "latitude", 90.0, line)?;
            let longitude = parse_degrees(&fields[lon_col], "longitude", 180.0, line)?;
            records.push(PhotoRecord {
                id: fields[id_col].trim().to_string(),
                longitude,
                latitude,
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PhotoRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_degrees(raw: &str, name: &str, limit: f64, line: usize) -> Result<f64, ManifestError> {
    let value: f64 = raw.trim().parse().map_err(|_| ManifestError::ParseError {
        line,
        detail: format!("{name} '{}' is not a number", raw.trim()),
    })?;
    if !value.is_finite() || value.abs() > limit {
        return Err(ManifestError::ParseError {
            line,
            detail: format!("{name} {value} outside ±{limit}°"),
        });
    }
    Ok(value)
}

/// Joins physical lines into rows, keeping newlines inside open quotes.
/// Blank lines outside quotes are skipped. Each row carries its 1-based
/// starting line.
fn logical_rows(text: &str) -> Vec<(usize, String)> {
    let mut rows = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        let (start, row) = match pending.take() {
            Some((start, mut row)) => {
                row.push('\n');
                row.push_str(line);
                (start, row)
            }
            None if line.trim().is_empty() => continue,
            None => (i + 1, line.to_string()),
        };
        // Escaped quotes come in pairs, so an odd count means a field is open.
        if row.matches('"').count() % 2 == 1 {
            pending = Some((start, row));
        } else {
            rows.push((start, row));
        }
    }
    rows.extend(pending);
    rows
}

/// Splits one CSV row, honouring double-quoted fields.
fn split_fields(row: &str, line: usize) -> Result<Vec<String>, ManifestError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = row.chars().peekable();

    while let Some(ch) = chars.next() {
        match (ch, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => quoted = false,
            ('"', false) if field.trim().is_empty() => {
                field.clear();
                quoted = true;
            }
            (',', false) => fields.push(std::mem::take(&mut field)),
            (c, _) => field.push(c),
        }
    }
    if quoted {
        return Err(ManifestError::ParseError {
            line,
            detail: "unterminated quoted field".into(),
        });
    }
    fields.push(field);
    Ok(fields)
}
