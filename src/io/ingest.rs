//! CSV ingest and normalization.
//!
//! This module is responsible for turning a two-column time series CSV into a
//! clean, time-sorted `DatasetContext`.
//!
//! Design goals:
//! - **Forgiving headers** (BOM stripped, case-insensitive, common aliases)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use log::{info, warn};

use crate::data::DatasetContext;
use crate::domain::{Point, TimeKind};
use crate::error::AppError;

/// Header names tried, in order, when no time column is given.
const TIME_COLUMNS: [&str; 4] = ["time", "timestamp", "datetime", "date"];
/// Header names tried, in order, when no value column is given.
const VALUE_COLUMNS: [&str; 3] = ["value", "level", "water_level_masl"];

/// The resolved column names (as written in the file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub time: String,
    pub value: String,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: dataset context + resolved columns + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub context: DatasetContext,
    pub columns: ColumnSpec,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a CSV file into a dataset context.
pub fn load_points(
    path: &Path,
    time_column: Option<&str>,
    value_column: Option<&str>,
) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_points(file, time_column, value_column)?;

    info!(
        "ingest: {} rows read, {} used, {} row errors from '{}'",
        data.rows_read,
        data.rows_used,
        data.row_errors.len(),
        path.display()
    );
    Ok(data)
}

/// Parse CSV content from any reader.
pub fn read_points<R: Read>(
    reader: R,
    time_column: Option<&str>,
    value_column: Option<&str>,
) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let time_idx = resolve_column(&header_map, time_column, &TIME_COLUMNS, "time")?;
    let value_idx = match resolve_column(&header_map, value_column, &VALUE_COLUMNS, "value") {
        Ok(idx) => idx,
        // A bare two-column file: the value is whatever is not the time.
        Err(_) if value_column.is_none() && headers.len() == 2 => 1 - time_idx,
        Err(e) => return Err(e),
    };
    if time_idx == value_idx {
        return Err(AppError::new(2, "Time and value columns must differ."));
    }

    let columns = ColumnSpec {
        time: clean_header(&headers[time_idx]).to_string(),
        value: clean_header(&headers[value_idx]).to_string(),
    };

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut time_kind: Option<TimeKind> = None;

    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header line.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, time_idx, value_idx, &columns) {
            Ok((kind, point)) => match time_kind {
                Some(expected) if expected != kind => row_errors.push(RowError {
                    line,
                    message: format!(
                        "Time '{}' is a {} but earlier rows are {}.",
                        record.get(time_idx).unwrap_or(""),
                        kind.label(),
                        expected.label()
                    ),
                }),
                _ => {
                    time_kind = Some(kind);
                    points.push(point);
                }
            },
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in row_errors.iter().take(5) {
        warn!("ingest: line {}: {}", err.line, err.message);
    }

    let rows_used = points.len();
    let Some(time_kind) = time_kind else {
        return Err(AppError::new(3, "No valid rows remain after parsing."));
    };

    let context = DatasetContext::new(points, time_kind)?;

    Ok(IngestedData {
        context,
        columns,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins on duplicate names.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn clean_header(name: &str) -> &str {
    // Excel-style UTF-8 exports may prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}')
}

fn normalize_header_name(name: &str) -> String {
    clean_header(name).to_ascii_lowercase()
}

fn resolve_column(
    header_map: &HashMap<String, usize>,
    explicit: Option<&str>,
    aliases: &[&str],
    role: &str,
) -> Result<usize, AppError> {
    if let Some(name) = explicit {
        return header_map
            .get(&normalize_header_name(name))
            .copied()
            .ok_or_else(|| AppError::new(2, format!("Missing {role} column: `{name}`")));
    }

    aliases
        .iter()
        .find_map(|alias| header_map.get(*alias).copied())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!(
                    "Could not find a {role} column (tried: {}). Pass --{role}-column.",
                    aliases.join(", ")
                ),
            )
        })
}

fn parse_row(
    record: &StringRecord,
    time_idx: usize,
    value_idx: usize,
    columns: &ColumnSpec,
) -> Result<(TimeKind, Point), String> {
    let time_raw = get_required(record, time_idx, &columns.time)?;
    let value_raw = get_required(record, value_idx, &columns.value)?;

    let (kind, time) = parse_time(time_raw)?;
    let value = value_raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid value '{value_raw}' in `{}`.", columns.value))?;

    Ok((kind, Point::new(time, value)))
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

/// Parse a timestamp into epoch milliseconds, or fall back to a plain number.
pub fn parse_time(s: &str) -> Result<(TimeKind, f64), String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok((TimeKind::EpochMillis, dt.timestamp_millis() as f64));
    }

    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    let naive = s.trim_end_matches('Z');
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok((TimeKind::EpochMillis, dt.and_utc().timestamp_millis() as f64));
        }
    }

    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok((TimeKind::EpochMillis, dt.and_utc().timestamp_millis() as f64));
            }
        }
    }

    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok((TimeKind::Ordinal, v)),
        _ => Err(format!(
            "Invalid time '{s}'. Expected RFC 3339, YYYY-MM-DD[ HH:MM[:SS]], DD/MM/YYYY or a number."
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dates_and_sorts() {
        let csv = "\u{feff}Time,water_level_masl\n\
                   2024-01-03T00:00:00Z,2150.5\n\
                   2024-01-01,2150.0\n\
                   2024-01-02 12:00:00,2150.25\n";
        let data = read_points(csv.as_bytes(), None, None).unwrap();

        assert_eq!(data.columns.time, "Time");
        assert_eq!(data.columns.value, "water_level_masl");
        assert_eq!(data.rows_used, 3);
        assert_eq!(data.context.time_kind(), TimeKind::EpochMillis);
        assert!(!data.context.input_was_sorted());

        let values: Vec<f64> = data.context.points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2150.0, 2150.25, 2150.5]);
        assert_eq!(TimeKind::EpochMillis.format_time(data.context.stats().time_min), "2024-01-01");
    }

    #[test]
    fn numeric_times_are_ordinal() {
        let csv = "t,y\n0,0\n1,1\n2,2\n";
        let err = read_points(csv.as_bytes(), None, None).unwrap_err();
        // `t` is not a known alias, and the two-column fallback only covers the value.
        assert_eq!(err.exit_code(), 2);

        let data = read_points(csv.as_bytes(), Some("t"), None).unwrap();
        assert_eq!(data.context.time_kind(), TimeKind::Ordinal);
        assert_eq!(data.columns.value, "y");
        assert_eq!(data.context.len(), 3);
    }

    #[test]
    fn bad_rows_are_reported_not_fatal() {
        let csv = "time,value\n0,1.0\nnope,2.0\n2,\n3,abc\n2024-01-01,5\n4,4.0\n";
        let data = read_points(csv.as_bytes(), None, None).unwrap();

        assert_eq!(data.rows_read, 6);
        assert_eq!(data.rows_used, 2);
        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6]);
    }

    #[test]
    fn no_valid_rows_is_fatal() {
        let csv = "time,value\nx,y\n";
        let err = read_points(csv.as_bytes(), None, None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn explicit_missing_column_is_an_error() {
        let csv = "time,value\n0,1\n";
        let err = read_points(csv.as_bytes(), None, Some("level")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
