//! CSV exports.
//!
//! Meant to be easy to consume in spreadsheets or downstream scripts:
//!
//! - every scored candidate with its peak/selection flags
//! - a synthetic series in the same two-column layout `fit` reads

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{Peak, Point, ScoredCandidate, TimeKind};
use crate::error::AppError;

/// Render a time value the way `ingest` reads it back.
pub fn export_time(time_kind: TimeKind, t: f64) -> String {
    match time_kind {
        TimeKind::EpochMillis => DateTime::<Utc>::from_timestamp_millis(t.round() as i64)
            .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| format!("{t:.0}")),
        TimeKind::Ordinal => format!("{t}"),
    }
}

/// Write every scored candidate to a CSV file.
pub fn write_candidates_csv(
    path: &Path,
    candidates: &[ScoredCandidate],
    peaks: &[Peak],
    selection: &[Peak],
    time_kind: TimeKind,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    let peak_set: HashSet<usize> = peaks.iter().map(|p| p.index).collect();
    let selected_set: HashSet<usize> = selection.iter().map(|p| p.index).collect();

    writeln!(
        out,
        "index,origin,first,second,slope,intercept,buffer_y,votes,start_time,end_time,span,density,power,valid,is_peak,selected"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (i, c) in candidates.iter().enumerate() {
        writeln!(
            out,
            "{},{},{},{},{:.10},{:.6},{:.6},{},{},{},{:.6},{:.6},{:.6},{},{},{}",
            i,
            c.sample.origin.label(),
            c.sample.first,
            c.sample.second,
            c.line.slope,
            c.line.intercept,
            c.line.buffer_y,
            c.vote_count,
            export_time(time_kind, c.start_time),
            export_time(time_kind, c.end_time),
            c.time_span,
            c.density,
            c.power,
            c.valid,
            peak_set.contains(&i),
            selected_set.contains(&i),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write a `time,value` series to a CSV file.
pub fn write_levels_csv(path: &Path, points: &[Point], time_kind: TimeKind) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "time,value")
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;
    for p in points {
        writeln!(out, "{},{:.4}", export_time(time_kind, p.time), p.value)
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}
