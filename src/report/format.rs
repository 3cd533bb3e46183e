//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the sampling/scoring code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{LineFitParams, Overlap, Peak, ScoredCandidate, TimeKind};
use crate::fit::{BaselineFit, SegmentSelection};
use crate::io::ingest::IngestedData;

/// How many row errors the summary lists before eliding the rest.
const MAX_LISTED_ROW_ERRORS: usize = 5;

/// `y = 0.40x + 2130.1` style label for a candidate line (scaled time).
pub fn equation_label(c: &ScoredCandidate) -> String {
    let b = c.line.intercept;
    let sign = if b < 0.0 { '-' } else { '+' };
    format!("y = {:.2}x {sign} {:.1}", c.line.slope, b.abs())
}

/// Format the full run summary (dataset stats + sampling counts + parameters).
pub fn format_run_summary(
    ingest: &IngestedData,
    seed: u64,
    fit: &SegmentSelection,
    baseline: Option<&BaselineFit>,
    params: &LineFitParams,
) -> String {
    let ctx = &ingest.context;
    let kind = ctx.time_kind();
    let stats = ctx.stats();
    let mut out = String::new();

    out.push_str("=== lv - line voting segment fit ===\n");
    out.push_str(&format!(
        "Columns: time=`{}` ({}) | value=`{}`\n",
        ingest.columns.time,
        kind.label(),
        ingest.columns.value
    ));
    out.push_str(&format!(
        "Points: n={} | time=[{}, {}] | value=[{:.3}, {:.3}]\n",
        stats.n_points,
        kind.format_time(stats.time_min),
        kind.format_time(stats.time_max),
        stats.value_min,
        stats.value_max
    ));
    if !ctx.input_was_sorted() {
        out.push_str("Note: input rows were not in time order and have been sorted.\n");
    }

    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "Row errors: {} of {} rows skipped\n",
            ingest.row_errors.len(),
            ingest.rows_read
        ));
        for err in ingest.row_errors.iter().take(MAX_LISTED_ROW_ERRORS) {
            out.push_str(&format!("  line {}: {}\n", err.line, err.message));
        }
        if ingest.row_errors.len() > MAX_LISTED_ROW_ERRORS {
            out.push_str(&format!(
                "  ... and {} more\n",
                ingest.row_errors.len() - MAX_LISTED_ROW_ERRORS
            ));
        }
    }

    out.push_str("\nParameters:\n");
    out.push_str(&format!(
        "- buffer distance: {} | time scale: {}\n",
        params.buffer_distance, params.time_scale
    ));
    out.push_str(&format!(
        "- peaks: lookaround={} | min density={} | min power={}\n",
        params.peak_lookaround, params.min_density, params.min_power
    ));
    out.push_str(&format!("- seed: {seed}\n"));

    out.push_str("\nSampling:\n");
    out.push_str(&format!(
        "- samples: {} random + {} seeded\n",
        fit.n_random, fit.n_seeded
    ));
    out.push_str(&format!(
        "- scored: {} ({} valid, {} degenerate skipped)\n",
        fit.scoring.candidates.len(),
        fit.n_valid(),
        fit.scoring.skipped_degenerate
    ));
    out.push_str(&format!(
        "- peaks: {} | overlaps: {} | selected: {}\n",
        fit.peaks.len(),
        fit.overlaps.len(),
        fit.selection.len()
    ));

    if let Some(b) = baseline {
        out.push_str("\nBaseline (single line through daily means):\n");
        let sign = if b.intercept < 0.0 { '-' } else { '+' };
        out.push_str(&format!(
            "- y = {:.4}x {sign} {:.3} | RMSE={:.4} | days={}\n",
            b.slope,
            b.intercept.abs(),
            b.rmse,
            b.n_bins
        ));
    }

    out
}

/// Format a titled table of peaks.
pub fn format_peaks_table(title: &str, peaks: &[Peak], time_kind: TimeKind) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push_str(":\n");

    if peaks.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    out.push_str(
        format!(
            "{:>6} {:<6} {:>10} {:>6} {:>12} {:>12} {:>10} {:>10} {:>12} {}",
            "idx", "origin", "slope", "votes", "start", "end", "span", "density", "power", "equation"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<6} {:-<6} {:-<10} {:-<6} {:-<12} {:-<12} {:-<10} {:-<10} {:-<12} {:-<8}",
            "", "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for p in peaks {
        let c = &p.candidate;
        out.push_str(
            format!(
                "{:>6} {:<6} {:>10.4} {:>6} {:>12} {:>12} {:>10.3} {:>10.3} {:>12.3} {}",
                p.index,
                c.sample.origin.label(),
                c.line.slope,
                c.vote_count,
                truncate(&time_kind.format_time(c.start_time), 12),
                truncate(&time_kind.format_time(c.end_time), 12),
                c.time_span,
                c.density,
                c.power,
                equation_label(c)
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the final, overlap-free segments.
pub fn format_selection(selection: &[Peak], time_kind: TimeKind) -> String {
    format_peaks_table("Selected segments", selection, time_kind)
}

/// Format the overlap relations (`big` covers `small`).
pub fn format_overlaps(overlaps: &[Overlap]) -> String {
    let mut out = String::from("Overlaps (big covers small):\n");
    if overlaps.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for o in overlaps {
        out.push_str(&format!("  #{} covers #{}\n", o.big, o.small));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
