//! Vote counting for candidate lines.
//!
//! Given a candidate line, every point inside its tolerance band is a voter.
//! The voters' time extent gives:
//!
//! - `density = votes / span`: rewards temporally compact support
//! - `power = votes² / span`: rewards support size and compactness jointly
//!
//! Candidates are independent, so `score_all` evaluates them in parallel and
//! collects in sample order.

use log::debug;
use rayon::prelude::*;

use crate::data::DatasetContext;
use crate::domain::{CandidateLine, LineFitParams, SamplePair, ScoredCandidate};
use crate::models::fit_line;

/// Scored candidates for a batch of samples.
#[derive(Debug, Clone)]
pub struct ScoringOutput {
    /// One entry per non-degenerate sample, in sample order.
    pub candidates: Vec<ScoredCandidate>,
    /// Samples whose two points share a timestamp.
    pub skipped_degenerate: usize,
}

/// Count the voters of `line` and derive its span/density/power.
pub fn score(sample: SamplePair, line: &CandidateLine, ctx: &DatasetContext) -> ScoredCandidate {
    let mut vote_count = 0usize;
    let mut start_time = f64::INFINITY;
    let mut end_time = f64::NEG_INFINITY;

    for p in ctx.points().iter().filter(|p| line.contains(p)) {
        vote_count += 1;
        start_time = start_time.min(p.time);
        end_time = end_time.max(p.time);
    }

    if vote_count == 0 {
        start_time = line.x1;
        end_time = line.x1;
    }

    let time_span = (end_time - start_time) / line.time_scale;
    let valid = vote_count >= 2 && time_span > 0.0 && time_span.is_finite();
    let (density, power) = if valid {
        let votes = vote_count as f64;
        (votes / time_span, votes * votes / time_span)
    } else {
        (0.0, 0.0)
    };

    let stats = ctx.stats();
    ScoredCandidate {
        sample,
        line: *line,
        vote_count,
        start_time,
        end_time,
        time_span,
        density,
        power,
        valid,
        y_start: line.value_at(stats.time_min),
        y_end: line.value_at(stats.time_max),
    }
}

/// Fit and score every sample, skipping degenerate pairs.
pub fn score_all(samples: &[SamplePair], ctx: &DatasetContext, params: &LineFitParams) -> ScoringOutput {
    let points = ctx.points();

    let candidates: Vec<ScoredCandidate> = samples
        .par_iter()
        .filter_map(|sample| {
            let p1 = points.get(sample.first)?;
            let p2 = points.get(sample.second)?;
            let line = fit_line(p1, p2, params.buffer_distance, params.time_scale)?;
            Some(score(*sample, &line, ctx))
        })
        .collect();

    let skipped_degenerate = samples.len() - candidates.len();
    if skipped_degenerate > 0 {
        debug!("score_all: skipped {skipped_degenerate} degenerate sample pair(s)");
    }

    ScoringOutput {
        candidates,
        skipped_degenerate,
    }
}
