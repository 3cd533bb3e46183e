//! Segment selection: samples -> scored candidates -> peaks -> final segments.
//!
//! Selection rules:
//! 1. Draw random pairs, append seeded pairs
//! 2. Score every non-degenerate pair by its voters
//! 3. Keep local power maxima above the density/power floors
//! 4. Drop peaks whose interval is dominated by an at-least-as-powerful peak

use log::info;
use rand::Rng;

use crate::data::DatasetContext;
use crate::domain::{LineFitParams, Overlap, Peak, SampleOrigin};
use crate::error::AppError;
use crate::fit::{ScoringOutput, compose_samples, detect_peaks, find_overlaps, score_all, suppress_overlaps, validate_params};

/// Output of sampling + scoring + selection.
#[derive(Debug, Clone)]
pub struct SegmentSelection {
    pub n_random: usize,
    pub n_seeded: usize,
    pub scoring: ScoringOutput,
    pub peaks: Vec<Peak>,
    pub overlaps: Vec<Overlap>,
    /// Peaks that survived overlap suppression, in candidate order.
    pub selection: Vec<Peak>,
}

impl SegmentSelection {
    pub fn n_valid(&self) -> usize {
        self.scoring.candidates.iter().filter(|c| c.valid).count()
    }
}

/// Run the whole line-voting workflow on a dataset.
pub fn fit_and_select<R: Rng + ?Sized>(
    ctx: &DatasetContext,
    params: &LineFitParams,
    rng: &mut R,
) -> Result<SegmentSelection, AppError> {
    validate_params(params)?;

    let samples = compose_samples(params, ctx.len(), rng)?;
    let n_seeded = samples
        .iter()
        .filter(|s| s.origin == SampleOrigin::Seeded)
        .count();
    let n_random = samples.len() - n_seeded;

    let scoring = score_all(&samples, ctx, params);
    let peaks = detect_peaks(
        &scoring.candidates,
        params.peak_lookaround,
        params.min_density,
        params.min_power,
    );
    let overlaps = find_overlaps(&peaks);
    let selection = suppress_overlaps(&peaks);

    info!(
        "selection: {} samples ({n_random} random, {n_seeded} seeded), {} scored, {} peaks, {} overlaps, {} selected",
        samples.len(),
        scoring.candidates.len(),
        peaks.len(),
        overlaps.len(),
        selection.len()
    );

    Ok(SegmentSelection {
        n_random,
        n_seeded,
        scoring,
        peaks,
        overlaps,
        selection,
    })
}
