//! Shared "fit pipeline" logic used by the `fit` and `peaks` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> seed -> sample/score/select -> optional baseline
//!
//! The command handlers can then focus on presentation (printing vs exports).

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::data::DatasetContext;
use crate::domain::{FitConfig, LineFitParams};
use crate::error::AppError;
use crate::fit::{BaselineFit, SegmentSelection, fit_and_select, fit_baseline, resolve_seed, validate_params};
use crate::io::ingest::{IngestedData, load_points};

/// All computed outputs of a single `lv fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    /// The seed the sampling RNG was built from.
    pub seed: u64,
    pub fit: SegmentSelection,
    pub baseline: Option<BaselineFit>,
}

/// Execute the full pipeline for a CSV input.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    // Bad tunables should fail before any file is read.
    validate_params(&config.params)?;

    let ingest = load_points(
        &config.csv_path,
        config.time_column.as_deref(),
        config.value_column.as_deref(),
    )?;

    let seed = resolve_seed(&config.params);
    let (fit, baseline) = run_on_context(&ingest.context, &config.params, seed, config.baseline)?;

    Ok(RunOutput {
        ingest,
        seed,
        fit,
        baseline,
    })
}

/// Sample, score and select on an already-built dataset.
///
/// Deterministic for a given `(ctx, params, seed)`.
pub fn run_on_context(
    ctx: &DatasetContext,
    params: &LineFitParams,
    seed: u64,
    with_baseline: bool,
) -> Result<(SegmentSelection, Option<BaselineFit>), AppError> {
    debug!("pipeline: sampling seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);
    let fit = fit_and_select(ctx, params, &mut rng)?;

    let baseline = if with_baseline {
        let b = fit_baseline(ctx, params.time_scale)?;
        info!(
            "pipeline: baseline slope {:.4} over {} daily bins (rmse {:.4})",
            b.slope, b.n_bins, b.rmse
        );
        Some(b)
    } else {
        None
    };

    Ok((fit, baseline))
}
