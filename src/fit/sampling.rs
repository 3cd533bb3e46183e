//! Candidate sample generation.
//!
//! Candidate lines come from two explicit sources:
//!
//! - **random**: uniformly drawn pairs of distinct point indices
//! - **seeded**: curated index pairs known to sit on meaningful regimes
//!
//! The seeded source guarantees coverage of known-good solutions even when the
//! random budget is small relative to the number of points. `compose_samples`
//! concatenates both sources as configured by `LineFitParams`.

use rand::Rng;
use rand::seq::index;

use crate::domain::{LineFitParams, SampleOrigin, SamplePair};
use crate::error::AppError;

/// Check every tunable before any work is done.
pub fn validate_params(params: &LineFitParams) -> Result<(), AppError> {
    if !(params.buffer_distance.is_finite() && params.buffer_distance > 0.0) {
        return Err(AppError::new(
            2,
            format!("Invalid buffer distance: {} (must be finite and > 0).", params.buffer_distance),
        ));
    }
    if !(params.time_scale.is_finite() && params.time_scale > 0.0) {
        return Err(AppError::new(
            2,
            format!("Invalid time scale: {} (must be finite and > 0).", params.time_scale),
        ));
    }
    if !(params.peak_lookaround.is_finite() && params.peak_lookaround >= 0.0) {
        return Err(AppError::new(
            2,
            format!("Invalid peak lookaround: {} (must be finite and >= 0).", params.peak_lookaround),
        ));
    }
    if !params.min_density.is_finite() {
        return Err(AppError::new(2, "Minimum density must be finite."));
    }
    if !params.min_power.is_finite() {
        return Err(AppError::new(2, "Minimum power must be finite."));
    }
    if params.random_samples == 0 && params.seed_pairs.is_empty() {
        return Err(AppError::new(
            2,
            "Nothing to sample: set --samples > 0 or pass at least one --seed-pair.",
        ));
    }
    Ok(())
}

/// Draw `count` pairs of distinct indices in `0..n_points`.
///
/// The same pair may come up more than once. Returns nothing for fewer than two points.
pub fn random_pairs<R: Rng + ?Sized>(rng: &mut R, n_points: usize, count: usize) -> Vec<SamplePair> {
    if n_points < 2 {
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            let picked = index::sample(rng, n_points, 2);
            SamplePair {
                first: picked.index(0),
                second: picked.index(1),
                origin: SampleOrigin::Random,
            }
        })
        .collect()
}

/// Validate curated index pairs against the dataset size.
pub fn seeded_pairs(pairs: &[(usize, usize)], n_points: usize) -> Result<Vec<SamplePair>, AppError> {
    pairs
        .iter()
        .map(|&(first, second)| {
            if first >= n_points || second >= n_points {
                return Err(AppError::new(
                    2,
                    format!("Seed pair {first}:{second} is out of range for {n_points} points."),
                ));
            }
            Ok(SamplePair {
                first,
                second,
                origin: SampleOrigin::Seeded,
            })
        })
        .collect()
}

/// Random pairs followed by seeded pairs.
pub fn compose_samples<R: Rng + ?Sized>(
    params: &LineFitParams,
    n_points: usize,
    rng: &mut R,
) -> Result<Vec<SamplePair>, AppError> {
    let seeded = seeded_pairs(&params.seed_pairs, n_points)?;
    let mut samples = random_pairs(rng, n_points, params.random_samples);
    samples.extend(seeded);
    Ok(samples)
}

/// The configured seed, or a freshly drawn one.
pub fn resolve_seed(params: &LineFitParams) -> u64 {
    params.sample_seed.unwrap_or_else(|| rand::thread_rng().r#gen())
}
