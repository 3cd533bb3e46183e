//! Peak detection in (slope, power) space.
//!
//! A candidate is a peak when it is the most powerful line within
//! `±lookaround` slope units and its voter density clears `min_density`.
//! Candidates at or below the `min_power` floor (and invalid ones) never take
//! part, which keeps tiny voter sets from registering as noise peaks.
//!
//! Equal-power neighbours are both peaks; ties are settled later by overlap
//! suppression.

use crate::domain::{Peak, ScoredCandidate};

/// Flag local power maxima. Output preserves candidate order.
pub fn detect_peaks(
    candidates: &[ScoredCandidate],
    lookaround: f64,
    min_density: f64,
    min_power: f64,
) -> Vec<Peak> {
    let eligible: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.valid && c.power > min_power)
        .map(|(i, _)| i)
        .collect();

    eligible
        .iter()
        .copied()
        .filter(|&i| {
            let c = &candidates[i];
            min_density <= c.density
                && !eligible.iter().any(|&j| {
                    j != i
                        && (c.line.slope - candidates[j].line.slope).abs() <= lookaround
                        && candidates[j].power > c.power
                })
        })
        .map(|i| Peak {
            index: i,
            candidate: candidates[i],
        })
        .collect()
}
