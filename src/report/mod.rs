//! Reporting utilities: rankings and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::Peak;

/// The `top_n` most powerful peaks, strongest first.
///
/// Equal powers keep candidate order.
pub fn rank_by_power(peaks: &[Peak], top_n: usize) -> Vec<Peak> {
    let mut sorted = peaks.to_vec();
    sorted.sort_by(|a, b| b.candidate.power.total_cmp(&a.candidate.power));
    sorted.truncate(top_n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandidateLine, SampleOrigin, SamplePair, ScoredCandidate};

    fn peak(index: usize, power: f64) -> Peak {
        Peak {
            index,
            candidate: ScoredCandidate {
                sample: SamplePair { first: 0, second: 1, origin: SampleOrigin::Random },
                line: CandidateLine {
                    slope: 0.0,
                    intercept: 0.0,
                    buffer_y: 1.0,
                    time_scale: 1.0,
                    x1: 0.0,
                    x2: 1.0,
                },
                vote_count: 2,
                start_time: 0.0,
                end_time: 1.0,
                time_span: 1.0,
                density: 2.0,
                power,
                valid: true,
                y_start: 0.0,
                y_end: 0.0,
            },
        }
    }

    #[test]
    fn rank_by_power_basic() {
        let peaks = vec![peak(0, 5.0), peak(1, 50.0), peak(2, 5.0), peak(3, 20.0)];
        let ranked: Vec<usize> = rank_by_power(&peaks, 3).iter().map(|p| p.index).collect();
        assert_eq!(ranked, vec![1, 3, 0]);

        assert_eq!(rank_by_power(&peaks, 10).len(), 4);
        assert!(rank_by_power(&[], 3).is_empty());
    }
}
