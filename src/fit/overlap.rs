//! Non-max suppression over peak time intervals.
//!
//! A peak `big` dominates `small` when its `[start, end]` interval contains
//! `small`'s and it is at least as powerful. Dominated peaks are dropped.
//!
//! Exact twins (same interval, same power) would otherwise dominate each other
//! and both disappear; for those only the earlier candidate dominates, so
//! exactly one twin survives.

use crate::domain::{Overlap, Peak};

/// Whether `big` dominates `small`.
pub fn dominates(big: &Peak, small: &Peak) -> bool {
    if big.index == small.index {
        return false;
    }
    let (b, s) = (&big.candidate, &small.candidate);
    let covers = b.start_time <= s.start_time && b.end_time >= s.end_time;
    if !covers || b.power < s.power {
        return false;
    }

    let twins = b.start_time == s.start_time && b.end_time == s.end_time && b.power == s.power;
    !twins || big.index < small.index
}

/// Every `(big, small)` domination relation between distinct peaks.
pub fn find_overlaps(peaks: &[Peak]) -> Vec<Overlap> {
    peaks
        .iter()
        .flat_map(|big| {
            peaks
                .iter()
                .filter(move |small| dominates(big, small))
                .map(move |small| Overlap {
                    big: big.index,
                    small: small.index,
                })
        })
        .collect()
}

/// Peaks that no other peak dominates, in input order.
pub fn suppress_overlaps(peaks: &[Peak]) -> Vec<Peak> {
    peaks
        .iter()
        .filter(|small| !peaks.iter().any(|big| dominates(big, small)))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandidateLine, SampleOrigin, SamplePair, ScoredCandidate};

    fn peak(index: usize, start: f64, end: f64, power: f64) -> Peak {
        Peak {
            index,
            candidate: ScoredCandidate {
                sample: SamplePair {
                    first: 0,
                    second: 1,
                    origin: SampleOrigin::Random,
                },
                line: CandidateLine {
                    slope: 0.0,
                    intercept: 0.0,
                    buffer_y: 1.0,
                    time_scale: 1.0,
                    x1: start,
                    x2: end,
                },
                vote_count: 100,
                start_time: start,
                end_time: end,
                time_span: end - start,
                density: 100.0 / (end - start),
                power,
                valid: true,
                y_start: 0.0,
                y_end: 0.0,
            },
        }
    }

    fn indices(peaks: &[Peak]) -> Vec<usize> {
        peaks.iter().map(|p| p.index).collect()
    }

    #[test]
    fn contained_weaker_peak_is_dropped() {
        let peaks = vec![peak(0, 0.0, 100.0, 5000.0), peak(1, 10.0, 20.0, 3000.0)];
        assert_eq!(indices(&suppress_overlaps(&peaks)), vec![0]);
        assert_eq!(find_overlaps(&peaks), vec![Overlap { big: 0, small: 1 }]);
    }

    #[test]
    fn contained_stronger_peak_survives() {
        let peaks = vec![peak(0, 0.0, 100.0, 2000.0), peak(1, 10.0, 20.0, 3000.0)];
        assert_eq!(indices(&suppress_overlaps(&peaks)), vec![0, 1]);
    }

    #[test]
    fn partial_overlap_keeps_both() {
        let peaks = vec![peak(0, 0.0, 50.0, 5000.0), peak(1, 40.0, 90.0, 3000.0)];
        assert!(find_overlaps(&peaks).is_empty());
        assert_eq!(suppress_overlaps(&peaks).len(), 2);
    }

    #[test]
    fn identical_twins_keep_exactly_the_first() {
        let peaks = vec![
            peak(7, 0.0, 10.0, 2000.0),
            peak(3, 0.0, 10.0, 2000.0),
            peak(9, 50.0, 60.0, 1500.0),
        ];
        let kept = suppress_overlaps(&peaks);
        assert_eq!(indices(&kept), vec![3, 9]);
        assert_eq!(find_overlaps(&peaks), vec![Overlap { big: 3, small: 7 }]);
    }

    #[test]
    fn equal_power_wider_span_wins() {
        let peaks = vec![peak(0, 5.0, 10.0, 2000.0), peak(1, 0.0, 10.0, 2000.0)];
        assert_eq!(indices(&suppress_overlaps(&peaks)), vec![1]);
    }

    #[test]
    fn strongest_peak_is_never_removed() {
        let peaks = vec![
            peak(0, 0.0, 100.0, 1200.0),
            peak(1, 20.0, 30.0, 9000.0),
            peak(2, 20.0, 30.0, 9000.0),
            peak(3, 25.0, 28.0, 4000.0),
            peak(4, 10.0, 40.0, 8000.0),
        ];
        let kept = suppress_overlaps(&peaks);
        let best = kept.iter().map(|p| p.candidate.power).fold(f64::MIN, f64::max);
        assert_eq!(best, 9000.0);
        assert_eq!(indices(&kept), vec![0, 1, 4]);
    }
}
