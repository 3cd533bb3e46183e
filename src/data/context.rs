//! Dataset context shared by every analysis stage.
//!
//! The context is built exactly once from the loaded points. It owns the
//! time-sorted observations together with the dataset-wide extents, so no
//! stage ever has to rescan (or re-sort) the input.

use crate::domain::{DatasetStats, Point, TimeKind};
use crate::error::AppError;

/// Immutable, time-sorted dataset plus its summary stats.
#[derive(Debug, Clone)]
pub struct DatasetContext {
    points: Vec<Point>,
    time_kind: TimeKind,
    stats: DatasetStats,
    input_was_sorted: bool,
}

impl DatasetContext {
    /// Build a context, sorting the points by time if needed.
    ///
    /// Fails with exit code `2` on non-finite coordinates and `3` on an empty set.
    pub fn new(mut points: Vec<Point>, time_kind: TimeKind) -> Result<Self, AppError> {
        if let Some(idx) = points
            .iter()
            .position(|p| !(p.time.is_finite() && p.value.is_finite()))
        {
            return Err(AppError::new(
                2,
                format!("Point #{idx} has a non-finite time or value."),
            ));
        }

        let input_was_sorted = points.windows(2).all(|w| w[0].time <= w[1].time);
        if !input_was_sorted {
            // Stable: equal timestamps keep their input order.
            points.sort_by(|a, b| a.time.total_cmp(&b.time));
        }

        let stats = compute_stats(&points)
            .ok_or_else(|| AppError::new(3, "Dataset has no points."))?;

        Ok(Self {
            points,
            time_kind,
            stats,
            input_was_sorted,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn time_kind(&self) -> TimeKind {
        self.time_kind
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    /// Whether the points arrived already ordered by time.
    pub fn input_was_sorted(&self) -> bool {
        self.input_was_sorted
    }
}

fn compute_stats(points: &[Point]) -> Option<DatasetStats> {
    if points.is_empty() {
        return None;
    }

    let mut time_min = f64::INFINITY;
    let mut time_max = f64::NEG_INFINITY;
    let mut value_min = f64::INFINITY;
    let mut value_max = f64::NEG_INFINITY;

    for p in points {
        time_min = time_min.min(p.time);
        time_max = time_max.max(p.time);
        value_min = value_min.min(p.value);
        value_max = value_max.max(p.value);
    }

    if !time_min.is_finite() || !time_max.is_finite() || !value_min.is_finite() || !value_max.is_finite() {
        return None;
    }

    Some(DatasetStats {
        n_points: points.len(),
        time_min,
        time_max,
        value_min,
        value_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_sorts_out_of_order_input() {
        let points = vec![
            Point::new(3.0, 30.0),
            Point::new(1.0, 10.0),
            Point::new(2.0, 20.0),
        ];
        let ctx = DatasetContext::new(points, TimeKind::Ordinal).unwrap();

        assert!(!ctx.input_was_sorted());
        let times: Vec<f64> = ctx.points().iter().map(|p| p.time).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
        assert_eq!(ctx.stats().time_min, 1.0);
        assert_eq!(ctx.stats().time_max, 3.0);
        assert_eq!(ctx.stats().value_min, 10.0);
        assert_eq!(ctx.stats().value_max, 30.0);
    }

    #[test]
    fn context_rejects_empty_and_non_finite() {
        let err = DatasetContext::new(Vec::new(), TimeKind::Ordinal).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        let err = DatasetContext::new(vec![Point::new(f64::NAN, 1.0)], TimeKind::Ordinal).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
