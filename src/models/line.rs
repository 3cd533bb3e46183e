//! Two-point line model with a constant perpendicular tolerance band.
//!
//! Time is divided by `time_scale` before fitting. Without it, milliseconds
//! against metres makes every slope ~0 and `cos(atan(m))` rounds to 1, so the
//! band would lose its slope compensation.

use crate::domain::{CandidateLine, Point};

/// Fit the line through `p1` and `p2`.
///
/// Returns `None` for degenerate pairs (equal times) or non-finite slopes.
pub fn fit_line(p1: &Point, p2: &Point, buffer_distance: f64, time_scale: f64) -> Option<CandidateLine> {
    let dt = (p2.time - p1.time) / time_scale;
    if dt == 0.0 || !dt.is_finite() {
        return None;
    }

    let slope = (p2.value - p1.value) / dt;
    if !slope.is_finite() {
        return None;
    }

    let intercept = p1.value - slope * (p1.time / time_scale);
    // Vertical half-width whose perpendicular distance is `buffer_distance`.
    let buffer_y = buffer_distance / slope.atan().cos();

    Some(CandidateLine {
        slope,
        intercept,
        buffer_y,
        time_scale,
        x1: p1.time.min(p2.time),
        x2: p1.time.max(p2.time),
    })
}

impl CandidateLine {
    /// Line value at (unscaled) `time`.
    pub fn value_at(&self, time: f64) -> f64 {
        self.slope * (time / self.time_scale) + self.intercept
    }

    /// Whether `point` lies inside the tolerance band.
    pub fn contains(&self, point: &Point) -> bool {
        (point.value - self.value_at(point.time)).abs() <= self.buffer_y
    }

    /// Perpendicular distance from `point` to the line, in scaled units.
    pub fn perpendicular_distance(&self, point: &Point) -> f64 {
        let vertical = (point.value - self.value_at(point.time)).abs();
        vertical * self.slope.atan().cos()
    }
}
