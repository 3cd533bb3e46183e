//! Naive single-line baseline.
//!
//! Averages the series per day and fits one least-squares line through the
//! daily means. A regime-blind regression like this blurs the fill/hold/drain
//! stages together, which is what the voting segments are compared against.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::data::DatasetContext;
use crate::domain::Point;
use crate::error::AppError;
use crate::math::solve_least_squares;

/// One regression line over the daily means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineFit {
    /// Value change per scaled time unit.
    pub slope: f64,
    pub intercept: f64,
    pub time_scale: f64,
    pub rmse: f64,
    pub n_bins: usize,
}

impl BaselineFit {
    pub fn value_at(&self, time: f64) -> f64 {
        self.slope * (time / self.time_scale) + self.intercept
    }
}

/// Mean time and value of each day bucket, in time order.
pub fn daily_means(ctx: &DatasetContext) -> Vec<Point> {
    let day = ctx.time_kind().day_length();
    let mut bins: BTreeMap<i64, (f64, f64, usize)> = BTreeMap::new();

    for p in ctx.points() {
        let key = (p.time / day).floor() as i64;
        let entry = bins.entry(key).or_insert((0.0, 0.0, 0));
        entry.0 += p.time;
        entry.1 += p.value;
        entry.2 += 1;
    }

    bins.into_values()
        .map(|(t, v, n)| Point::new(t / n as f64, v / n as f64))
        .collect()
}

/// Fit `value = intercept + slope * time / time_scale` through the daily means.
pub fn fit_baseline(ctx: &DatasetContext, time_scale: f64) -> Result<BaselineFit, AppError> {
    let means = daily_means(ctx);
    let n = means.len();
    if n < 2 {
        return Err(AppError::new(
            3,
            format!("Baseline regression needs at least 2 daily bins, got {n}."),
        ));
    }

    let mut x = DMatrix::<f64>::zeros(n, 2);
    let mut y = DVector::<f64>::zeros(n);
    for (i, p) in means.iter().enumerate() {
        x[(i, 0)] = 1.0;
        x[(i, 1)] = p.time / time_scale;
        y[i] = p.value;
    }

    let beta = solve_least_squares(&x, &y)
        .ok_or_else(|| AppError::new(4, "Baseline regression is singular."))?;

    let fit = BaselineFit {
        slope: beta[1],
        intercept: beta[0],
        time_scale,
        rmse: 0.0,
        n_bins: n,
    };
    let sse: f64 = means
        .iter()
        .map(|p| {
            let r = p.value - fit.value_at(p.time);
            r * r
        })
        .sum();

    Ok(BaselineFit {
        rmse: (sse / n as f64).sqrt(),
        ..fit
    })
}
