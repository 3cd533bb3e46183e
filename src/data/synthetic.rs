//! Synthetic level series generation.
//!
//! Produces a regularly sampled series that follows a sequence of linear
//! regimes (e.g. a reservoir filling, holding, then draining) with Gaussian
//! measurement noise. Handy for demos and for exercising the pipeline on data
//! whose true segments are known.

use chrono::{DateTime, Utc};
use rand::prelude::*;
use rand_distr::Normal;

use crate::domain::Point;
use crate::error::AppError;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// One linear stretch of the generated series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regime {
    pub days: f64,
    /// Level change per day.
    pub slope_per_day: f64,
}

#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub start: DateTime<Utc>,
    pub step_hours: f64,
    pub start_level: f64,
    pub noise_sigma: f64,
    pub regimes: Vec<Regime>,
}

impl SynthConfig {
    /// Fill, hold, drain: the shape of a reservoir recovering from a drought.
    pub fn reservoir(start: DateTime<Utc>) -> Self {
        Self {
            start,
            step_hours: 1.0,
            start_level: 2130.0,
            noise_sigma: 0.15,
            regimes: vec![
                Regime {
                    days: 90.0,
                    slope_per_day: 0.4,
                },
                Regime {
                    days: 240.0,
                    slope_per_day: 0.0,
                },
                Regime {
                    days: 100.0,
                    slope_per_day: -0.25,
                },
            ],
        }
    }

    pub fn total_days(&self) -> f64 {
        self.regimes.iter().map(|r| r.days).sum()
    }
}

/// Generate the noisy series described by `config`.
pub fn generate_levels<R: Rng + ?Sized>(config: &SynthConfig, rng: &mut R) -> Result<Vec<Point>, AppError> {
    if config.regimes.is_empty() {
        return Err(AppError::new(2, "At least one regime is required."));
    }
    if !(config.step_hours.is_finite() && config.step_hours > 0.0) {
        return Err(AppError::new(2, "Sampling step must be > 0 hours."));
    }
    if !config.start_level.is_finite() {
        return Err(AppError::new(2, "Start level must be finite."));
    }
    if config
        .regimes
        .iter()
        .any(|r| !(r.days.is_finite() && r.days > 0.0 && r.slope_per_day.is_finite()))
    {
        return Err(AppError::new(2, "Every regime needs a positive length and a finite slope."));
    }

    let normal = Normal::new(0.0, config.noise_sigma.max(0.0))
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;

    let n = (config.total_days() * 24.0 / config.step_hours).floor() as usize + 1;
    let t0 = config.start.timestamp_millis() as f64;

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        // Whole hours keep sample times on exact millisecond boundaries.
        let hours = i as f64 * config.step_hours;
        let level = level_at(config, hours / 24.0);
        let value = level + normal.sample(rng);
        points.push(Point::new(t0 + hours * MILLIS_PER_HOUR, value));
    }

    Ok(points)
}

/// Noise-free level `day` days after the start.
fn level_at(config: &SynthConfig, day: f64) -> f64 {
    let mut level = config.start_level;
    let mut remaining = day;
    for regime in &config.regimes {
        let span = remaining.min(regime.days);
        level += span * regime.slope_per_day;
        remaining -= span;
        if remaining <= 0.0 {
            break;
        }
    }
    level
}
