//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during sampling and scoring
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A single time-series observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Ordinal time (epoch milliseconds for calendar inputs).
    pub time: f64,
    pub value: f64,
}

impl Point {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// How the `time` coordinate of a `Point` should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeKind {
    /// Milliseconds since the Unix epoch (UTC).
    EpochMillis,
    /// A plain number with no calendar meaning.
    Ordinal,
}

impl TimeKind {
    /// Length of one "day" bucket in time units.
    pub fn day_length(self) -> f64 {
        match self {
            TimeKind::EpochMillis => MILLIS_PER_DAY,
            TimeKind::Ordinal => 1.0,
        }
    }

    /// Human-readable rendering of a time value.
    pub fn format_time(self, t: f64) -> String {
        match self {
            TimeKind::EpochMillis => DateTime::<Utc>::from_timestamp_millis(t.round() as i64)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| format!("{t:.0}")),
            TimeKind::Ordinal => format!("{t}"),
        }
    }

    /// Unit label used in report headers.
    pub fn label(self) -> &'static str {
        match self {
            TimeKind::EpochMillis => "date",
            TimeKind::Ordinal => "ordinal",
        }
    }
}

/// Summary stats about the points of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub time_min: f64,
    pub time_max: f64,
    pub value_min: f64,
    pub value_max: f64,
}

/// Where a sampled index pair came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleOrigin {
    Random,
    Seeded,
}

impl SampleOrigin {
    pub fn label(self) -> &'static str {
        match self {
            SampleOrigin::Random => "random",
            SampleOrigin::Seeded => "seeded",
        }
    }
}

/// Two point indices a candidate line is drawn through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePair {
    pub first: usize,
    pub second: usize,
    pub origin: SampleOrigin,
}

/// A line through two sampled points, with its tolerance band.
///
/// The line lives in *scaled* time: `value = slope * time / time_scale + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateLine {
    pub slope: f64,
    pub intercept: f64,
    /// Vertical half-width that corresponds to a constant perpendicular distance.
    pub buffer_y: f64,
    pub time_scale: f64,
    /// Earliest time of the two sampled points.
    pub x1: f64,
    /// Latest time of the two sampled points.
    pub x2: f64,
}

/// A candidate line together with its vote statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub sample: SamplePair,
    pub line: CandidateLine,
    pub vote_count: usize,
    /// Earliest voter time (the sample's first time when nobody votes).
    pub start_time: f64,
    pub end_time: f64,
    /// `end_time - start_time` in scaled time units.
    pub time_span: f64,
    /// `vote_count / time_span`, or `0` when invalid.
    pub density: f64,
    /// `vote_count² / time_span`, or `0` when invalid.
    pub power: f64,
    /// `false` when fewer than two voters or a zero span make density undefined.
    pub valid: bool,
    /// Line value at the dataset's first timestamp.
    pub y_start: f64,
    /// Line value at the dataset's last timestamp.
    pub y_end: f64,
}

/// A scored candidate that is a local power maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Position of the candidate in the scored candidate list.
    pub index: usize,
    #[serde(flatten)]
    pub candidate: ScoredCandidate,
}

/// `big` covers the time span of `small` with at least the same power.
///
/// Both fields are candidate indices (`Peak::index`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap {
    pub big: usize,
    pub small: usize,
}

/// Tunable parameters of the sampling/scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFitParams {
    /// Perpendicular half-width of the voting band (value units).
    pub buffer_distance: f64,
    /// Number of random pairs to draw.
    pub random_samples: usize,
    /// Divisor applied to time before fitting, so slopes are comparable to values.
    pub time_scale: f64,
    /// Slope neighbourhood radius for peak detection.
    pub peak_lookaround: f64,
    /// Minimum voter density for a peak.
    pub min_density: f64,
    /// Candidates at or below this power never become peaks.
    pub min_power: f64,
    /// RNG seed for random sampling (`None` draws a fresh one).
    pub sample_seed: Option<u64>,
    /// Curated index pairs appended after the random ones.
    pub seed_pairs: Vec<(usize, usize)>,
}

impl Default for LineFitParams {
    fn default() -> Self {
        Self {
            buffer_distance: 1.0,
            random_samples: 2996,
            // two days in milliseconds
            time_scale: 2.0 * MILLIS_PER_DAY,
            peak_lookaround: 0.2,
            min_density: 30.0,
            min_power: 1000.0,
            sample_seed: None,
            seed_pairs: Vec::new(),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub csv_path: PathBuf,
    pub time_column: Option<String>,
    pub value_column: Option<String>,

    pub params: LineFitParams,

    /// Also fit one regression line through the daily means.
    pub baseline: bool,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_candidates: Option<PathBuf>,
    pub export_segments: Option<PathBuf>,
}

/// A saved segments file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentsFile {
    pub tool: String,
    pub time_kind: TimeKind,
    pub params: LineFitParams,
    pub stats: DatasetStats,
    pub peaks: Vec<Peak>,
    pub selection: Vec<Peak>,
}
