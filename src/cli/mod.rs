//! Command-line parsing for the line-voting segment fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! sampling/scoring code. Every tunable can also be set through an `LV_*`
//! environment variable (a `.env` file is loaded before parsing).

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::data::Regime;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "lv",
    version,
    about = "Find linear segments in a time series by line voting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit segments to a CSV series, print diagnostics, and optionally plot/export.
    Fit(FitArgs),
    /// Print the selected segments only (useful for scripting).
    Peaks(FitArgs),
    /// Plot a previously exported segments JSON.
    Plot(PlotArgs),
    /// Write a synthetic fill/hold/drain level series to CSV.
    Synth(SynthArgs),
}

/// Common options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input CSV. Prompts for one under the current directory when omitted.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Time column name (default: time, timestamp, datetime or date).
    #[arg(long, env = "LV_TIME_COLUMN")]
    pub time_column: Option<String>,

    /// Value column name (default: value, level or water_level_masl).
    #[arg(long, env = "LV_VALUE_COLUMN")]
    pub value_column: Option<String>,

    /// Perpendicular half-width of the voting band, in value units.
    #[arg(long, env = "LV_BUFFER_DISTANCE", default_value_t = 1.0)]
    pub buffer_distance: f64,

    /// Number of random point pairs to sample.
    #[arg(short = 'n', long, env = "LV_SAMPLES", default_value_t = 2996)]
    pub samples: usize,

    /// Divisor applied to time before fitting (default: two days in ms).
    #[arg(long, env = "LV_TIME_SCALE", default_value_t = 172_800_000.0)]
    pub time_scale: f64,

    /// Slope neighbourhood radius for peak detection.
    #[arg(long, env = "LV_LOOKAROUND", default_value_t = 0.2)]
    pub lookaround: f64,

    /// Minimum voter density (votes per scaled time unit) for a peak.
    #[arg(long, env = "LV_MIN_DENSITY", default_value_t = 30.0)]
    pub min_density: f64,

    /// Candidates at or below this power are never peaks.
    #[arg(long, env = "LV_MIN_POWER", default_value_t = 1000.0)]
    pub min_power: f64,

    /// Random seed for pair sampling (a fresh one is drawn and logged if omitted).
    #[arg(long, env = "LV_SEED")]
    pub seed: Option<u64>,

    /// Curated index pair `A:B` to always score (repeatable, or comma separated).
    #[arg(
        long = "seed-pair",
        env = "LV_SEED_PAIRS",
        value_name = "A:B",
        value_delimiter = ',',
        value_parser = parse_seed_pair
    )]
    pub seed_pairs: Vec<(usize, usize)>,

    /// Also fit one least-squares line through the daily means.
    #[arg(long)]
    pub baseline: bool,

    /// Show the top-N peaks by power.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export every scored candidate to CSV.
    #[arg(long = "export-candidates", value_name = "CSV")]
    pub export_candidates: Option<PathBuf>,

    /// Export peaks and the final selection to JSON.
    #[arg(long = "export-segments", value_name = "JSON")]
    pub export_segments: Option<PathBuf>,
}

/// Options for plotting saved segments.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Segments JSON file produced by `lv fit --export-segments`.
    #[arg(long, value_name = "JSON")]
    pub segments: PathBuf,

    /// Overlay the points of this CSV.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub csv: Option<PathBuf>,

    #[arg(long, env = "LV_TIME_COLUMN")]
    pub time_column: Option<String>,

    #[arg(long, env = "LV_VALUE_COLUMN")]
    pub value_column: Option<String>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for synthetic series generation.
#[derive(Debug, Parser)]
pub struct SynthArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,

    /// First day of the series (UTC midnight).
    #[arg(long, default_value = "2023-01-01")]
    pub start: NaiveDate,

    /// Hours between samples.
    #[arg(long, default_value_t = 1.0)]
    pub step_hours: f64,

    /// Level at the start of the first regime.
    #[arg(long, default_value_t = 2130.0)]
    pub start_level: f64,

    /// Standard deviation of the Gaussian measurement noise.
    #[arg(long, default_value_t = 0.15)]
    pub noise: f64,

    /// Regime `DAYS:SLOPE_PER_DAY` (repeatable; default fill 90:0.4, hold 240:0, drain 100:-0.25).
    #[arg(long = "regime", value_name = "DAYS:SLOPE", value_parser = parse_regime)]
    pub regimes: Vec<Regime>,

    /// Random seed for the noise.
    #[arg(long, env = "LV_SEED", default_value_t = 42)]
    pub seed: u64,
}

/// Parse `A:B` into a pair of point indices.
pub fn parse_seed_pair(s: &str) -> Result<(usize, usize), String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("expected A:B, got '{s}'"))?;
    let a = a
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid index '{a}': {e}"))?;
    let b = b
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid index '{b}': {e}"))?;
    Ok((a, b))
}

/// Parse `DAYS:SLOPE` into a regime.
pub fn parse_regime(s: &str) -> Result<Regime, String> {
    let (days, slope) = s
        .split_once(':')
        .ok_or_else(|| format!("expected DAYS:SLOPE, got '{s}'"))?;
    let days = days
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid day count '{days}': {e}"))?;
    let slope_per_day = slope
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid slope '{slope}': {e}"))?;
    Ok(Regime {
        days,
        slope_per_day,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn seed_pairs_parse() {
        assert_eq!(parse_seed_pair("1018:1020"), Ok((1018, 1020)));
        assert_eq!(parse_seed_pair(" 7 : 8 "), Ok((7, 8)));
        assert!(parse_seed_pair("7").is_err());
        assert!(parse_seed_pair("a:8").is_err());
        assert!(parse_seed_pair("-1:8").is_err());
    }

    #[test]
    fn regimes_parse() {
        assert_eq!(
            parse_regime("90:0.4"),
            Ok(Regime {
                days: 90.0,
                slope_per_day: 0.4
            })
        );
        assert!(parse_regime("90").is_err());
    }

    #[test]
    fn repeated_and_delimited_seed_pairs() {
        let cli = Cli::try_parse_from([
            "lv",
            "peaks",
            "-f",
            "levels.csv",
            "--seed-pair",
            "1:2,3:4",
            "--seed-pair",
            "5:6",
            "--seed",
            "9",
        ])
        .unwrap();
        let Command::Peaks(args) = cli.command else {
            panic!("expected peaks");
        };
        assert_eq!(args.seed_pairs, vec![(1, 2), (3, 4), (5, 6)]);
        assert_eq!(args.seed, Some(9));
    }
}
