//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the segment pipeline
//! - prints reports/plots
//! - writes optional exports

use chrono::{NaiveTime, TimeZone, Utc};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cli::{Cli, Command, FitArgs, PlotArgs, SynthArgs};
use crate::data::{SynthConfig, generate_levels};
use crate::domain::{FitConfig, LineFitParams, TimeKind};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `lv` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; the environment may already be configured.
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Command::Fit(args) => handle_fit(args, OutputMode::Full),
        Command::Peaks(args) => handle_fit(args, OutputMode::PeaksOnly),
        Command::Plot(args) => handle_plot(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    // Ignore a second init (the library can be driven more than once in-process).
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    PeaksOnly,
}

fn handle_fit(args: FitArgs, mode: OutputMode) -> Result<(), AppError> {
    let csv_path = crate::cli::picker::resolve_csv_path(args.csv.as_deref())?;
    let config = fit_config_from_args(&args, csv_path);
    let run = pipeline::run_fit(&config)?;
    let time_kind = run.ingest.context.time_kind();

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format_run_summary(
                &run.ingest,
                run.seed,
                &run.fit,
                run.baseline.as_ref(),
                &config.params
            )
        );

        let top = crate::report::rank_by_power(&run.fit.peaks, config.top_n);
        println!(
            "{}",
            crate::report::format_peaks_table(
                &format!("Top {} peaks by power", top.len()),
                &top,
                time_kind
            )
        );
        println!("{}", crate::report::format_overlaps(&run.fit.overlaps));
    }

    println!("{}", crate::report::format_selection(&run.fit.selection, time_kind));

    if mode == OutputMode::Full && config.plot {
        let plot = crate::plot::render_ascii_plot(
            run.ingest.context.points(),
            &run.fit.selection,
            run.baseline.as_ref(),
            time_kind,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_candidates {
        crate::io::export::write_candidates_csv(
            path,
            &run.fit.scoring.candidates,
            &run.fit.peaks,
            &run.fit.selection,
            time_kind,
        )?;
        info!("wrote candidates CSV to '{}'", path.display());
    }
    if let Some(path) = &config.export_segments {
        let segments = crate::io::segments::build_segments_file(
            &run.ingest.context,
            &config.params,
            &run.fit.peaks,
            &run.fit.selection,
        );
        crate::io::segments::write_segments_json(path, &segments)?;
        info!("wrote segments JSON to '{}'", path.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let segments = crate::io::segments::read_segments_json(&args.segments)?;

    let points = match &args.csv {
        Some(path) => {
            let data = crate::io::ingest::load_points(
                path,
                args.time_column.as_deref(),
                args.value_column.as_deref(),
            )?;
            if data.context.time_kind() != segments.time_kind {
                return Err(AppError::new(
                    2,
                    format!(
                        "CSV times are {} but the segments were fitted on {} times.",
                        data.context.time_kind().label(),
                        segments.time_kind.label()
                    ),
                ));
            }
            data.context.points().to_vec()
        }
        None => Vec::new(),
    };

    let plot = crate::plot::render_segments_file(&segments, &points, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let start = Utc.from_utc_datetime(&args.start.and_time(NaiveTime::MIN));
    let mut config = SynthConfig::reservoir(start);
    config.step_hours = args.step_hours;
    config.start_level = args.start_level;
    config.noise_sigma = args.noise;
    if !args.regimes.is_empty() {
        config.regimes = args.regimes.clone();
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let points = generate_levels(&config, &mut rng)?;
    crate::io::export::write_levels_csv(&args.output, &points, TimeKind::EpochMillis)?;

    println!(
        "Wrote {} points over {} days to {}",
        points.len(),
        config.total_days(),
        args.output.display()
    );
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs, csv_path: std::path::PathBuf) -> FitConfig {
    FitConfig {
        csv_path,
        time_column: args.time_column.clone(),
        value_column: args.value_column.clone(),
        params: LineFitParams {
            buffer_distance: args.buffer_distance,
            random_samples: args.samples,
            time_scale: args.time_scale,
            peak_lookaround: args.lookaround,
            min_density: args.min_density,
            min_power: args.min_power,
            sample_seed: args.seed,
            seed_pairs: args.seed_pairs.clone(),
        },
        baseline: args.baseline,
        top_n: args.top,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_candidates: args.export_candidates.clone(),
        export_segments: args.export_segments.clone(),
    }
}
