mod common;

use common::{reservoir_context, reservoir_points};
use line_votes::app::pipeline::{run_fit, run_on_context};
use line_votes::domain::{FitConfig, LineFitParams, MILLIS_PER_DAY, Peak, TimeKind};
use line_votes::io::{read_segments_json, write_levels_csv};
use line_votes::plot::render_segments_file;

fn days_from_start(p: &Peak, t0: f64) -> (f64, f64) {
    (
        (p.candidate.start_time - t0) / MILLIS_PER_DAY,
        (p.candidate.end_time - t0) / MILLIS_PER_DAY,
    )
}

#[test]
fn selection_recovers_fill_hold_drain() {
    let _ = env_logger::builder().is_test(true).try_init();
    let ctx = reservoir_context(11);
    let t0 = ctx.stats().time_min;
    let params = LineFitParams {
        sample_seed: Some(7),
        ..LineFitParams::default()
    };

    let (fit, baseline) = run_on_context(&ctx, &params, 7, true).unwrap();
    assert!(!fit.selection.is_empty());

    // Slopes are per scaled unit (two days): fill +0.8, hold 0, drain -0.5.
    let fill = fit
        .selection
        .iter()
        .find(|p| (p.candidate.line.slope - 0.8).abs() < 0.1)
        .expect("a rising segment");
    let hold = fit
        .selection
        .iter()
        .find(|p| p.candidate.line.slope.abs() < 0.05)
        .expect("a flat segment");
    let drain = fit
        .selection
        .iter()
        .find(|p| (p.candidate.line.slope + 0.5).abs() < 0.1)
        .expect("a falling segment");

    let (fs, fe) = days_from_start(fill, t0);
    assert!(fs < 15.0 && fe > 75.0, "fill spans {fs:.1}..{fe:.1}");
    let (hs, he) = days_from_start(hold, t0);
    assert!(hs < 110.0 && he > 310.0, "hold spans {hs:.1}..{he:.1}");
    let (ds, de) = days_from_start(drain, t0);
    assert!(ds < 345.0 && de > 415.0, "drain spans {ds:.1}..{de:.1}");

    // A single line through the daily means misses all three regimes.
    let baseline = baseline.unwrap();
    assert!(baseline.rmse > 3.0);
    assert_eq!(baseline.n_bins, 431);
}

#[test]
fn fixed_seed_runs_are_identical() {
    let ctx = reservoir_context(3);
    let params = LineFitParams {
        random_samples: 300,
        ..LineFitParams::default()
    };

    let (a, _) = run_on_context(&ctx, &params, 99, false).unwrap();
    let (b, _) = run_on_context(&ctx, &params, 99, false).unwrap();
    assert_eq!(a.scoring.candidates, b.scoring.candidates);
    assert_eq!(a.peaks, b.peaks);
    assert_eq!(a.selection, b.selection);
}

#[test]
fn csv_in_exports_out() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = std::env::temp_dir().join(format!("lv-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let csv_path = dir.join("levels.csv");
    let candidates_path = dir.join("candidates.csv");
    let segments_path = dir.join("segments.json");

    write_levels_csv(&csv_path, &reservoir_points(5), TimeKind::EpochMillis).unwrap();

    let config = FitConfig {
        csv_path: csv_path.clone(),
        time_column: None,
        value_column: None,
        params: LineFitParams {
            random_samples: 400,
            sample_seed: Some(21),
            seed_pairs: vec![(24, 2000), (3000, 7000)],
            ..LineFitParams::default()
        },
        baseline: false,
        top_n: 5,
        plot: false,
        plot_width: 80,
        plot_height: 20,
        export_candidates: Some(candidates_path.clone()),
        export_segments: Some(segments_path.clone()),
    };

    let run = run_fit(&config).unwrap();
    assert_eq!(run.seed, 21);
    assert_eq!(run.ingest.rows_used, 10_321);
    assert!(run.ingest.row_errors.is_empty());
    assert_eq!(run.fit.n_random, 400);
    assert_eq!(run.fit.n_seeded, 2);
    assert!(run.baseline.is_none());

    let segments = line_votes::io::build_segments_file(
        &run.ingest.context,
        &config.params,
        &run.fit.peaks,
        &run.fit.selection,
    );
    line_votes::io::write_candidates_csv(
        &candidates_path,
        &run.fit.scoring.candidates,
        &run.fit.peaks,
        &run.fit.selection,
        TimeKind::EpochMillis,
    )
    .unwrap();
    line_votes::io::write_segments_json(&segments_path, &segments).unwrap();

    let rows = std::fs::read_to_string(&candidates_path).unwrap();
    assert_eq!(rows.lines().count(), run.fit.scoring.candidates.len() + 1);

    let back = read_segments_json(&segments_path).unwrap();
    assert_eq!(back.selection.len(), run.fit.selection.len());
    assert_eq!(back.params.seed_pairs, vec![(24, 2000), (3000, 7000)]);

    let plot = render_segments_file(&back, run.ingest.context.points(), 60, 12);
    assert!(plot.starts_with("Plot: time=[2023-03-01, 2024-05-04]"));
    assert_eq!(plot.lines().count(), 13);

    let _ = std::fs::remove_dir_all(&dir);
}
