//! Read/write segments JSON files.
//!
//! A segments file is the portable result of a run: the parameters it was
//! produced with, the dataset extents, every detected peak and the final
//! overlap-free selection. `lv plot --segments` reloads it next to the CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::data::DatasetContext;
use crate::domain::{LineFitParams, Peak, SegmentsFile};
use crate::error::AppError;

/// Assemble the serializable result of a run.
pub fn build_segments_file(
    ctx: &DatasetContext,
    params: &LineFitParams,
    peaks: &[Peak],
    selection: &[Peak],
) -> SegmentsFile {
    SegmentsFile {
        tool: "lv".to_string(),
        time_kind: ctx.time_kind(),
        params: params.clone(),
        stats: *ctx.stats(),
        peaks: peaks.to_vec(),
        selection: selection.to_vec(),
    }
}

/// Write a segments JSON file.
pub fn write_segments_json(path: &Path, segments: &SegmentsFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create segments JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(BufWriter::new(file), segments)
        .map_err(|e| AppError::new(2, format!("Failed to write segments JSON: {e}")))?;

    Ok(())
}

/// Read a segments JSON file.
pub fn read_segments_json(path: &Path) -> Result<SegmentsFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open segments JSON '{}': {e}", path.display()))
    })?;
    let segments: SegmentsFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid segments JSON: {e}")))?;
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, SampleOrigin, SamplePair, TimeKind};
    use crate::fit::score;
    use crate::models::fit_line;

    #[test]
    fn segments_survive_a_file_round_trip() {
        let points: Vec<Point> = (0..5).map(|i| Point::new(i as f64, 2.0 * i as f64)).collect();
        let ctx = DatasetContext::new(points, TimeKind::Ordinal).unwrap();
        let line = fit_line(&ctx.points()[0], &ctx.points()[4], 0.5, 1.0).unwrap();
        let sample = SamplePair { first: 0, second: 4, origin: SampleOrigin::Seeded };
        let peak = Peak { index: 0, candidate: score(sample, &line, &ctx) };

        let params = LineFitParams { sample_seed: Some(7), ..LineFitParams::default() };
        let file = build_segments_file(&ctx, &params, &[peak], &[peak]);

        let path = std::env::temp_dir().join(format!("lv-segments-{}.json", std::process::id()));
        write_segments_json(&path, &file).unwrap();
        let back = read_segments_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.tool, "lv");
        assert_eq!(back.time_kind, TimeKind::Ordinal);
        assert_eq!(back.params, params);
        assert_eq!(back.selection.len(), 1);
        assert_eq!(back.selection[0].candidate.vote_count, 5);
        assert_eq!(back.selection[0].candidate.sample.origin, SampleOrigin::Seeded);
    }

    #[test]
    fn garbage_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("lv-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_segments_json(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert_eq!(err.exit_code(), 2);
    }
}
