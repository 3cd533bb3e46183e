//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - selected segments: `-` lines over each segment's voter span
//! - optional baseline regression: `.` across the whole range

use crate::domain::{Peak, Point, SegmentsFile, TimeKind};
use crate::fit::BaselineFit;

/// Render points, selected segments and an optional baseline.
pub fn render_ascii_plot(
    points: &[Point],
    segments: &[Peak],
    baseline: Option<&BaselineFit>,
    time_kind: TimeKind,
    width: usize,
    height: usize,
) -> String {
    let (t_min, t_max) = time_range(points).unwrap_or((0.0, 1.0));
    render_plot(points, segments, baseline, time_kind, t_min, t_max, width, height)
}

/// Render a saved segments file, optionally over the CSV points it was fitted on.
pub fn render_segments_file(
    segments: &SegmentsFile,
    points: &[Point],
    width: usize,
    height: usize,
) -> String {
    let (t_min, t_max) = time_range(points)
        .or_else(|| {
            let (a, b) = (segments.stats.time_min, segments.stats.time_max);
            (a.is_finite() && b.is_finite() && b > a).then_some((a, b))
        })
        .unwrap_or((0.0, 1.0));
    render_plot(
        points,
        &segments.selection,
        None,
        segments.time_kind,
        t_min,
        t_max,
        width,
        height,
    )
}

#[allow(clippy::too_many_arguments)]
fn render_plot(
    points: &[Point],
    segments: &[Peak],
    baseline: Option<&BaselineFit>,
    time_kind: TimeKind,
    t_min: f64,
    t_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let segment_ends: Vec<((f64, f64), (f64, f64))> = segments
        .iter()
        .map(|p| {
            let c = &p.candidate;
            (
                (c.start_time, c.line.value_at(c.start_time)),
                (c.end_time, c.line.value_at(c.end_time)),
            )
        })
        .collect();
    let baseline_ends = baseline.map(|b| ((t_min, b.value_at(t_min)), (t_max, b.value_at(t_max))));

    let mut values: Vec<f64> = points.iter().map(|p| p.value).collect();
    for &((_, y0), (_, y1)) in segment_ends.iter().chain(baseline_ends.iter()) {
        values.push(y0);
        values.push(y1);
    }
    let (y_min, y_max) = value_range(&values).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let view = Viewport {
        t_min,
        t_max,
        y_min,
        y_max,
        width,
        height,
    };
    let mut grid = vec![vec![' '; width]; height];

    // Segments first, then the baseline, so segments win shared cells.
    for &(a, b) in &segment_ends {
        draw_line(&mut grid, view.cell(a), view.cell(b), '-');
    }
    if let Some((a, b)) = baseline_ends {
        draw_line(&mut grid, view.cell(a), view.cell(b), '.');
    }

    for p in points {
        let (col, row) = view.cell((p.time, p.value));
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: time=[{}, {}] | value=[{y_min:.2}, {y_max:.2}]\n",
        time_kind.format_time(t_min),
        time_kind.format_time(t_max)
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn time_range(points: &[Point]) -> Option<(f64, f64)> {
    let min_t = points.iter().map(|p| p.time).fold(f64::INFINITY, f64::min);
    let max_t = points.iter().map(|p| p.time).fold(f64::NEG_INFINITY, f64::max);
    (min_t.is_finite() && max_t.is_finite() && max_t > min_t).then_some((min_t, max_t))
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let min_y = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_y = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min_y.is_finite() && max_y.is_finite() && max_y > min_y).then_some((min_y, max_y))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-12);
    (min - pad, max + pad)
}

/// Maps data coordinates onto grid cells; row 0 is the top (largest value).
struct Viewport {
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
}

impl Viewport {
    fn cell(&self, (t, y): (f64, f64)) -> (usize, usize) {
        let u = ((t - self.t_min) / (self.t_max - self.t_min)).clamp(0.0, 1.0);
        let v = ((y - self.y_min) / (self.y_max - self.y_min)).clamp(0.0, 1.0);
        let col = (u * (self.width - 1) as f64).round() as usize;
        let row = ((1.0 - v) * (self.height - 1) as f64).round() as usize;
        (col, row)
    }
}

/// Step along the longer axis and round the other. Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (c0, r0) = (from.0 as f64, from.1 as f64);
    let (dc, dr) = (to.0 as f64 - c0, to.1 as f64 - r0);
    let steps = dc.abs().max(dr.abs()).max(1.0) as usize;

    for i in 0..=steps {
        let f = i as f64 / steps as f64;
        let col = (c0 + f * dc).round() as usize;
        let row = (r0 + f * dr).round() as usize;
        if let Some(cell) = grid.get_mut(row).and_then(|line| line.get_mut(col)) {
            if *cell == ' ' {
                *cell = ch;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandidateLine, DatasetStats, LineFitParams, SampleOrigin, SamplePair, ScoredCandidate};

    fn flat_segment(value: f64, start: f64, end: f64) -> Peak {
        Peak {
            index: 0,
            candidate: ScoredCandidate {
                sample: SamplePair { first: 0, second: 1, origin: SampleOrigin::Random },
                line: CandidateLine {
                    slope: 0.0,
                    intercept: value,
                    buffer_y: 1.0,
                    time_scale: 1.0,
                    x1: start,
                    x2: end,
                },
                vote_count: 2,
                start_time: start,
                end_time: end,
                time_span: end - start,
                density: 2.0 / (end - start),
                power: 4.0 / (end - start),
                valid: true,
                y_start: value,
                y_end: value,
            },
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let segments = vec![flat_segment(0.0, 0.0, 10.0)];

        let txt = render_ascii_plot(&points, &segments, None, TimeKind::Ordinal, 10, 5);
        let expected = concat!(
            "Plot: time=[0, 10] | value=[-0.50, 10.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn baseline_fills_only_blank_cells() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let segments = vec![flat_segment(0.0, 0.0, 10.0)];
        let baseline = BaselineFit {
            slope: 0.0,
            intercept: 0.0,
            time_scale: 1.0,
            rmse: 0.0,
            n_bins: 2,
        };

        let txt = render_ascii_plot(&points, &segments, Some(&baseline), TimeKind::Ordinal, 10, 5);
        assert!(txt.ends_with("o---------\n"));
        // Same row as the segment, so nothing is left for the baseline to draw.
        assert!(txt.lines().skip(1).all(|l| !l.contains('.')));
    }

    #[test]
    fn segments_file_without_points_uses_saved_range() {
        let file = SegmentsFile {
            tool: "lv".to_string(),
            time_kind: TimeKind::Ordinal,
            params: LineFitParams::default(),
            stats: DatasetStats {
                n_points: 2,
                time_min: 0.0,
                time_max: 10.0,
                value_min: 0.0,
                value_max: 10.0,
            },
            peaks: Vec::new(),
            selection: vec![flat_segment(0.0, 0.0, 10.0), flat_segment(10.0, 5.0, 10.0)],
        };

        let txt = render_segments_file(&file, &[], 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Plot: time=[0, 10] | value=[-0.50, 10.50]");
        assert_eq!(lines[1], "     -----");
        assert_eq!(lines[5], "----------");
    }
}
