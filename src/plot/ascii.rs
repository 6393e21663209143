//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed retention points: `o`
//! - fitted curve: `-` line

use crate::domain::{CurvePoint, RetentionObservation};
use crate::report::LtvReport;

/// Render the fitted curve of a report with its observations overlaid.
pub fn render_report_plot(report: &LtvReport, width: usize, height: usize) -> String {
    render_retention_plot(&report.observations, &report.curve, width, height)
}

/// Render observed points over a fitted retention curve.
pub fn render_retention_plot(
    observations: &[RetentionObservation],
    curve: &[CurvePoint],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points: Vec<(f64, f64)> = observations
        .iter()
        .map(|o| (o.day as f64, o.retention))
        .collect();
    let curve: Vec<(f64, f64)> = curve.iter().map(|c| (c.day as f64, c.retention)).collect();

    let (d_min, d_max) = x_range(&points, &curve).unwrap_or((1.0, 30.0));
    let (y_min, y_max) = y_range(&points, &curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    draw_curve(&mut grid, &curve, d_min, d_max, y_min, y_max);

    for &(d, y) in &points {
        let x = map_x(d, d_min, d_max, width);
        let yy = map_y(y, y_min, y_max, height);
        grid[yy][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: day=[{d_min:.0}, {d_max:.0}] | retention=[{:.2}%, {:.2}%]\n",
        y_min * 100.0,
        y_max * 100.0
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out
}

fn x_range(points: &[(f64, f64)], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in points.iter().chain(curve.iter()) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(points: &[(f64, f64)], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points.iter().chain(curve.iter()) {
        if !y.is_finite() {
            continue;
        }
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(d, y) in curve {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let x = map_x(d, x_min, x_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        // Flat curve at 10% with one observation above it.
        let observations = [
            RetentionObservation::new(1, 0.2),
            RetentionObservation::new(10, 0.1),
        ];
        let curve: Vec<CurvePoint> = (1..=10)
            .map(|day| CurvePoint { day, retention: 0.1 })
            .collect();

        let txt = render_retention_plot(&observations, &curve, 10, 5);
        let expected = concat!(
            "Plot: day=[1, 10] | retention=[9.50%, 20.50%]\n",
            "o\n",
            "\n",
            "\n",
            "\n",
            "---------o\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_handles_empty_curve() {
        let observations = [
            RetentionObservation::new(1, 0.3),
            RetentionObservation::new(7, 0.1),
        ];
        let txt = render_retention_plot(&observations, &[], 20, 6);
        assert_eq!(txt.lines().count(), 7);
        let marks: usize = txt.lines().skip(1).map(|l| l.matches('o').count()).sum();
        assert_eq!(marks, 2);
    }
}
