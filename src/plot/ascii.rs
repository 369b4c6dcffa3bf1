//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid, deterministic (helpful for golden tests).
//!
//! Plot elements:
//! - observed rates: `o`
//! - interpolated rates: `*`
//! - moving average: `-` line (broken across missing days)

use crate::analysis::TrendPoint;
use crate::domain::{PointSource, ReconciledSeries};

/// Render the daily rates and their moving average.
pub fn render_ascii_chart(
    series: &ReconciledSeries,
    trend: &[TrendPoint],
    window: usize,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(first), Some(last)) = (trend.first(), trend.last()) else {
        return "Plot: no days to plot.\n".to_string();
    };

    let x_max = (trend.len() as f64 - 1.0).max(1.0);
    let Some((y_min, y_max)) = y_range(trend) else {
        return format!("Plot: {} -> {} | no rates to plot.\n", first.date, last.date);
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Moving average first so rate markers overlay it.
    for segment in present_runs(trend.iter().enumerate().map(|(i, t)| (i as f64, t.moving_average))) {
        draw_curve(&mut grid, &segment, x_max, y_min, y_max);
    }

    for (i, t) in trend.iter().enumerate() {
        let Some(rate) = t.rate else { continue };
        let x = map_x(i as f64, 0.0, x_max, width);
        let y = map_y(rate, y_min, y_max, height);
        let source = series.point(t.date).map(|p| p.source);
        grid[y][x] = match source {
            Some(PointSource::Interpolated) => '*',
            _ => 'o',
        };
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} -> {} | rate=[{y_min:.4}, {y_max:.4}]\n",
        first.date, last.date
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&format!(
        "o observed  * interpolated  - {window}-day moving average\n"
    ));

    out
}

/// Split `(x, Option<y>)` into runs of consecutive present values.
pub(crate) fn present_runs(points: impl Iterator<Item = (f64, Option<f64>)>) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        match y {
            Some(y) => current.push((x, y)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn y_range(trend: &[TrendPoint]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for y in trend.iter().flat_map(|t| [t.rate, t.moving_average]).flatten() {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: open a small band around the single level.
        let pad = (min_y.abs() * 1e-3).max(1e-6);
        Some((min_y - pad, max_y + pad))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, 0.0, x_max, width);
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
