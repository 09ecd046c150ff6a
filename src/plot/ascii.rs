//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - raw MI points: `o`
//! - surrogate MI points: `.`
//! - quadratic fit: `-` line
//! - piecewise-linear fit: `=` line
//! - peak of the better fit: `P`

use crate::domain::ProfileOutput;

/// Render the lag profile with both fitted curves overlaid.
pub fn render_profile_plot(output: &ProfileOutput, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(&lag_min), Some(&lag_max)) = (output.lags.first(), output.lags.last()) else {
        return "Plot: (empty profile)\n".to_string();
    };
    let (x_min, x_max) = if lag_min == lag_max {
        (lag_min as f64 - 0.5, lag_max as f64 + 0.5)
    } else {
        (lag_min as f64, lag_max as f64)
    };

    let (y_min, y_max) = value_range(output).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curves first so the observed points can overlay them.
    let quad = curve_points(&output.lags, &output.quadratic.band.fitted);
    draw_curve(&mut grid, &quad, x_min, x_max, y_min, y_max, '-');
    let piece = curve_points(&output.lags, &output.piecewise.band.fitted);
    draw_curve(&mut grid, &piece, x_min, x_max, y_min, y_max, '=');

    for (&lag, &value) in output.lags.iter().zip(&output.surrogate_mi) {
        let x = map_x(lag as f64, x_min, x_max, width);
        let y = map_y(value, y_min, y_max, height);
        if grid[y][x] == ' ' {
            grid[y][x] = '.';
        }
    }

    for (&lag, &value) in output.lags.iter().zip(&output.mi) {
        let x = map_x(lag as f64, x_min, x_max, width);
        let y = map_y(value, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    // Peak marker of the lower-rms model goes on top of everything.
    let best = if output.piecewise.summary.rms <= output.quadratic.summary.rms {
        &output.piecewise.summary
    } else {
        &output.quadratic.summary
    };
    let px = map_x(best.peak_lag as f64, x_min, x_max, width);
    let py = map_y(best.peak_value, y_min, y_max, height);
    grid[py][px] = 'P';

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: lag=[{lag_min}, {lag_max}] | MI=[{y_min:.2}, {y_max:.2}] bits \
         (o raw, . surrogate, - quad, = piecewise, P peak)\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn value_range(output: &ProfileOutput) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;

    let series = [
        output.mi.as_slice(),
        output.surrogate_mi.as_slice(),
        output.quadratic.band.fitted.as_slice(),
        output.piecewise.band.fitted.as_slice(),
    ];
    for values in series {
        for &v in values {
            if v.is_finite() {
                min_v = min_v.min(v);
                max_v = max_v.max(v);
            }
        }
    }

    if min_v.is_finite() && max_v.is_finite() && max_v > min_v {
        Some((min_v, max_v))
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

fn curve_points(lags: &[i64], values: &[f64]) -> Vec<(f64, f64)> {
    lags.iter()
        .zip(values)
        .filter(|(_, v)| v.is_finite())
        .map(|(&lag, &v)| (lag as f64, v))
        .collect()
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, cx, cy, ch);
        } else if grid[cy][cx] == ' ' {
            grid[cy][cx] = ch;
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written, so
/// earlier layers keep their marks.
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
