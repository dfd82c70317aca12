//! Regular sample grids.
//!
//! Points are centred in their cells and the whole grid is centred on the
//! output, so the leftover margin is split evenly on both sides.

use crate::options::Grid;
use std::f64::consts::SQRT_2;

pub type Point = (f64, f64);

/// Row spacing of a hex grid relative to its column spacing (√3 / 2).
const HEX_ROW_RATIO: f64 = 0.866;

/// Row spacing of a diamond grid relative to its column spacing.
const DIAMOND_ROW_RATIO: f64 = 0.5;

pub fn rect(width: f64, height: f64, spacing: f64) -> Vec<Point> {
    lattice(width, height, spacing, 1.0, false)
}

pub fn hex(width: f64, height: f64, spacing: f64) -> Vec<Point> {
    lattice(width, height, spacing, HEX_ROW_RATIO, true)
}

pub fn diamond(width: f64, height: f64, spacing: f64) -> Vec<Point> {
    lattice(width, height, spacing, DIAMOND_ROW_RATIO, true)
}

/// Upper bound on the cells `grid` lays over a `width × height` output.
///
/// For Poisson grids this counts the background cells of the sampler, which
/// also bounds the number of points. `None` when the count overflows `usize`.
pub fn cell_count(grid: Grid, width: f64, height: f64, spacing: f64) -> Option<usize> {
    let (cell_width, cell_height) = match grid {
        Grid::Rect => (spacing, spacing),
        Grid::Hex => (spacing, spacing * HEX_ROW_RATIO),
        Grid::Diamond => (spacing, spacing * DIAMOND_ROW_RATIO),
        Grid::Poisson => (spacing / SQRT_2, spacing / SQRT_2),
    };
    // float → int casts saturate
    let columns = (width / cell_width).ceil() as usize;
    let rows = (height / cell_height).ceil() as usize;
    columns.checked_mul(rows)
}

/// Odd rows of an `offset` lattice are shifted right by half a column and
/// lose their last column so they stay inside the output.
fn lattice(width: f64, height: f64, spacing: f64, row_ratio: f64, offset: bool) -> Vec<Point> {
    let col = spacing;
    let row = col * row_ratio;

    let cols = (width / col) as usize;
    let x_margin = width - cols as f64 * col;
    let mut rows = (height / row) as usize;
    let mut y_margin = height - rows as f64 * row;

    // Tightly packed rows would leave the outermost dots hanging over the edge.
    if row / 2.0 + y_margin / 2.0 < spacing / 2.0 && rows > 0 {
        rows -= 1;
        y_margin += row;
    }

    let mut points = Vec::with_capacity(cols.saturating_mul(rows).min(crate::MAX_DOTS));
    for x in 1..=cols {
        for y in 1..=rows {
            let shifted = offset && y % 2 != 0;
            if shifted && x == cols {
                continue;
            }
            let px = x as f64 * col - col / 2.0 + x_margin / 2.0 + if shifted { col / 2.0 } else { 0.0 };
            let py = y as f64 * row - row / 2.0 + y_margin / 2.0;
            points.push((px, py));
        }
    }
    points
}
