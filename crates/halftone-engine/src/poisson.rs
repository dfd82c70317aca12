//! Poisson-disk sampling after Bridson, "Fast Poisson Disk Sampling in
//! Arbitrary Dimensions" (SIGGRAPH 2007).

use crate::grid::Point;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Candidates tried around an active sample before it is retired.
const ATTEMPTS: usize = 30;

/// Points at least `spacing` apart, each at least `spacing / 2` from the edge.
pub fn sample(width: f64, height: f64, spacing: f64, seed: Option<u64>) -> Vec<Point> {
    if width <= spacing || height <= spacing {
        return Vec::new();
    }

    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let margin = spacing / 2.0;
    let mut field = Field::new(width, height, spacing);
    let mut active = vec![field.insert((
        rng.gen_range(margin..width - margin),
        rng.gen_range(margin..height - margin),
    ))];

    'active: while !active.is_empty() {
        let pick = rng.gen_range(0..active.len());
        let (cx, cy) = field.points[active[pick]];
        for _ in 0..ATTEMPTS {
            let distance = rng.gen_range(spacing..2.0 * spacing);
            let angle = rng.gen_range(-PI..PI);
            let candidate = (cx + distance * angle.cos(), cy + distance * angle.sin());
            if candidate.0 < margin
                || candidate.1 < margin
                || candidate.0 > width - margin
                || candidate.1 > height - margin
            {
                continue;
            }
            if field.is_clear(candidate) {
                active.push(field.insert(candidate));
                continue 'active;
            }
        }
        active.swap_remove(pick);
    }

    field.points
}

/// Accepted points plus a background grid of cells small enough to hold at
/// most one point each.
struct Field {
    points: Vec<Point>,
    cells: Vec<Option<usize>>,
    columns: usize,
    rows: usize,
    cell: f64,
    spacing: f64,
}

impl Field {
    fn new(width: f64, height: f64, spacing: f64) -> Self {
        let cell = spacing / 2.0_f64.sqrt();
        let columns = (width / cell).ceil() as usize;
        let rows = (height / cell).ceil() as usize;
        Self {
            points: Vec::new(),
            cells: vec![None; columns.saturating_mul(rows)],
            columns,
            rows,
            cell,
            spacing,
        }
    }

    fn index(&self, value: f64, len: usize) -> usize {
        if value < 0.0 {
            0
        } else {
            ((value / self.cell) as usize).min(len - 1)
        }
    }

    fn insert(&mut self, point: Point) -> usize {
        let i = self.index(point.0, self.columns);
        let j = self.index(point.1, self.rows);
        let id = self.points.len();
        self.points.push(point);
        self.cells[i * self.rows + j] = Some(id);
        id
    }

    fn is_clear(&self, (x, y): Point) -> bool {
        let r = self.spacing;
        let (i0, i1) = (self.index(x - r, self.columns), self.index(x + r, self.columns));
        let (j0, j1) = (self.index(y - r, self.rows), self.index(y + r, self.rows));
        for i in i0..=i1 {
            for j in j0..=j1 {
                if let Some(id) = self.cells[i * self.rows + j] {
                    let (px, py) = self.points[id];
                    if (px - x).hypot(py - y) < r {
                        return false;
                    }
                }
            }
        }
        true
    }
}
