//! Least-cost route extraction over a classified mask
//!
//! Runs Dijkstra over the 4-connected pixel grid of a green-cover mask.
//! Vegetation (black) pixels carry a high traversal cost, so the returned
//! route prefers idle land, with a distance term pulling it toward the far
//! corner of the scene.

use crate::maybe_rayon::*;
use ndarray::Array2;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use verdis_core::pixel::Rgba;
use verdis_core::raster::RgbaRaster;
use verdis_core::{Error, Result};

/// Weight of the logarithmic density term in the step cost.
///
/// Fixed tuning constant, kept for compatibility with the classifier's
/// companion routing behavior.
pub const LOG_DENSITY_WEIGHT: f64 = 50_000.0;

/// Numerator of the cover-density scale exponent: the linear density term
/// is scaled by `exp(DENSITY_SCALE_NUMERATOR / pixel_count)`. Fixed tuning
/// constant, like [`LOG_DENSITY_WEIGHT`].
pub const DENSITY_SCALE_NUMERATOR: f64 = 11_500_000.0;

/// Parameters for route extraction
#[derive(Debug, Clone)]
pub struct PathParams {
    /// Route origin as (row, col)
    pub start: (usize, usize),
    /// Route destination as (row, col)
    pub target: (usize, usize),
    /// Weight of the `ln(density + 1)` cost term
    /// (default: [`LOG_DENSITY_WEIGHT`])
    pub log_density_weight: f64,
    /// Numerator of the density scale exponent
    /// (default: [`DENSITY_SCALE_NUMERATOR`])
    pub density_scale_numerator: f64,
}

impl PathParams {
    /// Route between two cells with the default cost weights
    pub fn new(start: (usize, usize), target: (usize, usize)) -> Self {
        Self {
            start,
            target,
            log_density_weight: LOG_DENSITY_WEIGHT,
            density_scale_numerator: DENSITY_SCALE_NUMERATOR,
        }
    }
}

/// 4-connected neighborhood offsets
const NEIGHBORS_4: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Extract the least-cost route from `params.start` to `params.target`.
///
/// The cost of stepping into a cell with mask green value `v` is
///
/// `scale * (255 - v) + corner_distance + w * ln((255 - v) + 1)`
///
/// where `scale = exp(numerator / pixel_count)`, `corner_distance` is the
/// Euclidean distance from the cell to the bottom-right corner of the grid
/// and `w` is the log-density weight. White (idle) cells are nearly free,
/// black (vegetation) cells are heavily penalized.
///
/// Returns the route as `(row, col)` cells from start to target inclusive.
pub fn optimal_path(mask: &RgbaRaster, params: PathParams) -> Result<Vec<(usize, usize)>> {
    let (rows, cols) = mask.shape();
    if mask.is_empty() {
        return Err(Error::InvalidImage {
            rows,
            cols,
            pixels: 0,
        });
    }
    check_endpoint("start", params.start, rows, cols)?;
    check_endpoint("target", params.target, rows, cols)?;

    // exp() overflows f64 above ~709; clamp so tiny rasters stay finite
    let cells = (rows * cols) as f64;
    let density_scale = (params.density_scale_numerator / cells).min(700.0).exp();
    let corner_dist = corner_distances(rows, cols)?;

    let mut dist = Array2::from_elem((rows, cols), f64::INFINITY);
    let mut parent: Array2<Option<(usize, usize)>> = Array2::from_elem((rows, cols), None);
    let mut heap = BinaryHeap::new();

    dist[params.start] = 0.0;
    heap.push(QueueEntry {
        cost: 0.0,
        cell: params.start,
    });

    while let Some(QueueEntry { cost, cell }) = heap.pop() {
        if cell == params.target {
            break;
        }
        // Stale entry: a cheaper route to this cell was already settled
        if cost > dist[cell] {
            continue;
        }

        let (row, col) = cell;
        for (dr, dc) in NEIGHBORS_4 {
            let nr = row as isize + dr;
            let nc = col as isize + dc;
            if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                continue;
            }
            let next = (nr as usize, nc as usize);

            let density = 255.0 - f64::from(unsafe { mask.get_unchecked(next.0, next.1) }.g);
            let step = density_scale * density
                + corner_dist[next]
                + params.log_density_weight * (density + 1.0).ln();

            let candidate = cost + step;
            if candidate < dist[next] {
                dist[next] = candidate;
                parent[next] = Some(cell);
                heap.push(QueueEntry {
                    cost: candidate,
                    cell: next,
                });
            }
        }
    }

    if dist[params.target].is_infinite() {
        return Err(Error::Algorithm(format!(
            "no route from {:?} to {:?}",
            params.start, params.target
        )));
    }

    Ok(trace_route(&parent, params.start, params.target))
}

/// Render a route onto a copy of a base image.
///
/// Each route cell is painted with `color`; everything else is untouched.
pub fn overlay_path(
    base: &RgbaRaster,
    path: &[(usize, usize)],
    color: Rgba,
) -> Result<RgbaRaster> {
    let mut out = base.clone();
    for &(row, col) in path {
        out.set(row, col, color)?;
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Min-heap entry; `Ord` is reversed on cost since `BinaryHeap` is a max-heap
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f64,
    cell: (usize, usize),
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

fn check_endpoint(
    name: &'static str,
    cell: (usize, usize),
    rows: usize,
    cols: usize,
) -> Result<()> {
    if cell.0 >= rows || cell.1 >= cols {
        return Err(Error::InvalidParameter {
            name,
            value: format!("{:?}", cell),
            reason: format!("outside raster of size ({}, {})", rows, cols),
        });
    }
    Ok(())
}

/// Euclidean distance from every cell to the bottom-right corner
fn corner_distances(rows: usize, cols: usize) -> Result<Array2<f64>> {
    let corner = ((rows - 1) as f64, (cols - 1) as f64);

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = Vec::with_capacity(cols);
            for col in 0..cols {
                row_data.push((row as f64 - corner.0).hypot(col as f64 - corner.1));
            }
            row_data
        })
        .collect();

    Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))
}

/// Walk parent pointers back from the target
fn trace_route(
    parent: &Array2<Option<(usize, usize)>>,
    start: (usize, usize),
    target: (usize, usize),
) -> Vec<(usize, usize)> {
    let mut route = vec![target];
    let mut current = target;
    while current != start {
        match parent[current] {
            Some(prev) => {
                route.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    route.reverse();
    route
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
