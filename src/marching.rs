// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use float_ord::FloatOrd;

use crate::core::{GeodesicGrid, GridData};
use crate::cost::{edge_cost, DEFAULT_LAMBDA};
use crate::error::{GeodistError, Result};

/// Propagation state of a cell during fast marching.
///
/// Cells move `Far -> Trial -> Known` and never back: a `Known` cell has its
/// final distance and is skipped by all later updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    Far,
    Trial,
    Known,
}

/// Exact geodesic distance transform by priority-ordered wavefront
/// propagation.
///
/// Cells are finalized in non-decreasing order of distance, so a single pass
/// over the grid produces the exact minimum-cost distance field for
/// axis-aligned connectivity (4 neighbors in 2D, 6 in 3D). Complexity is
/// O(n log n) in the cell count, dominated by the priority queue.
pub struct FastMarching<const N: usize> {
    grid: GeodesicGrid<N>,
    lambda: f32,
}

impl<const N: usize> FastMarching<N> {
    /// Create a solver over the given grid with the default lambda.
    pub fn new(grid: GeodesicGrid<N>) -> Self {
        FastMarching {
            grid,
            lambda: DEFAULT_LAMBDA,
        }
    }

    /// Set the intensity weighting factor (builder method).
    ///
    /// # Errors
    /// Returns an error if `lambda` is negative or not finite.
    pub fn with_lambda(mut self, lambda: f32) -> Result<Self> {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(GeodistError::InvalidLambda(lambda));
        }
        self.lambda = lambda;
        Ok(self)
    }

    /// Run the solver to completion, filling the grid's distance field.
    ///
    /// With an empty seed mask every cell is left at `+inf`.
    pub fn solve(&mut self) {
        march(&mut self.grid, self.lambda);
    }

    /// Get a reference to the grid.
    pub fn grid(&self) -> &GeodesicGrid<N> {
        &self.grid
    }

    /// Consume the solver and return the grid with computed distances.
    pub fn into_grid(self) -> GeodesicGrid<N> {
        self.grid
    }
}

/// Causal wavefront propagation over any [`GridData`] grid.
///
/// Maintains a min-heap of trial cells keyed by tentative distance, using
/// lazy re-insertion: an improved cell is pushed again and stale entries are
/// skipped when popped (the cell is already `Known` by then).
fn march<const N: usize, G: GridData<N>>(grid: &mut G, lambda: f32) {
    let shape = grid.shape();
    let num_cells = grid.num_cells();

    let mut state = vec![CellState::Far; num_cells];
    let mut heap: BinaryHeap<Reverse<(FloatOrd<f32>, usize)>> = BinaryHeap::new();

    for flat in 0..num_cells {
        if grid.is_seed(grid.flat_to_nd(flat)) {
            state[flat] = CellState::Trial;
            heap.push(Reverse((FloatOrd(0.0), flat)));
        }
    }

    while let Some(Reverse((FloatOrd(dist), flat))) = heap.pop() {
        if state[flat] == CellState::Known {
            continue; // stale entry superseded by a cheaper one
        }
        state[flat] = CellState::Known;

        let idx = grid.flat_to_nd(flat);
        let here = grid.intensity(idx);

        for axis in 0..N {
            for step in [-1isize, 1] {
                let coord = idx[axis];
                let nb_coord = if step < 0 {
                    match coord.checked_sub(1) {
                        Some(c) => c,
                        None => continue,
                    }
                } else {
                    if coord + 1 >= shape[axis] {
                        continue;
                    }
                    coord + 1
                };

                let mut nb = idx;
                nb[axis] = nb_coord;
                let nb_flat = grid.nd_to_flat(nb);
                if state[nb_flat] == CellState::Known {
                    continue;
                }

                let candidate = dist + edge_cost(1.0, here, grid.intensity(nb), lambda);
                if grid.relax(nb, candidate) {
                    state[nb_flat] = CellState::Trial;
                    heap.push(Reverse((FloatOrd(candidate), nb_flat)));
                }
            }
        }
    }
}
