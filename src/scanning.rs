// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::time::{Duration, Instant};

use crate::core::{GeodesicGrid, GridData};
use crate::cost::{edge_cost, DEFAULT_LAMBDA};
use crate::error::{GeodistError, Result};

/// Pass count used by the operations that do not expose it as a parameter.
pub const DEFAULT_ITERATIONS: usize = 4;

/// Progress information passed to the optional per-pass callback.
pub struct ProgressInfo {
    /// The pass that just completed (1-based).
    pub pass: usize,
    /// Total number of passes requested.
    pub iterations: usize,
    /// Largest per-cell distance decrease seen during the pass.
    /// Infinite while the wavefront is still reaching untouched cells.
    pub max_change: f32,
    /// Elapsed time since the solve started.
    pub elapsed: Duration,
}

/// Approximate geodesic distance transform by multi-directional sweep
/// relaxation.
///
/// Each pass runs a fixed sequence of directional sweeps covering every
/// axis-sign combination: 2 in 2D (forward and backward raster order), 8 in
/// 3D. Within a sweep each cell is relaxed against the neighbors that precede
/// it in that sweep's visiting order, so distance information travels the
/// length of the grid in a single sweep along the sweep direction. The field
/// is non-increasing pass over pass and converges to the fast marching
/// result as the pass count grows.
pub struct RasterScan<const N: usize> {
    grid: GeodesicGrid<N>,
    lambda: f32,
    iterations: usize,
    tolerance: f32,
    progress_callback: Option<Box<dyn Fn(ProgressInfo)>>,
}

impl<const N: usize> RasterScan<N> {
    /// Create a solver over the given grid with the default lambda and pass
    /// count.
    pub fn new(grid: GeodesicGrid<N>) -> Self {
        RasterScan {
            grid,
            lambda: DEFAULT_LAMBDA,
            iterations: DEFAULT_ITERATIONS,
            tolerance: 0.0,
            progress_callback: None,
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

    /// Set the number of full passes (builder method). Default is 4.
    ///
    /// # Errors
    /// Returns an error if `iterations` is zero.
    pub fn with_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations == 0 {
            return Err(GeodistError::InvalidIterations(iterations));
        }
        self.iterations = iterations;
        Ok(self)
    }

    /// Set the convergence tolerance (builder method). When a full pass
    /// changes no cell by more than this amount, remaining passes are
    /// skipped. Default is 0.0, which only stops once the field is exactly
    /// stationary.
    ///
    /// # Errors
    /// Returns an error if `tolerance` is negative or not finite.
    pub fn with_tolerance(mut self, tolerance: f32) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(GeodistError::InvalidTolerance(tolerance));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Set a callback invoked after every completed pass (builder method).
    pub fn with_progress(mut self, callback: Box<dyn Fn(ProgressInfo)>) -> Self {
        self.progress_callback = Some(callback);
        self
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

impl RasterScan<2> {
    /// Run the configured number of passes, filling the grid's distance
    /// field. Stops early once a pass changes nothing beyond the tolerance.
    pub fn solve(&mut self) {
        let start = Instant::now();

        for pass in 0..self.iterations {
            let mut max_change = sweep_2d(&mut self.grid, self.lambda, false, false);
            let change = sweep_2d(&mut self.grid, self.lambda, true, true);
            if change > max_change {
                max_change = change;
            }

            if let Some(cb) = &self.progress_callback {
                cb(ProgressInfo {
                    pass: pass + 1,
                    iterations: self.iterations,
                    max_change,
                    elapsed: start.elapsed(),
                });
            }

            if max_change <= self.tolerance {
                break;
            }
        }
    }
}

impl RasterScan<3> {
    /// Run the configured number of passes, filling the grid's distance
    /// field. Each pass sweeps all 8 axis-sign combinations in a fixed
    /// order. Stops early once a pass changes nothing beyond the tolerance.
    pub fn solve(&mut self) {
        let start = Instant::now();

        for pass in 0..self.iterations {
            let mut max_change: f32 = 0.0;

            for dir in 0..8 {
                let rev_i = (dir & 1) != 0;
                let rev_j = (dir & 2) != 0;
                let rev_k = (dir & 4) != 0;
                let change = sweep_3d(&mut self.grid, self.lambda, rev_i, rev_j, rev_k);
                if change > max_change {
                    max_change = change;
                }
            }

            if let Some(cb) = &self.progress_callback {
                cb(ProgressInfo {
                    pass: pass + 1,
                    iterations: self.iterations,
                    max_change,
                    elapsed: start.elapsed(),
                });
            }

            if max_change <= self.tolerance {
                break;
            }
        }
    }
}

/// One directional sweep over a 2D grid. Visits cells in raster order
/// (reversed per axis according to `rev_i`/`rev_j`) and relaxes each against
/// the neighbor already visited on each axis. Returns the largest distance
/// decrease applied.
fn sweep_2d<G: GridData<2>>(grid: &mut G, lambda: f32, rev_i: bool, rev_j: bool) -> f32 {
    let shape = grid.shape();
    let mut max_change: f32 = 0.0;

    let (i_start, i_end, i_step): (usize, usize, isize) = if rev_i {
        (shape[0] - 1, 0usize.wrapping_sub(1), -1)
    } else {
        (0, shape[0], 1)
    };
    let (j_start, j_end, j_step): (usize, usize, isize) = if rev_j {
        (shape[1] - 1, 0usize.wrapping_sub(1), -1)
    } else {
        (0, shape[1], 1)
    };

    let mut i = i_start;
    while i != i_end {
        let mut j = j_start;
        while j != j_end {
            let idx = [i, j];
            let here = grid.intensity(idx);
            let old = grid.distance(idx);
            let mut best = old;

            let prev_i = if rev_i {
                if i + 1 < shape[0] {
                    Some(i + 1)
                } else {
                    None
                }
            } else {
                i.checked_sub(1)
            };
            if let Some(pi) = prev_i {
                let nb = [pi, j];
                let cand = grid.distance(nb) + edge_cost(1.0, here, grid.intensity(nb), lambda);
                if cand < best {
                    best = cand;
                }
            }

            let prev_j = if rev_j {
                if j + 1 < shape[1] {
                    Some(j + 1)
                } else {
                    None
                }
            } else {
                j.checked_sub(1)
            };
            if let Some(pj) = prev_j {
                let nb = [i, pj];
                let cand = grid.distance(nb) + edge_cost(1.0, here, grid.intensity(nb), lambda);
                if cand < best {
                    best = cand;
                }
            }

            if best < old {
                grid.relax(idx, best);
                let change = old - best;
                if change > max_change {
                    max_change = change;
                }
            }
            j = (j as isize + j_step) as usize;
        }
        i = (i as isize + i_step) as usize;
    }

    max_change
}

/// One directional sweep over a 3D grid; the 3D counterpart of `sweep_2d`
/// with one already-visited neighbor per axis.
fn sweep_3d<G: GridData<3>>(
    grid: &mut G,
    lambda: f32,
    rev_i: bool,
    rev_j: bool,
    rev_k: bool,
) -> f32 {
    let shape = grid.shape();
    let mut max_change: f32 = 0.0;

    let (i_start, i_end, i_step): (usize, usize, isize) = if rev_i {
        (shape[0] - 1, 0usize.wrapping_sub(1), -1)
    } else {
        (0, shape[0], 1)
    };
    let (j_start, j_end, j_step): (usize, usize, isize) = if rev_j {
        (shape[1] - 1, 0usize.wrapping_sub(1), -1)
    } else {
        (0, shape[1], 1)
    };
    let (k_start, k_end, k_step): (usize, usize, isize) = if rev_k {
        (shape[2] - 1, 0usize.wrapping_sub(1), -1)
    } else {
        (0, shape[2], 1)
    };

    let mut i = i_start;
    while i != i_end {
        let mut j = j_start;
        while j != j_end {
            let mut k = k_start;
            while k != k_end {
                let idx = [i, j, k];
                let here = grid.intensity(idx);
                let old = grid.distance(idx);
                let mut best = old;

                let prev_i = if rev_i {
                    if i + 1 < shape[0] {
                        Some(i + 1)
                    } else {
                        None
                    }
                } else {
                    i.checked_sub(1)
                };
                if let Some(pi) = prev_i {
                    let nb = [pi, j, k];
                    let cand =
                        grid.distance(nb) + edge_cost(1.0, here, grid.intensity(nb), lambda);
                    if cand < best {
                        best = cand;
                    }
                }

                let prev_j = if rev_j {
                    if j + 1 < shape[1] {
                        Some(j + 1)
                    } else {
                        None
                    }
                } else {
                    j.checked_sub(1)
                };
                if let Some(pj) = prev_j {
                    let nb = [i, pj, k];
                    let cand =
                        grid.distance(nb) + edge_cost(1.0, here, grid.intensity(nb), lambda);
                    if cand < best {
                        best = cand;
                    }
                }

                let prev_k = if rev_k {
                    if k + 1 < shape[2] {
                        Some(k + 1)
                    } else {
                        None
                    }
                } else {
                    k.checked_sub(1)
                };
                if let Some(pk) = prev_k {
                    let nb = [i, j, pk];
                    let cand =
                        grid.distance(nb) + edge_cost(1.0, here, grid.intensity(nb), lambda);
                    if cand < best {
                        best = cand;
                    }
                }

                if best < old {
                    grid.relax(idx, best);
                    let change = old - best;
                    if change > max_change {
                        max_change = change;
                    }
                }
                k = (k as isize + k_step) as usize;
            }
            j = (j as isize + j_step) as usize;
        }
        i = (i as isize + i_step) as usize;
    }

    max_change
}
