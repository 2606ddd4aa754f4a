// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! The local edge cost shared by every solver.
//!
//! Both solver families must price a step between adjacent cells through this
//! one function so that their outputs are comparable: the fast marching
//! result is the exact minimum over paths of summed edge costs, and the
//! raster scan result converges to it.

/// Lambda used by the operations that do not expose it as a parameter.
pub const DEFAULT_LAMBDA: f32 = 1.0;

/// Cost of stepping between two adjacent cells.
///
/// `spatial` is the physical distance between the cell centers (1 for
/// axis-aligned neighbors on a unit-spaced grid) and `lambda` weights the
/// intensity dissimilarity term:
///
/// `cost = sqrt(spatial^2 + lambda^2 * (ip - iq)^2)`
///
/// The cost is symmetric in `ip`/`iq` and non-negative; with `lambda = 0` it
/// reduces to the plain spatial distance, turning the transform into a pure
/// geometric distance transform.
#[inline]
pub fn edge_cost(spatial: f32, ip: f32, iq: f32, lambda: f32) -> f32 {
    let di = ip - iq;
    (spatial * spatial + lambda * lambda * di * di).sqrt()
}
