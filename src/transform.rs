// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! The four distance-transform operations over dense arrays.
//!
//! These are thin, stateless wrappers: they check shapes, flatten the views
//! into row-major buffers, run a solver, and wrap the distance field back up
//! with the input shape. Only the 3D raster scan exposes `lambda` and
//! `iterations`; the other three operations fix them internally
//! ([`DEFAULT_LAMBDA`], [`DEFAULT_ITERATIONS`]), matching the interface this
//! transform has historically presented. Callers needing full control over
//! any variant can drive [`FastMarching`] or [`RasterScan`] directly.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use crate::core::GeodesicGrid;
use crate::cost::DEFAULT_LAMBDA;
use crate::error::{GeodistError, Result};
use crate::marching::FastMarching;
use crate::scanning::{RasterScan, DEFAULT_ITERATIONS};

fn check_shapes(intensity: &[usize], seeds: &[usize]) -> Result<()> {
    if intensity != seeds {
        return Err(GeodistError::ShapeMismatch {
            expected: intensity.to_vec(),
            got: seeds.to_vec(),
        });
    }
    Ok(())
}

fn flatten_2d(intensity: ArrayView2<'_, f32>, seeds: ArrayView2<'_, u8>) -> (Vec<f32>, Vec<u8>) {
    let intensity = intensity.as_standard_layout().to_owned().into_raw_vec();
    let seeds = seeds.as_standard_layout().to_owned().into_raw_vec();
    (intensity, seeds)
}

fn flatten_3d(intensity: ArrayView3<'_, f32>, seeds: ArrayView3<'_, u8>) -> (Vec<f32>, Vec<u8>) {
    let intensity = intensity.as_standard_layout().to_owned().into_raw_vec();
    let seeds = seeds.as_standard_layout().to_owned().into_raw_vec();
    (intensity, seeds)
}

fn wrap_2d(shape: [usize; 2], distance: Vec<f32>) -> Result<Array2<f32>> {
    Array2::from_shape_vec((shape[0], shape[1]), distance)
        .map_err(|e| GeodistError::Other(format!("shape error: {}", e)))
}

fn wrap_3d(shape: [usize; 3], distance: Vec<f32>) -> Result<Array3<f32>> {
    Array3::from_shape_vec((shape[0], shape[1], shape[2]), distance)
        .map_err(|e| GeodistError::Other(format!("shape error: {}", e)))
}

/// Exact 2D geodesic distance transform by fast marching.
///
/// `intensity` is the image the transform respects; any nonzero byte in
/// `seeds` marks a distance source. Returns the dense distance field with
/// the input shape. An all-zero seed mask yields an all-`+inf` field.
///
/// # Errors
/// Returns an error if the two shapes differ.
pub fn fast_marching_2d(
    intensity: ArrayView2<'_, f32>,
    seeds: ArrayView2<'_, u8>,
) -> Result<Array2<f32>> {
    check_shapes(intensity.shape(), seeds.shape())?;
    let shape = [intensity.nrows(), intensity.ncols()];
    let (intensity, seeds) = flatten_2d(intensity, seeds);

    let mut solver = FastMarching::new(GeodesicGrid::<2>::new(shape, intensity, seeds)?);
    solver.solve();
    wrap_2d(shape, solver.into_grid().into_distance())
}

/// Approximate 2D geodesic distance transform by raster scanning.
///
/// Runs the fixed default pass count; see [`RasterScan`] to choose the
/// lambda/iteration trade-off explicitly.
///
/// # Errors
/// Returns an error if the two shapes differ.
pub fn raster_scan_2d(
    intensity: ArrayView2<'_, f32>,
    seeds: ArrayView2<'_, u8>,
) -> Result<Array2<f32>> {
    check_shapes(intensity.shape(), seeds.shape())?;
    let shape = [intensity.nrows(), intensity.ncols()];
    let (intensity, seeds) = flatten_2d(intensity, seeds);

    let mut solver = RasterScan::new(GeodesicGrid::<2>::new(shape, intensity, seeds)?);
    solver.solve();
    wrap_2d(shape, solver.into_grid().into_distance())
}

/// Exact 3D geodesic distance transform by fast marching.
///
/// # Errors
/// Returns an error if the two shapes differ.
pub fn fast_marching_3d(
    intensity: ArrayView3<'_, f32>,
    seeds: ArrayView3<'_, u8>,
) -> Result<Array3<f32>> {
    check_shapes(intensity.shape(), seeds.shape())?;
    let dim = intensity.dim();
    let shape = [dim.0, dim.1, dim.2];
    let (intensity, seeds) = flatten_3d(intensity, seeds);

    let mut solver = FastMarching::new(GeodesicGrid::<3>::new(shape, intensity, seeds)?);
    solver.solve();
    wrap_3d(shape, solver.into_grid().into_distance())
}

/// Approximate 3D geodesic distance transform by raster scanning.
///
/// `lambda` balances spatial displacement against intensity dissimilarity
/// (`0.0` gives the pure geometric distance transform); `iterations` is the
/// number of full 8-sweep passes.
///
/// # Errors
/// Returns an error if the two shapes differ, `lambda` is negative or not
/// finite, or `iterations` is zero.
pub fn raster_scan_3d(
    intensity: ArrayView3<'_, f32>,
    seeds: ArrayView3<'_, u8>,
    lambda: f32,
    iterations: usize,
) -> Result<Array3<f32>> {
    check_shapes(intensity.shape(), seeds.shape())?;
    let dim = intensity.dim();
    let shape = [dim.0, dim.1, dim.2];
    let (intensity, seeds) = flatten_3d(intensity, seeds);

    let mut solver = RasterScan::new(GeodesicGrid::<3>::new(shape, intensity, seeds)?)
        .with_lambda(lambda)?
        .with_iterations(iterations)?;
    solver.solve();
    wrap_3d(shape, solver.into_grid().into_distance())
}
