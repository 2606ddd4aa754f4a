// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{GeodistError, Result};

/// Core grid data access. Provides intensity, seed, and distance field
/// access, grid geometry, and index conversion utilities.
pub trait GridData<const N: usize> {
    /// Get the intensity value at the given N-dimensional index.
    fn intensity(&self, idx: [usize; N]) -> f32;

    /// Check whether the cell at the given index is a seed.
    fn is_seed(&self, idx: [usize; N]) -> bool;

    /// Get the current distance value at the given N-dimensional index.
    fn distance(&self, idx: [usize; N]) -> f32;

    /// Lower the distance at the given index if the new value is smaller.
    /// Returns true if the update was applied, false if the current value
    /// was already smaller or equal.
    fn relax(&mut self, idx: [usize; N], val: f32) -> bool;

    /// Get the grid shape (number of cells along each axis).
    fn shape(&self) -> [usize; N];

    /// Get the row-major strides for index computation.
    fn strides(&self) -> [usize; N];

    /// Get the total number of cells in the grid.
    fn num_cells(&self) -> usize;

    /// Convert a flat index to an N-dimensional index.
    fn flat_to_nd(&self, flat: usize) -> [usize; N];

    /// Convert an N-dimensional index to a flat index.
    /// Callers must supply in-range coordinates; use [`GridData::checked_flat`]
    /// for coordinates of unknown provenance.
    fn nd_to_flat(&self, idx: [usize; N]) -> usize;

    /// Convert an N-dimensional index to a flat index, rejecting any
    /// coordinate outside `[0, dim)` on its axis.
    fn checked_flat(&self, idx: [usize; N]) -> Option<usize> {
        let shape = self.shape();
        for d in 0..N {
            if idx[d] >= shape[d] {
                return None;
            }
        }
        Some(self.nd_to_flat(idx))
    }
}

/// A regular grid holding the inputs and output of a geodesic distance
/// transform.
///
/// Stores the grid shape, the read-only intensity field and seed mask, and
/// the distance field under construction. At creation the distance field is
/// `0.0` at seed cells and `+inf` everywhere else; solvers only ever lower
/// it from there. The generic parameter `N` is the number of spatial
/// dimensions (2 or 3).
pub struct GeodesicGrid<const N: usize> {
    shape: [usize; N],
    strides: [usize; N],
    intensity: Box<[f32]>,
    seeds: Box<[bool]>,
    distance: Box<[f32]>,
}

impl<const N: usize> GeodesicGrid<N> {
    /// Create a new grid from an intensity field and a seed mask.
    ///
    /// # Parameters
    /// - `shape`: Number of cells along each axis (each must be >= 1)
    /// - `intensity`: Intensity values in row-major order (must all be finite)
    /// - `seeds`: Seed mask in row-major order; any nonzero byte marks a seed
    ///
    /// # Errors
    /// Returns an error if an axis is empty, a buffer length does not match
    /// the product of the shape dimensions, or an intensity value is not
    /// finite.
    pub fn new(shape: [usize; N], intensity: Vec<f32>, seeds: Vec<u8>) -> Result<Self> {
        assert!(N == 2 || N == 3, "GeodesicGrid only supports N=2 or N=3");

        for (axis, &size) in shape.iter().enumerate() {
            if size == 0 {
                return Err(GeodistError::InvalidGridShape { axis, size });
            }
        }

        let num_cells: usize = shape.iter().product();
        if intensity.len() != num_cells {
            return Err(GeodistError::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![intensity.len()],
            });
        }
        if seeds.len() != num_cells {
            return Err(GeodistError::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![seeds.len()],
            });
        }

        for (index, &value) in intensity.iter().enumerate() {
            if !value.is_finite() {
                return Err(GeodistError::InvalidIntensity { index, value });
            }
        }

        // Compute row-major strides
        let mut strides = [0usize; N];
        strides[N - 1] = 1;
        for d in (0..N - 1).rev() {
            strides[d] = strides[d + 1] * shape[d + 1];
        }

        let seeds: Box<[bool]> = seeds.iter().map(|&s| s != 0).collect();
        let distance: Box<[f32]> = seeds
            .iter()
            .map(|&s| if s { 0.0 } else { f32::INFINITY })
            .collect();

        Ok(GeodesicGrid {
            shape,
            strides,
            intensity: intensity.into_boxed_slice(),
            seeds,
            distance,
        })
    }

    /// Get a reference to the intensity field in row-major order.
    pub fn intensity_raw(&self) -> &[f32] {
        &self.intensity
    }

    /// Get a reference to the distance field in row-major order.
    pub fn distance_raw(&self) -> &[f32] {
        &self.distance
    }

    /// Number of seed cells in the mask.
    pub fn num_seeds(&self) -> usize {
        self.seeds.iter().filter(|&&s| s).count()
    }

    /// Consume the grid and return the distance field in row-major order.
    pub fn into_distance(self) -> Vec<f32> {
        self.distance.into_vec()
    }
}

#[allow(clippy::needless_range_loop)]
impl<const N: usize> GridData<N> for GeodesicGrid<N> {
    fn intensity(&self, idx: [usize; N]) -> f32 {
        self.intensity[self.nd_to_flat(idx)]
    }

    fn is_seed(&self, idx: [usize; N]) -> bool {
        self.seeds[self.nd_to_flat(idx)]
    }

    fn distance(&self, idx: [usize; N]) -> f32 {
        self.distance[self.nd_to_flat(idx)]
    }

    fn relax(&mut self, idx: [usize; N], val: f32) -> bool {
        let flat = self.nd_to_flat(idx);
        if val < self.distance[flat] {
            self.distance[flat] = val;
            true
        } else {
            false
        }
    }

    fn shape(&self) -> [usize; N] {
        self.shape
    }

    fn strides(&self) -> [usize; N] {
        self.strides
    }

    fn num_cells(&self) -> usize {
        self.shape.iter().product()
    }

    fn flat_to_nd(&self, flat: usize) -> [usize; N] {
        let mut idx = [0usize; N];
        let mut remainder = flat;
        for d in 0..N {
            idx[d] = remainder / self.strides[d];
            remainder %= self.strides[d];
        }
        idx
    }

    fn nd_to_flat(&self, idx: [usize; N]) -> usize {
        let mut flat = 0;
        for d in 0..N {
            flat += idx[d] * self.strides[d];
        }
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_grid_2d(shape: [usize; 2]) -> GeodesicGrid<2> {
        let n = shape[0] * shape[1];
        GeodesicGrid::<2>::new(shape, vec![0.0; n], vec![0; n]).unwrap()
    }

    #[test]
    fn flat_nd_roundtrip_2d() {
        let grid = uniform_grid_2d([12, 8]);
        for flat in 0..96 {
            let nd = grid.flat_to_nd(flat);
            assert_eq!(grid.nd_to_flat(nd), flat, "flat={} nd={:?}", flat, nd);
        }
    }

    #[test]
    fn flat_nd_roundtrip_3d() {
        let grid =
            GeodesicGrid::<3>::new([4, 5, 6], vec![0.0; 120], vec![0; 120]).unwrap();
        for flat in 0..120 {
            let nd = grid.flat_to_nd(flat);
            assert_eq!(grid.nd_to_flat(nd), flat);
        }
    }

    #[test]
    fn checked_flat_rejects_out_of_range() {
        let grid = uniform_grid_2d([4, 6]);
        assert_eq!(grid.checked_flat([0, 0]), Some(0));
        assert_eq!(grid.checked_flat([3, 5]), Some(23));
        assert_eq!(grid.checked_flat([4, 0]), None);
        assert_eq!(grid.checked_flat([0, 6]), None);
    }

    #[test]
    fn seed_initialization() {
        let mut seeds = vec![0u8; 16];
        seeds[5] = 1;
        seeds[10] = 255; // any nonzero byte counts
        let grid = GeodesicGrid::<2>::new([4, 4], vec![1.0; 16], seeds).unwrap();

        assert_eq!(grid.num_seeds(), 2);
        for flat in 0..16 {
            let idx = grid.flat_to_nd(flat);
            if flat == 5 || flat == 10 {
                assert!(grid.is_seed(idx));
                assert_eq!(grid.distance(idx), 0.0);
            } else {
                assert!(!grid.is_seed(idx));
                assert!(grid.distance(idx).is_infinite());
            }
        }
    }

    #[test]
    fn relax_monotonicity() {
        let mut grid = uniform_grid_2d([4, 4]);
        let idx = [1, 1];

        // Start at infinity, decrease
        assert!(grid.relax(idx, 10.0));
        assert_eq!(grid.distance(idx), 10.0);

        assert!(grid.relax(idx, 5.0));
        assert_eq!(grid.distance(idx), 5.0);

        // Try to increase — should fail
        assert!(!grid.relax(idx, 7.0));
        assert_eq!(grid.distance(idx), 5.0);

        // Equal value — should fail
        assert!(!grid.relax(idx, 5.0));
        assert_eq!(grid.distance(idx), 5.0);
    }

    #[test]
    fn single_cell_axis_allowed() {
        let grid = GeodesicGrid::<2>::new([1, 5], vec![0.0; 5], vec![0; 5]).unwrap();
        assert_eq!(grid.num_cells(), 5);
    }

    #[test]
    fn invalid_grid_shape() {
        let result = GeodesicGrid::<2>::new([0, 10], vec![0.0; 0], vec![0; 0]);
        assert!(matches!(
            result,
            Err(GeodistError::InvalidGridShape { axis: 0, size: 0 })
        ));
    }

    #[test]
    fn intensity_length_mismatch() {
        let result = GeodesicGrid::<2>::new([4, 4], vec![0.0; 10], vec![0; 16]);
        assert!(matches!(result, Err(GeodistError::ShapeMismatch { .. })));
    }

    #[test]
    fn seed_length_mismatch() {
        let result = GeodesicGrid::<2>::new([4, 4], vec![0.0; 16], vec![0; 10]);
        assert!(matches!(result, Err(GeodistError::ShapeMismatch { .. })));
    }

    #[test]
    fn non_finite_intensity_rejected() {
        let mut intensity = vec![1.0; 16];
        intensity[3] = f32::NAN;
        let result = GeodesicGrid::<2>::new([4, 4], intensity, vec![0; 16]);
        assert!(matches!(
            result,
            Err(GeodistError::InvalidIntensity { index: 3, .. })
        ));

        let mut intensity = vec![1.0; 16];
        intensity[9] = f32::INFINITY;
        let result = GeodesicGrid::<2>::new([4, 4], intensity, vec![0; 16]);
        assert!(matches!(
            result,
            Err(GeodistError::InvalidIntensity { index: 9, .. })
        ));
    }

    #[test]
    fn into_distance_preserves_layout() {
        let mut seeds = vec![0u8; 6];
        seeds[2] = 1;
        let grid = GeodesicGrid::<2>::new([2, 3], vec![0.0; 6], seeds).unwrap();
        let dist = grid.into_distance();
        assert_eq!(dist.len(), 6);
        assert_eq!(dist[2], 0.0);
        assert!(dist[0].is_infinite());
    }
}
