// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use ndarray::{Array2, Array3};

use geodist::core::{GeodesicGrid, GridData};
use geodist::cost::edge_cost;
use geodist::marching::FastMarching;
use geodist::scanning::RasterScan;
use geodist::{fast_marching_2d, fast_marching_3d, raster_scan_2d, raster_scan_3d};

/// A deterministic, non-uniform intensity pattern.
fn patterned_intensity_2d(shape: (usize, usize)) -> Array2<f32> {
    Array2::from_shape_fn(shape, |(i, j)| ((i * 13 + j * 7) % 5) as f32 * 0.3)
}

fn patterned_intensity_3d(shape: (usize, usize, usize)) -> Array3<f32> {
    Array3::from_shape_fn(shape, |(i, j, k)| ((i + 2 * j + 3 * k) % 4) as f32 * 0.25)
}

/// Test 1: Seeds stay at zero and the field is non-negative, for every
/// operation and both dimensionalities.
#[test]
fn seeds_zero_and_field_non_negative() {
    let intensity = patterned_intensity_2d((9, 11));
    let mut seeds = Array2::<u8>::zeros((9, 11));
    seeds[[0, 0]] = 1;
    seeds[[4, 7]] = 1;
    seeds[[8, 10]] = 1;

    for d in [
        fast_marching_2d(intensity.view(), seeds.view()).unwrap(),
        raster_scan_2d(intensity.view(), seeds.view()).unwrap(),
    ] {
        assert_eq!(d[[0, 0]], 0.0);
        assert_eq!(d[[4, 7]], 0.0);
        assert_eq!(d[[8, 10]], 0.0);
        for &v in d.iter() {
            assert!(v >= 0.0, "negative distance: {}", v);
        }
    }

    let intensity = patterned_intensity_3d((5, 6, 7));
    let mut seeds = Array3::<u8>::zeros((5, 6, 7));
    seeds[[2, 3, 4]] = 1;

    for d in [
        fast_marching_3d(intensity.view(), seeds.view()).unwrap(),
        raster_scan_3d(intensity.view(), seeds.view(), 1.0, 6).unwrap(),
    ] {
        assert_eq!(d[[2, 3, 4]], 0.0);
        for &v in d.iter() {
            assert!(v >= 0.0, "negative distance: {}", v);
        }
    }
}

/// Test 2: With lambda = 0 the transform is the plain axis-aligned geometric
/// distance transform, whatever the intensity field looks like.
#[test]
fn lambda_zero_is_city_block_distance() {
    let shape = (8, 10);
    let intensity = patterned_intensity_2d(shape);
    let seed_cells = [(1usize, 2usize), (6, 8)];

    let mut seeds = vec![0u8; shape.0 * shape.1];
    for &(si, sj) in &seed_cells {
        seeds[si * shape.1 + sj] = 1;
    }

    let grid = GeodesicGrid::<2>::new(
        [shape.0, shape.1],
        intensity.clone().into_raw_vec(),
        seeds,
    )
    .unwrap();
    let mut solver = FastMarching::new(grid).with_lambda(0.0).unwrap();
    solver.solve();

    for i in 0..shape.0 {
        for j in 0..shape.1 {
            let expected = seed_cells
                .iter()
                .map(|&(si, sj)| {
                    (i as f32 - si as f32).abs() + (j as f32 - sj as f32).abs()
                })
                .fold(f32::INFINITY, f32::min);
            let d = solver.grid().distance([i, j]);
            assert!(
                (d - expected).abs() < 1e-4,
                "city-block mismatch at [{}, {}]: {} vs {}",
                i,
                j,
                d,
                expected
            );
        }
    }
}

/// Test 3: Adjacent cells never differ by more than the edge cost between
/// them (the Lipschitz bound induced by the propagation rule).
#[test]
fn adjacent_cells_satisfy_lipschitz_bound() {
    let lambda = 1.0;
    let intensity = patterned_intensity_2d((10, 10));
    let mut seeds = Array2::<u8>::zeros((10, 10));
    seeds[[3, 3]] = 1;

    let d = fast_marching_2d(intensity.view(), seeds.view()).unwrap();

    for i in 0..10 {
        for j in 0..10 {
            for (ni, nj) in [(i + 1, j), (i, j + 1)] {
                if ni >= 10 || nj >= 10 {
                    continue;
                }
                let bound = edge_cost(1.0, intensity[[i, j]], intensity[[ni, nj]], lambda);
                let gap = (d[[i, j]] - d[[ni, nj]]).abs();
                assert!(
                    gap <= bound + 1e-4,
                    "bound violated between [{}, {}] and [{}, {}]: {} > {}",
                    i,
                    j,
                    ni,
                    nj,
                    gap,
                    bound
                );
            }
        }
    }
}

/// A 2D field whose cheap paths wind around a high-intensity wall, so the
/// raster scan needs several passes to match fast marching.
fn walled_intensity_2d() -> (Array2<f32>, Array2<u8>) {
    let mut intensity = Array2::<f32>::zeros((9, 9));
    for i in 1..9 {
        intensity[[i, 4]] = 40.0; // wall down column 4, gap at row 0
    }
    let mut seeds = Array2::<u8>::zeros((9, 9));
    seeds[[8, 0]] = 1;
    (intensity, seeds)
}

/// Test 4: Raster scanning is monotone non-increasing in the pass count and
/// converges to the fast marching field.
#[test]
fn raster_scan_converges_to_fast_marching_2d() {
    let (intensity, seeds) = walled_intensity_2d();
    let exact = fast_marching_2d(intensity.view(), seeds.view()).unwrap();

    let run = |iterations: usize| -> Vec<f32> {
        let grid = GeodesicGrid::<2>::new(
            [9, 9],
            intensity.clone().into_raw_vec(),
            seeds.clone().into_raw_vec(),
        )
        .unwrap();
        let mut solver = RasterScan::new(grid).with_iterations(iterations).unwrap();
        solver.solve();
        solver.into_grid().into_distance()
    };

    let mut previous = run(1);
    for iterations in [2, 4, 8, 20] {
        let current = run(iterations);
        for (flat, (&p, &c)) in previous.iter().zip(current.iter()).enumerate() {
            assert!(
                c <= p + 1e-5,
                "pass count {} raised flat index {}: {} -> {}",
                iterations,
                flat,
                p,
                c
            );
        }
        previous = current;
    }

    let mut max_err = 0.0_f32;
    for (&approx, &ex) in previous.iter().zip(exact.iter()) {
        let err = (approx - ex).abs();
        if err > max_err {
            max_err = err;
        }
    }
    assert!(
        max_err < 1e-3,
        "raster scan did not converge to fast marching: max error {}",
        max_err
    );
}

/// Test 4 3D variant: 8-sweep passes converge to the 3D fast marching field.
#[test]
fn raster_scan_converges_to_fast_marching_3d() {
    let intensity = patterned_intensity_3d((6, 6, 6));
    let mut seeds = Array3::<u8>::zeros((6, 6, 6));
    seeds[[0, 0, 0]] = 1;
    seeds[[5, 5, 5]] = 1;

    let exact = fast_marching_3d(intensity.view(), seeds.view()).unwrap();
    let approx = raster_scan_3d(intensity.view(), seeds.view(), 1.0, 12).unwrap();

    let mut max_err = 0.0_f32;
    for (&a, &e) in approx.iter().zip(exact.iter()) {
        let err = (a - e).abs();
        if err > max_err {
            max_err = err;
        }
    }
    assert!(
        max_err < 1e-3,
        "3D raster scan max error vs fast marching: {}",
        max_err
    );
}

/// Test 5: Geodesic distance respects image structure: with a high-intensity
/// obstacle in the way, the distance is the around-path length, well above
/// the straight-line geometric distance.
#[test]
fn distance_respects_image_structure() {
    let mut intensity = Array2::<f32>::zeros((7, 7));
    for i in 1..6 {
        for j in 2..5 {
            intensity[[i, j]] = 100.0; // opaque block in the middle
        }
    }
    let mut seeds = Array2::<u8>::zeros((7, 7));
    seeds[[3, 0]] = 1;

    let d = fast_marching_2d(intensity.view(), seeds.view()).unwrap();

    // Straight across would be 6 steps; the cheap path detours around the
    // block through row 0 or row 6
    let across = d[[3, 6]];
    assert!(across > 6.0 + 1.0, "distance {} ignored the obstacle", across);
    assert!(across < 14.0, "distance {} exceeds the detour cost", across);
}

/// Test 6: Repeated invocation with identical inputs is bit-identical.
#[test]
fn determinism_bit_identical() {
    let intensity = patterned_intensity_2d((12, 12));
    let mut seeds = Array2::<u8>::zeros((12, 12));
    seeds[[5, 5]] = 1;
    seeds[[0, 11]] = 1;

    let a = fast_marching_2d(intensity.view(), seeds.view()).unwrap();
    let b = fast_marching_2d(intensity.view(), seeds.view()).unwrap();
    assert_eq!(a, b);

    let intensity = patterned_intensity_3d((4, 5, 6));
    let mut seeds = Array3::<u8>::zeros((4, 5, 6));
    seeds[[1, 2, 3]] = 1;

    let a = raster_scan_3d(intensity.view(), seeds.view(), 0.5, 4).unwrap();
    let b = raster_scan_3d(intensity.view(), seeds.view(), 0.5, 4).unwrap();
    assert_eq!(a, b);
}

/// Test 7: Output shape equals input shape for all four operations.
#[test]
fn shape_preservation() {
    let intensity = patterned_intensity_2d((6, 13));
    let seeds = Array2::<u8>::zeros((6, 13));
    assert_eq!(
        fast_marching_2d(intensity.view(), seeds.view()).unwrap().dim(),
        (6, 13)
    );
    assert_eq!(
        raster_scan_2d(intensity.view(), seeds.view()).unwrap().dim(),
        (6, 13)
    );

    let intensity = patterned_intensity_3d((3, 7, 5));
    let seeds = Array3::<u8>::zeros((3, 7, 5));
    assert_eq!(
        fast_marching_3d(intensity.view(), seeds.view()).unwrap().dim(),
        (3, 7, 5)
    );
    assert_eq!(
        raster_scan_3d(intensity.view(), seeds.view(), 1.0, 2)
            .unwrap()
            .dim(),
        (3, 7, 5)
    );
}

/// Test 8: An empty seed mask is not an error; every cell is reported
/// unreached, for every operation.
#[test]
fn empty_seed_mask_yields_unreached_field() {
    let intensity = patterned_intensity_2d((5, 5));
    let seeds = Array2::<u8>::zeros((5, 5));

    for d in [
        fast_marching_2d(intensity.view(), seeds.view()).unwrap(),
        raster_scan_2d(intensity.view(), seeds.view()).unwrap(),
    ] {
        assert!(d.iter().all(|v| v.is_infinite()));
    }

    let intensity = patterned_intensity_3d((4, 4, 4));
    let seeds = Array3::<u8>::zeros((4, 4, 4));

    for d in [
        fast_marching_3d(intensity.view(), seeds.view()).unwrap(),
        raster_scan_3d(intensity.view(), seeds.view(), 1.0, 3).unwrap(),
    ] {
        assert!(d.iter().all(|v| v.is_infinite()));
    }
}

/// Test 9: Both solver families agree exactly on uniform intensity, where
/// the raster scan converges within a single pass.
#[test]
fn solvers_agree_on_uniform_intensity() {
    let intensity = Array2::<f32>::from_elem((11, 8), 0.75);
    let mut seeds = Array2::<u8>::zeros((11, 8));
    seeds[[2, 6]] = 1;
    seeds[[9, 1]] = 1;

    let fm = fast_marching_2d(intensity.view(), seeds.view()).unwrap();
    let rs = raster_scan_2d(intensity.view(), seeds.view()).unwrap();

    for (i, (&a, &b)) in fm.iter().zip(rs.iter()).enumerate() {
        assert!(
            (a - b).abs() < 1e-5,
            "solver disagreement at flat index {}: {} vs {}",
            i,
            a,
            b
        );
    }
}
