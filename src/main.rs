// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ndarray::{ArrayD, IxDyn};

use geodist::core::GeodesicGrid;
use geodist::io;
use geodist::marching::FastMarching;
use geodist::scanning::{ProgressInfo, RasterScan};

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Exact priority-ordered wavefront propagation
    FastMarching,
    /// Iterative multi-directional sweep relaxation
    RasterScan,
}

#[derive(Parser)]
#[command(name = "geodist", about = "Geodesic distance transform over .npy grids")]
struct Cli {
    /// Solver to run
    #[arg(short = 'm', long, value_enum)]
    method: Method,

    /// Intensity field (.npy, f32 or f64, 2D or 3D)
    #[arg(short = 'i', long)]
    intensity: PathBuf,

    /// Seed mask (.npy, u8 or bool, same shape; nonzero cells are sources)
    #[arg(short = 's', long)]
    seeds: PathBuf,

    /// Weighting between spatial distance and intensity dissimilarity
    #[arg(short = 'l', long, default_value = "1.0")]
    lambda: f32,

    /// Number of full passes (raster scan only)
    #[arg(short = 'n', long, default_value = "4")]
    iterations: usize,

    /// Stop raster scanning early once a pass changes no cell by more
    /// than this amount
    #[arg(short = 't', long, default_value = "0.0")]
    tolerance: f32,

    /// Output distance field (.npy, f32)
    #[arg(short = 'o', long, default_value = "distance.npy")]
    output: PathBuf,

    /// Print per-pass convergence progress to stderr (raster scan only)
    #[arg(long)]
    progress: bool,
}

fn progress_printer() -> Box<dyn Fn(ProgressInfo)> {
    Box::new(|info: ProgressInfo| {
        eprintln!(
            "[{:.1}s] pass {}/{} max_change={}",
            info.elapsed.as_secs_f64(),
            info.pass,
            info.iterations,
            info.max_change,
        );
    })
}

fn run_2d(cli: &Cli, intensity: ArrayD<f32>, seeds: ArrayD<u8>) -> Result<Vec<f32>> {
    let shape = [intensity.shape()[0], intensity.shape()[1]];
    let grid = GeodesicGrid::<2>::new(shape, intensity.into_raw_vec(), seeds.into_raw_vec())
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    match cli.method {
        Method::FastMarching => {
            let mut solver = FastMarching::new(grid)
                .with_lambda(cli.lambda)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            solver.solve();
            Ok(solver.into_grid().into_distance())
        }
        Method::RasterScan => {
            let mut solver = RasterScan::new(grid)
                .with_lambda(cli.lambda)
                .map_err(|e| anyhow::anyhow!("{}", e))?
                .with_iterations(cli.iterations)
                .map_err(|e| anyhow::anyhow!("{}", e))?
                .with_tolerance(cli.tolerance)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            if cli.progress {
                solver = solver.with_progress(progress_printer());
            }
            solver.solve();
            Ok(solver.into_grid().into_distance())
        }
    }
}

fn run_3d(cli: &Cli, intensity: ArrayD<f32>, seeds: ArrayD<u8>) -> Result<Vec<f32>> {
    let shape = [
        intensity.shape()[0],
        intensity.shape()[1],
        intensity.shape()[2],
    ];
    let grid = GeodesicGrid::<3>::new(shape, intensity.into_raw_vec(), seeds.into_raw_vec())
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    match cli.method {
        Method::FastMarching => {
            let mut solver = FastMarching::new(grid)
                .with_lambda(cli.lambda)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            solver.solve();
            Ok(solver.into_grid().into_distance())
        }
        Method::RasterScan => {
            let mut solver = RasterScan::new(grid)
                .with_lambda(cli.lambda)
                .map_err(|e| anyhow::anyhow!("{}", e))?
                .with_iterations(cli.iterations)
                .map_err(|e| anyhow::anyhow!("{}", e))?
                .with_tolerance(cli.tolerance)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            if cli.progress {
                solver = solver.with_progress(progress_printer());
            }
            solver.solve();
            Ok(solver.into_grid().into_distance())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let intensity = io::load_intensity(&cli.intensity)
        .with_context(|| format!("loading intensity from {}", cli.intensity.display()))?;
    let seeds = io::load_seeds(&cli.seeds)
        .with_context(|| format!("loading seeds from {}", cli.seeds.display()))?;

    if intensity.shape() != seeds.shape() {
        bail!(
            "intensity shape {:?} does not match seed shape {:?}",
            intensity.shape(),
            seeds.shape()
        );
    }

    let shape: Vec<usize> = intensity.shape().to_vec();
    let distance = match shape.len() {
        2 => run_2d(&cli, intensity, seeds)?,
        3 => run_3d(&cli, intensity, seeds)?,
        n => bail!("expected a 2D or 3D array, got {} dimensions", n),
    };

    let arr = ArrayD::from_shape_vec(IxDyn(&shape), distance)
        .context("assembling output array")?;
    io::save_distance(&arr, &cli.output).map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
