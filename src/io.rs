// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use ndarray::ArrayD;

use crate::error::{GeodistError, Result};

fn ensure_npy(path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("npy") => Ok(()),
        Some(ext) => Err(GeodistError::UnsupportedFileFormat(ext.to_string())),
        None => Err(GeodistError::UnsupportedFileFormat(
            "(no extension)".to_string(),
        )),
    }
}

/// Load an intensity field from a .npy file.
///
/// Reads f32 data directly; f64 files are demoted to f32, the native element
/// type of the transform. The result is in row-major (standard) layout
/// whatever the on-disk order was.
pub fn load_intensity(path: &Path) -> Result<ArrayD<f32>> {
    ensure_npy(path)?;

    let arr: ArrayD<f32> = match ndarray_npy::read_npy(path) {
        Ok(a) => a,
        Err(_) => {
            // Try f64 and demote
            let arr64: ArrayD<f64> = ndarray_npy::read_npy(path)
                .map_err(|e| GeodistError::UnsupportedDtype(format!("{}", e)))?;
            arr64.mapv(|v| v as f32)
        }
    };

    Ok(arr.as_standard_layout().to_owned())
}

/// Load a seed mask from a .npy file.
///
/// Reads u8 data directly; boolean files are widened to u8. Any nonzero
/// value marks a seed cell.
pub fn load_seeds(path: &Path) -> Result<ArrayD<u8>> {
    ensure_npy(path)?;

    let arr: ArrayD<u8> = match ndarray_npy::read_npy(path) {
        Ok(a) => a,
        Err(_) => {
            // Try bool and widen
            let arr_bool: ArrayD<bool> = ndarray_npy::read_npy(path)
                .map_err(|e| GeodistError::UnsupportedDtype(format!("{}", e)))?;
            arr_bool.mapv(u8::from)
        }
    };

    Ok(arr.as_standard_layout().to_owned())
}

/// Save a distance field to a .npy file as f32.
pub fn save_distance(distance: &ArrayD<f32>, path: &Path) -> Result<()> {
    ensure_npy(path)?;
    ndarray_npy::write_npy(path, distance)
        .map_err(|e| GeodistError::Other(format!("npy write error: {}", e)))?;
    Ok(())
}
