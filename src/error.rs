// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

/// Errors that can occur during grid setup, I/O, or solver configuration.
#[derive(Debug)]
pub enum GeodistError {
    /// Grid shape is invalid (empty axis).
    InvalidGridShape {
        /// The axis index.
        axis: usize,
        /// The size provided.
        size: usize,
    },
    /// Array shape does not match expected shape.
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape encountered.
        got: Vec<usize>,
    },
    /// Intensity value is not finite.
    InvalidIntensity {
        /// The flat index of the invalid value.
        index: usize,
        /// The invalid value.
        value: f32,
    },
    /// Lambda weighting factor is negative or not finite.
    InvalidLambda(f32),
    /// Raster scan iteration count is zero.
    InvalidIterations(usize),
    /// Convergence tolerance is negative or not finite.
    InvalidTolerance(f32),
    /// Unsupported data type in file.
    UnsupportedDtype(String),
    /// Unsupported file format (unrecognized extension).
    UnsupportedFileFormat(String),
    /// I/O error occurred.
    IoError(std::io::Error),
    /// Other error with a descriptive message.
    Other(String),
}

impl fmt::Display for GeodistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeodistError::InvalidGridShape { axis, size } => {
                write!(
                    f,
                    "invalid grid shape: axis {} has size {} (must be >= 1)",
                    axis, size
                )
            }
            GeodistError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {:?}, got {:?}", expected, got)
            }
            GeodistError::InvalidIntensity { index, value } => {
                write!(
                    f,
                    "invalid intensity at index {}: {} (must be finite)",
                    index, value
                )
            }
            GeodistError::InvalidLambda(lambda) => {
                write!(
                    f,
                    "invalid lambda: {} (must be non-negative and finite)",
                    lambda
                )
            }
            GeodistError::InvalidIterations(n) => {
                write!(f, "invalid iteration count: {} (must be >= 1)", n)
            }
            GeodistError::InvalidTolerance(tol) => {
                write!(
                    f,
                    "invalid tolerance: {} (must be non-negative and finite)",
                    tol
                )
            }
            GeodistError::UnsupportedDtype(dtype) => {
                write!(f, "unsupported dtype: {}", dtype)
            }
            GeodistError::UnsupportedFileFormat(ext) => {
                write!(f, "unsupported file format: {}", ext)
            }
            GeodistError::IoError(e) => write!(f, "I/O error: {}", e),
            GeodistError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GeodistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeodistError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GeodistError {
    fn from(e: std::io::Error) -> Self {
        GeodistError::IoError(e)
    }
}

/// Convenience type alias for Results with GeodistError.
pub type Result<T> = std::result::Result<T, GeodistError>;
