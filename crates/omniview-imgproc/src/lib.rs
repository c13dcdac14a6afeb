#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// utilities for pixel lookup.
pub mod interpolation;

/// module containing parallelization utilities.
pub mod parallel;

/// fisheye to perspective reprojection module.
pub mod reproject;
