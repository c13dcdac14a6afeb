#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// High-level image reading and writing functions.
///
/// See [`functional::read_image_rgb8`] and [`functional::write_image_rgb8`].
pub mod functional;

pub use error::IoError;
