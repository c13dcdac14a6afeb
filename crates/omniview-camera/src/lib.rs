#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Omnidirectional polynomial camera model.
pub mod ocam;

/// Virtual pinhole camera.
pub mod pinhole;

/// Projection capabilities shared by every camera model.
pub mod projection;

pub use ocam::{CalibrationError, OcamModel};
pub use pinhole::{CameraError, PinholeCamera};
pub use projection::{CameraToWorld, LoadCalibration, WorldToCamera};
