#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// I/O utilities for reading camera extrinsics.
pub mod io;

/// Orientation averaging of a camera pair.
pub mod rectify;

/// Rigid body transforms.
pub mod rigid;

pub use rectify::{average_rotations, CorrectiveRotations, RectifyError};
pub use rigid::RigidTransform;
