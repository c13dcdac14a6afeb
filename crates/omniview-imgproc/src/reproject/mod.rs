//! Fisheye to perspective reprojection.
//!
//! Every destination pixel is lifted to a ray of a virtual pinhole camera,
//! turned into the frame of the physical camera and projected through the
//! omnidirectional model to find the source pixel it copies.
//!
//! Two layouts share the same pass:
//!
//! - [`remap_perspective`]: a single view corrected by a rotation.
//! - [`remap_split`]: two panned views meeting at a vertical seam.

mod branch;
mod remap;
mod split;
mod unproject;

pub use branch::{pan_rotation, BranchDescriptor, ViewBranch, ViewOrientation};
pub use remap::{remap_perspective, reproject};
pub use split::{remap_split, SplitBranch, SplitViewParams};
pub use unproject::{seam_principal_shift, unproject};

use crate::{
    interpolation::PixelRounding,
    parallel::{ExecutionStrategy, ParallelError},
};
use omniview_camera::CameraError;

/// Error types for the reprojection module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ReprojectError {
    /// The source image holds no pixels.
    #[error("source image is empty")]
    EmptySource,

    /// The destination image holds no pixels.
    #[error("destination image is empty")]
    EmptyDestination,

    /// No view branch was given.
    #[error("no view branch to reproject")]
    NoViewBranch,

    /// The virtual camera parameters are invalid.
    #[error("invalid virtual camera: {0}")]
    InvalidCamera(#[from] CameraError),

    /// The pass could not be scheduled.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

/// Options of a reprojection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemapOptions {
    /// How projected coordinates are turned into source pixels.
    pub rounding: PixelRounding,
    /// How destination rows are scheduled.
    pub strategy: ExecutionStrategy,
}
