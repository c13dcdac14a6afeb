use std::path::Path;

use glam::{DVec2, DVec3};

/// Maps a viewing ray in the camera frame to a pixel of the camera image.
///
/// Rays follow the z-forward convention: x to the right, y down, z along the
/// optical axis. Pixels are `(u, v)` with `u` the column and `v` the row.
pub trait WorldToCamera: Send + Sync {
    /// Project a ray to pixel coordinates.
    ///
    /// Returns `None` when the model cannot image the ray. The returned pixel
    /// may lie outside the image; bounds are checked by the caller.
    fn world_to_camera(&self, ray: DVec3) -> Option<DVec2>;
}

/// Maps a pixel of the camera image back to a viewing ray.
pub trait CameraToWorld {
    /// Lift pixel coordinates to a ray in the camera frame.
    fn camera_to_world(&self, pixel: DVec2) -> DVec3;
}

/// Loads a calibrated camera model from a calibration file.
pub trait LoadCalibration: Sized {
    /// The error returned when the file cannot be read or parsed.
    type Error: std::error::Error;

    /// Load the model from `path`.
    fn load(path: impl AsRef<Path>) -> Result<Self, Self::Error>;
}

impl<M: WorldToCamera + ?Sized> WorldToCamera for &M {
    fn world_to_camera(&self, ray: DVec3) -> Option<DVec2> {
        (**self).world_to_camera(ray)
    }
}

impl<M: WorldToCamera + ?Sized> WorldToCamera for Box<M> {
    fn world_to_camera(&self, ray: DVec3) -> Option<DVec2> {
        (**self).world_to_camera(ray)
    }
}
