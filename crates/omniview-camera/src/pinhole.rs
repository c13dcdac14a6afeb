use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::projection::{CameraToWorld, WorldToCamera};

/// Error types for the virtual camera.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CameraError {
    /// A focal length is zero, negative or not finite.
    #[error("Invalid focal length ({0}, {1})")]
    InvalidFocalLength(f64, f64),

    /// The principal point is not finite.
    #[error("Invalid principal point ({0}, {1})")]
    InvalidPrincipalPoint(f64, f64),
}

/// Represents the intrinsic parameters of an ideal pinhole camera
///
/// # Fields
///
/// * `fx` - The focal length in the x direction
/// * `fy` - The focal length in the y direction
/// * `cx` - The x coordinate of the principal point
/// * `cy` - The y coordinate of the principal point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeCamera {
    /// The focal length in the x direction
    pub fx: f64,
    /// The focal length in the y direction
    pub fy: f64,
    /// The x coordinate of the principal point
    pub cx: f64,
    /// The y coordinate of the principal point
    pub cy: f64,
}

impl PinholeCamera {
    /// Create a camera, validating its parameters.
    ///
    /// # Errors
    ///
    /// The focal lengths must be finite and strictly positive and the principal
    /// point must be finite.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Result<Self, CameraError> {
        let camera = Self { fx, fy, cx, cy };
        camera.validate()?;
        Ok(camera)
    }

    /// Create a camera whose principal point is the center of a `width` x `height` image.
    pub fn centered(fx: f64, fy: f64, width: usize, height: usize) -> Result<Self, CameraError> {
        Self::new(fx, fy, width as f64 / 2.0, height as f64 / 2.0)
    }

    /// Check the parameters of the camera.
    pub fn validate(&self) -> Result<(), CameraError> {
        let valid_focal = |f: f64| f.is_finite() && f > 0.0;
        if !valid_focal(self.fx) || !valid_focal(self.fy) {
            return Err(CameraError::InvalidFocalLength(self.fx, self.fy));
        }
        if !self.cx.is_finite() || !self.cy.is_finite() {
            return Err(CameraError::InvalidPrincipalPoint(self.cx, self.cy));
        }
        Ok(())
    }

    /// Lift a pixel to the ray through it, with `z = 1`.
    pub fn unproject(&self, pixel: DVec2) -> DVec3 {
        DVec3::new(
            (pixel.x - self.cx) / self.fx,
            (pixel.y - self.cy) / self.fy,
            1.0,
        )
    }

    /// Project a ray in front of the camera to pixel coordinates.
    ///
    /// Returns `None` for rays with `z <= 0`.
    pub fn project(&self, ray: DVec3) -> Option<DVec2> {
        if ray.z <= 0.0 {
            return None;
        }
        Some(DVec2::new(
            self.fx * ray.x / ray.z + self.cx,
            self.fy * ray.y / ray.z + self.cy,
        ))
    }
}

impl WorldToCamera for PinholeCamera {
    fn world_to_camera(&self, ray: DVec3) -> Option<DVec2> {
        self.project(ray)
    }
}

impl CameraToWorld for PinholeCamera {
    fn camera_to_world(&self, pixel: DVec2) -> DVec3 {
        self.unproject(pixel)
    }
}
