use glam::{DMat3, DVec3};
use omniview_camera::PinholeCamera;

use super::unproject::unproject;

/// Which destination columns a branch renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewBranch {
    /// Every column.
    SingleView,
    /// Columns at or left of the seam.
    LeftBranch,
    /// Columns right of the seam.
    RightBranch,
}

impl ViewBranch {
    /// Whether the branch renders column `col` for a seam at `split_col`.
    pub fn covers(&self, col: f64, split_col: f64) -> bool {
        match self {
            ViewBranch::SingleView => true,
            ViewBranch::LeftBranch => col <= split_col,
            ViewBranch::RightBranch => col > split_col,
        }
    }
}

/// How a ray of the virtual camera is turned into the physical camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewOrientation {
    /// The virtual camera is the physical one corrected by a rotation `R`;
    /// rays map through `R^-1`.
    Rotation(DMat3),
    /// The corrected virtual camera is additionally panned by `yaw` radians
    /// about its vertical axis; rays map through `R^-1 * pan(-yaw)`.
    Pan {
        /// The pan angle in radians.
        yaw: f64,
        /// The corrective rotation.
        rotation: DMat3,
    },
}

impl ViewOrientation {
    /// The matrix mapping a virtual camera ray to the physical camera frame.
    pub fn ray_to_camera(&self) -> DMat3 {
        match self {
            ViewOrientation::Rotation(rotation) => rotation.inverse(),
            ViewOrientation::Pan { yaw, rotation } => rotation.inverse() * pan_rotation(-yaw),
        }
    }
}

/// Rotation by `theta` radians about the vertical (y) axis.
///
/// Maps `(x, y, z)` to `(z sin(theta) + x cos(theta), y, z cos(theta) - x sin(theta))`.
pub fn pan_rotation(theta: f64) -> DMat3 {
    DMat3::from_rotation_y(theta)
}

/// Parameters of one branch of a reprojection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchDescriptor {
    /// The columns the branch renders.
    pub branch: ViewBranch,
    /// The virtual pinhole camera.
    pub camera: PinholeCamera,
    /// Offset added to the principal point column.
    pub principal_shift: f64,
    /// The orientation of the virtual camera.
    pub orientation: ViewOrientation,
}

impl BranchDescriptor {
    /// A branch covering the whole image, corrected by `rotation`.
    pub fn single(camera: PinholeCamera, rotation: DMat3) -> Self {
        Self {
            branch: ViewBranch::SingleView,
            camera,
            principal_shift: 0.0,
            orientation: ViewOrientation::Rotation(rotation),
        }
    }

    /// The ray of pixel `(col, row)` expressed in the physical camera frame.
    ///
    /// Computes the orientation matrix on every call; reprojection passes
    /// prepare it once per branch instead.
    pub fn camera_ray(&self, col: f64, row: f64) -> DVec3 {
        self.orientation.ray_to_camera() * unproject(col, row, &self.camera, self.principal_shift)
    }
}

/// A branch with its orientation matrix resolved, ready for the per-pixel loop.
pub(crate) struct PreparedBranch {
    pub(crate) branch: ViewBranch,
    pub(crate) camera: PinholeCamera,
    pub(crate) principal_shift: f64,
    pub(crate) ray_to_camera: DMat3,
}

impl From<&BranchDescriptor> for PreparedBranch {
    fn from(descriptor: &BranchDescriptor) -> Self {
        Self {
            branch: descriptor.branch,
            camera: descriptor.camera,
            principal_shift: descriptor.principal_shift,
            ray_to_camera: descriptor.orientation.ray_to_camera(),
        }
    }
}

impl PreparedBranch {
    pub(crate) fn camera_ray(&self, col: f64, row: f64) -> DVec3 {
        self.ray_to_camera * unproject(col, row, &self.camera, self.principal_shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_6;

    #[test]
    fn branch_columns() {
        assert!(ViewBranch::SingleView.covers(100.0, 3.0));
        assert!(ViewBranch::LeftBranch.covers(3.0, 3.0));
        assert!(!ViewBranch::LeftBranch.covers(4.0, 3.0));
        assert!(ViewBranch::RightBranch.covers(4.0, 3.0));
        assert!(!ViewBranch::RightBranch.covers(3.0, 3.0));
    }

    #[test]
    fn pan_matches_component_formula() {
        let theta = -0.35f64;
        let ray = DVec3::new(0.2, -0.4, 1.0);
        let expected = DVec3::new(
            ray.z * theta.sin() + ray.x * theta.cos(),
            ray.y,
            ray.z * theta.cos() - ray.x * theta.sin(),
        );
        assert!((pan_rotation(theta) * ray - expected).length() < 1e-12);
    }

    #[test]
    fn pan_orientation_turns_the_optical_axis() {
        // panning the virtual camera by +30 degrees looks at -30 degrees of yaw
        let orientation = ViewOrientation::Pan {
            yaw: FRAC_PI_6,
            rotation: DMat3::IDENTITY,
        };
        let axis = orientation.ray_to_camera() * DVec3::Z;
        assert!((axis.x.atan2(axis.z) + FRAC_PI_6).abs() < 1e-12);
    }

    #[test]
    fn rotation_orientation_inverts() {
        let rotation = DMat3::from_rotation_x(0.3) * DMat3::from_rotation_y(-0.2);
        let orientation = ViewOrientation::Rotation(rotation);
        assert!((orientation.ray_to_camera() * rotation).abs_diff_eq(DMat3::IDENTITY, 1e-12));
    }
}
