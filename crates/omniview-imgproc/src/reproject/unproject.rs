use glam::DVec3;
use omniview_camera::PinholeCamera;

/// Lift a destination pixel to a ray of the virtual pinhole camera.
///
/// # Arguments
///
/// * `col` - The column of the pixel.
/// * `row` - The row of the pixel.
/// * `camera` - The virtual camera.
/// * `principal_shift` - Horizontal offset added to the principal point, zero
///   outside split views.
///
/// # Returns
///
/// The ray `((col - cx') / fx, (row - cy) / fy, 1)` with `cx' = cx + principal_shift`.
pub fn unproject(col: f64, row: f64, camera: &PinholeCamera, principal_shift: f64) -> DVec3 {
    let x = (col - (camera.cx + principal_shift)) / camera.fx;
    let y = (row - camera.cy) / camera.fy;
    DVec3::new(x, y, 1.0)
}

/// The principal point offset of a split view branch.
///
/// The left branch moves its principal point by `-shift`, the right one by
/// `+shift`, so both views meet at the same viewing direction on the seam.
pub fn seam_principal_shift(fx: f64, yaw_left: f64, yaw_right: f64) -> f64 {
    fx * (0.5 * (yaw_left - yaw_right)).tan()
}
