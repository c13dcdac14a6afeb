use glam::DMat3;
use omniview_camera::{PinholeCamera, WorldToCamera};
use omniview_image::Image;

use super::{
    branch::{BranchDescriptor, PreparedBranch},
    RemapOptions, ReprojectError,
};
use crate::{interpolation::nearest_pixel, parallel};

/// Reproject a fisheye image through one or more view branches.
///
/// The destination is reset to the background value (`T::default()`) and
/// every pixel is then rendered by the first branch covering its column. A
/// pixel whose ray cannot be imaged, or whose source pixel falls outside the
/// source image, keeps the background value.
///
/// # Arguments
///
/// * `src` - The fisheye image.
/// * `dst` - The destination image; its size sets the output resolution.
/// * `model` - The omnidirectional projection of the fisheye camera.
/// * `branches` - The view branches.
/// * `split_col` - The seam column used by left / right branches.
/// * `options` - Rounding and scheduling options.
///
/// # Errors
///
/// Empty source or destination images are rejected without touching `dst`.
pub fn reproject<T, const C: usize, M>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    model: &M,
    branches: &[BranchDescriptor],
    split_col: f64,
    options: &RemapOptions,
) -> Result<(), ReprojectError>
where
    T: Copy + Default + Send + Sync,
    M: WorldToCamera + ?Sized,
{
    if src.is_empty() {
        log::error!("cannot reproject from an empty source image");
        return Err(ReprojectError::EmptySource);
    }

    if dst.is_empty() {
        log::error!("cannot reproject into an empty destination image");
        return Err(ReprojectError::EmptyDestination);
    }

    if branches.is_empty() {
        return Err(ReprojectError::NoViewBranch);
    }

    for descriptor in branches {
        descriptor.camera.validate()?;
    }

    let prepared = branches
        .iter()
        .map(PreparedBranch::from)
        .collect::<Vec<_>>();

    dst.fill(T::default());

    let rounding = options.rounding;
    parallel::par_iter_rows_indexed(dst, options.strategy, |row, col, dst_pixel| {
        let (col, row) = (col as f64, row as f64);

        let Some(branch) = prepared.iter().find(|b| b.branch.covers(col, split_col)) else {
            return;
        };

        let Some(pixel) = model.world_to_camera(branch.camera_ray(col, row)) else {
            return;
        };

        if let Some(src_pixel) = nearest_pixel(src, pixel.x, pixel.y, rounding) {
            dst_pixel.copy_from_slice(src_pixel);
        }
    })?;

    log::debug!(
        "reprojected {} into {} through {} branch(es)",
        src.size(),
        dst.size(),
        branches.len()
    );

    Ok(())
}

/// Reproject a fisheye image to a perspective view corrected by a rotation.
///
/// For each destination pixel the virtual camera ray is mapped through
/// `rotation^-1` into the fisheye camera frame, projected by `model`, and the
/// nearest source pixel is copied.
///
/// # Arguments
///
/// * `src` - The fisheye image.
/// * `dst` - The destination image.
/// * `model` - The omnidirectional projection of the fisheye camera.
/// * `camera` - The virtual pinhole camera.
/// * `rotation` - The corrective rotation of the fisheye camera.
/// * `options` - Rounding and scheduling options.
///
/// # Example
///
/// ```
/// use glam::DMat3;
/// use omniview_camera::PinholeCamera;
/// use omniview_image::Image;
/// use omniview_imgproc::reproject::{remap_perspective, RemapOptions};
///
/// let src = Image::<u8, 1>::new([2, 2].into(), vec![1, 2, 3, 4]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val([2, 2].into(), 0).unwrap();
///
/// // an identity "fisheye": the virtual camera sees the source unchanged
/// let camera = PinholeCamera::new(1.0, 1.0, 0.0, 0.0).unwrap();
/// remap_perspective(&src, &mut dst, &camera, &camera, &DMat3::IDENTITY, &RemapOptions::default())
///     .unwrap();
///
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn remap_perspective<T, const C: usize, M>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    model: &M,
    camera: &PinholeCamera,
    rotation: &DMat3,
    options: &RemapOptions,
) -> Result<(), ReprojectError>
where
    T: Copy + Default + Send + Sync,
    M: WorldToCamera + ?Sized,
{
    let branch = BranchDescriptor::single(*camera, *rotation);
    reproject(src, dst, model, &[branch], camera.cx, options)
}
