use glam::DMat3;
use omniview_camera::{PinholeCamera, WorldToCamera};
use omniview_image::{Image, ImageSize};

use super::{
    branch::{BranchDescriptor, ViewBranch, ViewOrientation},
    remap::reproject,
    unproject::seam_principal_shift,
    RemapOptions, ReprojectError,
};

/// One half of a split view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitBranch {
    /// The focal length in the x direction.
    pub fx: f64,
    /// The focal length in the y direction.
    pub fy: f64,
    /// The corrective rotation of the physical camera.
    pub rotation: DMat3,
    /// The pan of the half view in radians.
    pub yaw: f64,
}

/// Parameters of a split view: two panned perspective views sharing one
/// destination image, meeting at the column `cx`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitViewParams {
    /// The seam column, also the principal point column of both halves.
    pub cx: f64,
    /// The principal point row.
    pub cy: f64,
    /// The half rendered at or left of the seam.
    pub left: SplitBranch,
    /// The half rendered right of the seam.
    pub right: SplitBranch,
}

impl SplitViewParams {
    /// Split a destination image of `size` at its center.
    pub fn centered(size: ImageSize, left: SplitBranch, right: SplitBranch) -> Self {
        Self {
            cx: size.width as f64 / 2.0,
            cy: size.height as f64 / 2.0,
            left,
            right,
        }
    }

    /// The branch descriptors of the two halves.
    ///
    /// The principal points are shifted by `-+fx * tan((yaw_left - yaw_right) / 2)` so
    /// both halves look in the same direction on the seam.
    pub fn branches(&self) -> [BranchDescriptor; 2] {
        let describe = |branch: ViewBranch, half: &SplitBranch, sign: f64| BranchDescriptor {
            branch,
            camera: PinholeCamera {
                fx: half.fx,
                fy: half.fy,
                cx: self.cx,
                cy: self.cy,
            },
            principal_shift: sign * seam_principal_shift(half.fx, self.left.yaw, self.right.yaw),
            orientation: ViewOrientation::Pan {
                yaw: half.yaw,
                rotation: half.rotation,
            },
        };

        [
            describe(ViewBranch::LeftBranch, &self.left, -1.0),
            describe(ViewBranch::RightBranch, &self.right, 1.0),
        ]
    }
}

/// Reproject a fisheye image to two panned perspective views split at a seam.
///
/// Columns at or left of `params.cx` are rendered by the left half, the others
/// by the right half. Each half pans its virtual camera by its yaw and applies
/// its corrective rotation before projecting through `model`.
///
/// # Arguments
///
/// * `src` - The fisheye image.
/// * `dst` - The destination image.
/// * `model` - The omnidirectional projection of the fisheye camera.
/// * `params` - The two halves and the seam.
/// * `options` - Rounding and scheduling options.
pub fn remap_split<T, const C: usize, M>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    model: &M,
    params: &SplitViewParams,
    options: &RemapOptions,
) -> Result<(), ReprojectError>
where
    T: Copy + Default + Send + Sync,
    M: WorldToCamera + ?Sized,
{
    log::debug!(
        "split view at column {}: yaw {:.3} / {:.3} rad",
        params.cx,
        params.left.yaw,
        params.right.yaw
    );
    reproject(src, dst, model, &params.branches(), params.cx, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reproject::remap_perspective;
    use glam::{DVec2, DVec3};
    use std::f64::consts::FRAC_PI_6;

    /// Images rays looking left at (0, 0) and rays looking right at (1, 0).
    struct YawSign;

    impl WorldToCamera for YawSign {
        fn world_to_camera(&self, ray: DVec3) -> Option<DVec2> {
            if ray.x < -1e-9 {
                Some(DVec2::new(0.0, 0.0))
            } else if ray.x > 1e-9 {
                Some(DVec2::new(1.0, 0.0))
            } else {
                None
            }
        }
    }

    fn half(fx: f64, fy: f64, yaw: f64) -> SplitBranch {
        SplitBranch {
            fx,
            fy,
            rotation: DMat3::IDENTITY,
            yaw,
        }
    }

    fn yaw_of(ray: DVec3) -> f64 {
        ray.x.atan2(ray.z)
    }

    fn pattern(width: usize, height: usize) -> Image<u8, 1> {
        let data = (0..width * height).map(|i| (i % 253) as u8).collect();
        Image::new([width, height].into(), data).unwrap()
    }

    #[test]
    fn halves_meet_at_the_seam() {
        let params = SplitViewParams {
            cx: 320.0,
            cy: 240.0,
            left: half(480.0, 480.0, 20f64.to_radians()),
            right: half(300.0, 320.0, (-60f64).to_radians()),
        };
        let [left, right] = params.branches();

        let on_left = left.camera_ray(320.0, 240.0);
        let on_right = right.camera_ray(320.0, 240.0);
        assert!(on_left.normalize().abs_diff_eq(on_right.normalize(), 1e-12));

        // on the seam both look at -(yaw_left + yaw_right) / 2, here +20 degrees
        assert!((yaw_of(on_left) - 20f64.to_radians()).abs() < 1e-12);

        // the view keeps turning the same way across the seam
        assert!(yaw_of(left.camera_ray(319.0, 240.0)) < yaw_of(on_left));
        assert!(yaw_of(right.camera_ray(321.0, 240.0)) > yaw_of(on_right));
    }

    #[test]
    fn centered_split() {
        let params = SplitViewParams::centered(
            [640, 481].into(),
            half(1.0, 1.0, 0.0),
            half(2.0, 2.0, 0.0),
        );
        assert_eq!((params.cx, params.cy), (320.0, 240.5));
    }

    #[test]
    fn halves_look_apart() -> Result<(), ReprojectError> {
        let src = Image::<u8, 1>::new([2, 1].into(), vec![10, 20]).unwrap();
        let mut dst = Image::<u8, 1>::from_size_val([8, 3].into(), 0).unwrap();
        let params = SplitViewParams::centered(
            dst.size(),
            half(4.0, 4.0, FRAC_PI_6),
            half(4.0, 4.0, -FRAC_PI_6),
        );

        remap_split(&src, &mut dst, &YawSign, &params, &RemapOptions::default())?;

        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(dst.pixel(col, row), Some(&[10u8][..]));
            }
            for col in 5..8 {
                assert_eq!(dst.pixel(col, row), Some(&[20u8][..]));
            }
        }
        Ok(())
    }

    #[test]
    fn unpanned_split_is_a_single_view() -> Result<(), ReprojectError> {
        let src = pattern(40, 30);
        let model = PinholeCamera::new(10.0, 10.0, 20.0, 15.0)?;

        for rotation in [DMat3::IDENTITY, DMat3::from_rotation_y(0.25)] {
            let mut split = Image::<u8, 1>::from_size_val([24, 16].into(), 0).unwrap();
            let params = SplitViewParams::centered(
                split.size(),
                SplitBranch {
                    fx: 12.0,
                    fy: 11.0,
                    rotation,
                    yaw: 0.0,
                },
                SplitBranch {
                    fx: 12.0,
                    fy: 11.0,
                    rotation,
                    yaw: 0.0,
                },
            );
            remap_split(&src, &mut split, &model, &params, &RemapOptions::default())?;

            let mut single = Image::<u8, 1>::from_size_val([24, 16].into(), 0).unwrap();
            let camera = PinholeCamera::new(12.0, 11.0, 12.0, 8.0)?;
            remap_perspective(
                &src,
                &mut single,
                &model,
                &camera,
                &rotation,
                &RemapOptions::default(),
            )?;

            assert_eq!(split, single);
        }
        Ok(())
    }

    #[test]
    fn invalid_half_camera() {
        let src = pattern(4, 4);
        let mut dst = Image::<u8, 1>::from_size_val([4, 4].into(), 0).unwrap();
        let params = SplitViewParams::centered(
            dst.size(),
            half(1.0, 1.0, 0.0),
            half(-1.0, 1.0, 0.0),
        );
        let res = remap_split(&src, &mut dst, &YawSign, &params, &RemapOptions::default());
        assert!(matches!(res, Err(ReprojectError::InvalidCamera(_))));
    }
}
