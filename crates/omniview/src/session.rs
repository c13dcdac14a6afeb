use std::path::Path;

use glam::DMat3;
use serde::{Deserialize, Serialize};

use omniview_3d::{
    average_rotations,
    io::extrinsic::{read_extrinsic_txt, ExtrinsicError},
    CorrectiveRotations, RectifyError, RigidTransform,
};
use omniview_camera::{CameraError, PinholeCamera, WorldToCamera};
use omniview_image::{Image, ImageError, ImageSize};
use omniview_imgproc::reproject::{
    remap_perspective, remap_split, RemapOptions, ReprojectError, SplitBranch, SplitViewParams,
};

/// Error types for the reprojection session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The extrinsic file could not be loaded.
    #[error(transparent)]
    Extrinsic(#[from] ExtrinsicError),

    /// The corrective rotations could not be computed.
    #[error(transparent)]
    Rectify(#[from] RectifyError),

    /// The virtual camera is invalid.
    #[error(transparent)]
    Camera(#[from] CameraError),

    /// The destination image could not be allocated.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The reprojection pass failed.
    #[error(transparent)]
    Reproject(#[from] ReprojectError),
}

/// One of the two cameras of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    /// The reference camera, corrected by `R_a`.
    First,
    /// The second camera, corrected by `R_b`.
    Second,
}

impl PairSide {
    /// The corrective rotation of this side.
    pub fn rotation(&self, rotations: &CorrectiveRotations) -> DMat3 {
        match self {
            PairSide::First => rotations.first,
            PairSide::Second => rotations.second,
        }
    }
}

/// Settings of a split view rendered by [`Session::remap_seam`].
///
/// The left half uses the focal lengths of the session camera; the right half
/// uses `fx` and `fy`. Yaws are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeamConfig {
    /// Focal length in x of the right half.
    pub fx: f64,
    /// Focal length in y of the right half.
    pub fy: f64,
    /// Pan of the left half.
    pub yaw_left: f64,
    /// Pan of the right half.
    pub yaw_right: f64,
}

impl Default for SeamConfig {
    fn default() -> Self {
        Self {
            fx: 480.0,
            fy: 360.0,
            yaw_left: 20f64.to_radians(),
            yaw_right: (-60f64).to_radians(),
        }
    }
}

/// Reprojects the images of a calibrated camera pair to level perspective views.
///
/// The session keeps the relative pose of the pair together with the
/// corrective rotations derived from it, so the rotations are computed once
/// per pose rather than once per frame.
///
/// # Example
///
/// ```
/// use omniview::{PairSide, Session};
/// use omniview::camera::PinholeCamera;
/// use omniview::image::Image;
/// use omniview::k3d::RigidTransform;
///
/// let camera = PinholeCamera::new(1.0, 1.0, 0.0, 0.0).unwrap();
/// let session = Session::new(RigidTransform::IDENTITY, camera).unwrap();
///
/// let src = Image::<u8, 1>::new([2, 2].into(), vec![1, 2, 3, 4]).unwrap();
/// let dst = session
///     .remap_view(PairSide::First, &src, &camera, src.size())
///     .unwrap();
/// assert_eq!(dst, src);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    extrinsic: RigidTransform,
    rotations: CorrectiveRotations,
    camera: PinholeCamera,
    options: RemapOptions,
}

impl Session {
    /// Create a session for a pair with relative pose `extrinsic`.
    pub fn new(extrinsic: RigidTransform, camera: PinholeCamera) -> Result<Self, SessionError> {
        camera.validate()?;
        let rotations = average_rotations(&extrinsic)?;
        log::debug!("session corrective rotations: {:?}", rotations);

        Ok(Self {
            extrinsic,
            rotations,
            camera,
            options: RemapOptions::default(),
        })
    }

    /// Create a session reading the relative pose from an extrinsic file.
    pub fn from_extrinsic_file(
        path: impl AsRef<Path>,
        camera: PinholeCamera,
    ) -> Result<Self, SessionError> {
        Self::new(read_extrinsic_txt(path)?, camera)
    }

    /// Replace the relative pose and recompute the corrective rotations.
    ///
    /// On error the session keeps its previous pose.
    pub fn set_extrinsic(&mut self, extrinsic: RigidTransform) -> Result<(), SessionError> {
        self.rotations = average_rotations(&extrinsic)?;
        self.extrinsic = extrinsic;
        log::debug!("updated corrective rotations: {:?}", self.rotations);
        Ok(())
    }

    /// Replace the virtual camera.
    pub fn set_camera(&mut self, camera: PinholeCamera) -> Result<(), SessionError> {
        camera.validate()?;
        self.camera = camera;
        Ok(())
    }

    /// Replace the options of the reprojection passes.
    pub fn set_options(&mut self, options: RemapOptions) {
        self.options = options;
    }

    /// The relative pose of the pair.
    pub fn extrinsic(&self) -> &RigidTransform {
        &self.extrinsic
    }

    /// The corrective rotations of the pair.
    pub fn rotations(&self) -> &CorrectiveRotations {
        &self.rotations
    }

    /// The virtual camera.
    pub fn camera(&self) -> &PinholeCamera {
        &self.camera
    }

    /// The options of the reprojection passes.
    pub fn options(&self) -> &RemapOptions {
        &self.options
    }

    /// Reproject the image of one camera to a new image of `size`.
    pub fn remap_view<T, const C: usize, M>(
        &self,
        side: PairSide,
        src: &Image<T, C>,
        model: &M,
        size: ImageSize,
    ) -> Result<Image<T, C>, SessionError>
    where
        T: Copy + Default + Send + Sync,
        M: WorldToCamera + ?Sized,
    {
        let mut dst = Image::from_size_val(size, T::default())?;
        self.remap_view_into(side, src, model, &mut dst)?;
        Ok(dst)
    }

    /// Reproject the image of one camera into an existing image.
    pub fn remap_view_into<T, const C: usize, M>(
        &self,
        side: PairSide,
        src: &Image<T, C>,
        model: &M,
        dst: &mut Image<T, C>,
    ) -> Result<(), SessionError>
    where
        T: Copy + Default + Send + Sync,
        M: WorldToCamera + ?Sized,
    {
        let rotation = side.rotation(&self.rotations);
        remap_perspective(src, dst, model, &self.camera, &rotation, &self.options)?;
        Ok(())
    }

    /// Reproject the image of one camera to a split view of `size`.
    ///
    /// Both halves share the principal point of the session camera, which
    /// also sets the seam column, and the corrective rotation of `side`.
    pub fn remap_seam<T, const C: usize, M>(
        &self,
        side: PairSide,
        src: &Image<T, C>,
        model: &M,
        size: ImageSize,
        seam: &SeamConfig,
    ) -> Result<Image<T, C>, SessionError>
    where
        T: Copy + Default + Send + Sync,
        M: WorldToCamera + ?Sized,
    {
        let rotation = side.rotation(&self.rotations);
        log::debug!(
            "split view of the {:?} camera with right focal ({}, {})",
            side,
            seam.fx,
            seam.fy
        );
        let params = SplitViewParams {
            cx: self.camera.cx,
            cy: self.camera.cy,
            left: SplitBranch {
                fx: self.camera.fx,
                fy: self.camera.fy,
                rotation,
                yaw: seam.yaw_left,
            },
            right: SplitBranch {
                fx: seam.fx,
                fy: seam.fy,
                rotation,
                yaw: seam.yaw_right,
            },
        };

        let mut dst = Image::from_size_val(size, T::default())?;
        remap_split(src, &mut dst, model, &params, &self.options)?;
        Ok(dst)
    }
}
