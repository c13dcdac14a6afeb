use glam::{DMat3, DVec3};
use omniview_lie::so3::SO3;

use crate::rigid::RigidTransform;

/// Relative rotations whose angle is closer than this to a half turn are rejected.
///
/// At exactly pi the rotation axis of the average is ambiguous.
pub const HALF_TURN_TOLERANCE: f64 = 1e-6;

/// Tolerance used to reject rotation blocks that are far from a rotation.
///
/// Extrinsics printed with a few decimals miss orthonormality by about the
/// rounding step; such blocks are projected onto SO(3) instead.
pub const ROTATION_TOLERANCE: f64 = 1e-3;

/// Error types for orientation averaging.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RectifyError {
    /// The rotation block is not orthonormal with determinant +1.
    #[error("relative rotation is not a proper rotation matrix")]
    NotARotation,

    /// The relative rotation is (almost) a half turn.
    #[error("relative rotation angle {angle} rad is too close to a half turn to average")]
    NearHalfTurn {
        /// The rotation angle in radians.
        angle: f64,
    },
}

/// The pair of rotations bringing two cameras to a shared, level orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectiveRotations {
    /// Correction for the first (reference) camera, `R_a`.
    pub first: DMat3,
    /// Correction for the second camera, `R_b`.
    pub second: DMat3,
}

impl CorrectiveRotations {
    /// Both corrections are the identity.
    pub const IDENTITY: Self = Self {
        first: DMat3::IDENTITY,
        second: DMat3::IDENTITY,
    };

    /// Compute the corrections for the pose of a second camera relative to a first.
    ///
    /// See [`average_rotations`].
    pub fn from_transform(transform: &RigidTransform) -> Result<Self, RectifyError> {
        average_rotations(transform)
    }
}

/// Compute two corrective rotations from the relative pose of a camera pair.
///
/// Both cameras are rotated half way towards each other (the logarithmic
/// average of their orientations) and then rotated together so that the
/// baseline lies along the x axis. Applying `first` to the rays of the first
/// camera and `second` to the rays of the second one yields two virtual
/// cameras with parallel, level optical axes.
///
/// # Arguments
///
/// * `transform` - The pose of the second camera relative to the first.
///
/// # Errors
///
/// * [`RectifyError::NotARotation`] if the rotation block is further than
///   [`ROTATION_TOLERANCE`] from a proper rotation. Closer blocks are projected
///   onto the nearest rotation.
/// * [`RectifyError::NearHalfTurn`] if the relative rotation is too close to pi.
///
/// # Example
///
/// ```
/// use glam::{DMat3, DVec3};
/// use omniview_3d::{average_rotations, RigidTransform};
///
/// let transform = RigidTransform::new(DMat3::IDENTITY, DVec3::ZERO);
/// let rotations = average_rotations(&transform).unwrap();
/// assert_eq!(rotations.first, DMat3::IDENTITY);
/// assert_eq!(rotations.second, DMat3::IDENTITY);
/// ```
pub fn average_rotations(transform: &RigidTransform) -> Result<CorrectiveRotations, RectifyError> {
    if !transform.is_rotation(ROTATION_TOLERANCE) {
        return Err(RectifyError::NotARotation);
    }

    // project the block onto the closest rotation before averaging
    let rvec = SO3::from_matrix(&transform.rotation).log();
    let angle = rvec.length();
    if std::f64::consts::PI - angle < HALF_TURN_TOLERANCE {
        return Err(RectifyError::NearHalfTurn { angle });
    }

    // rotate both cameras to the same orientation by averaging
    let half = SO3::exp(-0.5 * rvec).matrix();

    let t = half * transform.translation;
    let uu = DVec3::new(if t.x > 0.0 { 1.0 } else { -1.0 }, 0.0, 0.0);

    // level the baseline with the x axis
    let ww = t.cross(uu);
    let nw = ww.length();
    let (level, level_angle) = if nw > 0.0 {
        let level_angle = (t.x.abs() / t.length()).clamp(0.0, 1.0).acos();
        (SO3::exp(ww * (level_angle / nw)).matrix(), level_angle)
    } else {
        (DMat3::IDENTITY, 0.0)
    };

    log::debug!(
        "averaged relative rotation of {:.6} rad, leveling by {:.6} rad",
        angle,
        level_angle
    );

    Ok(CorrectiveRotations {
        first: level * half.transpose(),
        second: level * half,
    })
}
