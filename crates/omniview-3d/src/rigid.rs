use glam::{DMat3, DVec3};

/// A rigid body transform between two camera frames.
///
/// Maps a point `p` expressed in the source frame to `rotation * p + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// The 3x3 rotation block.
    pub rotation: DMat3,
    /// The translation vector.
    pub translation: DVec3,
}

impl RigidTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: DMat3::IDENTITY,
        translation: DVec3::ZERO,
    };

    /// Create a transform from its rotation and translation.
    pub fn new(rotation: DMat3, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Create a transform from a row-major 4x4 homogeneous matrix.
    ///
    /// The top-left 3x3 block is the rotation and the first three entries of the
    /// last column are the translation. The last row is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use glam::DVec3;
    /// use omniview_3d::RigidTransform;
    ///
    /// let transform = RigidTransform::from_row_major(&[
    ///     1.0, 0.0, 0.0, 0.5,
    ///     0.0, 1.0, 0.0, 0.0,
    ///     0.0, 0.0, 1.0, -2.0,
    ///     0.0, 0.0, 0.0, 1.0,
    /// ]);
    /// assert_eq!(transform.translation, DVec3::new(0.5, 0.0, -2.0));
    /// ```
    pub fn from_row_major(m: &[f64; 16]) -> Self {
        let rotation = DMat3::from_cols(
            DVec3::new(m[0], m[4], m[8]),
            DVec3::new(m[1], m[5], m[9]),
            DVec3::new(m[2], m[6], m[10]),
        );
        let translation = DVec3::new(m[3], m[7], m[11]);
        Self::new(rotation, translation)
    }

    /// Whether the rotation block is orthonormal with determinant +1.
    pub fn is_rotation(&self, tolerance: f64) -> bool {
        is_rotation_matrix(&self.rotation, tolerance)
    }
}

/// Check that `m` is orthonormal with determinant +1, within `tolerance`.
pub fn is_rotation_matrix(m: &DMat3, tolerance: f64) -> bool {
    m.is_finite()
        && (m.transpose() * *m).abs_diff_eq(DMat3::IDENTITY, tolerance)
        && (m.determinant() - 1.0).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_row_major_layout() {
        let transform = RigidTransform::from_row_major(&[
            0.0, -1.0, 0.0, 1.0, //
            1.0, 0.0, 0.0, 2.0, //
            0.0, 0.0, 1.0, 3.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        assert_eq!(transform.translation, DVec3::new(1.0, 2.0, 3.0));
        // row 0 is (0, -1, 0): x maps to y
        assert_eq!(transform.rotation * DVec3::X, DVec3::Y);
        assert!(transform.is_rotation(1e-12));
    }

    #[test]
    fn rejects_non_rotations() {
        let scaled = RigidTransform::new(DMat3::from_diagonal(DVec3::splat(2.0)), DVec3::ZERO);
        assert!(!scaled.is_rotation(1e-6));

        let reflection =
            RigidTransform::new(DMat3::from_diagonal(DVec3::new(1.0, 1.0, -1.0)), DVec3::ZERO);
        assert!(!reflection.is_rotation(1e-6));

        assert!(RigidTransform::IDENTITY.is_rotation(0.0));
    }
}
