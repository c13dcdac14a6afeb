use glam::{DMat3, DQuat, DVec3};

/// A 3D rotation stored as a unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SO3 {
    /// The unit quaternion representing the rotation.
    pub q: DQuat,
}

impl SO3 {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        q: DQuat::IDENTITY,
    };

    /// Create a rotation from a quaternion, normalizing it.
    pub fn from_quaternion(quat: &DQuat) -> Self {
        Self {
            q: quat.normalize(),
        }
    }

    /// Create a rotation from a 3x3 rotation matrix.
    ///
    /// The matrix is assumed to be orthonormal with determinant +1.
    pub fn from_matrix(mat: &DMat3) -> Self {
        Self::from_quaternion(&DQuat::from_mat3(mat))
    }

    /// The rotation as a 3x3 matrix.
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_quat(self.q)
    }

    /// Lie algebra -> Lie group
    ///
    /// Maps an axis-angle vector (axis scaled by the angle in radians) to a rotation.
    pub fn exp(v: DVec3) -> Self {
        let theta = v.length();
        let theta_half = 0.5 * theta;

        let (w, b) = if theta > f64::EPSILON {
            (theta_half.cos(), theta_half.sin() / theta)
        } else {
            (1.0, 0.5)
        };
        let xyz = b * v;

        Self {
            q: DQuat::from_xyzw(xyz.x, xyz.y, xyz.z, w).normalize(),
        }
    }

    /// Lie group -> Lie algebra
    ///
    /// Returns the axis-angle vector with an angle in `[0, pi]`.
    pub fn log(&self) -> DVec3 {
        // q and -q encode the same rotation, keep the short way around
        let q = if self.q.w < 0.0 { -self.q } else { self.q };
        let vec = DVec3::new(q.x, q.y, q.z);

        let n = vec.length();
        if n > f64::EPSILON {
            vec * (2.0 * n.atan2(q.w) / n)
        } else {
            vec * (2.0 / q.w)
        }
    }
}
