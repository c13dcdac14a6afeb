#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use omniview_lie::so3::SO3;
//!
//! // a quarter turn around the vertical axis
//! let rotation = SO3::exp(DVec3::new(0.0, std::f64::consts::FRAC_PI_2, 0.0));
//! let rotated = rotation.matrix() * DVec3::Z;
//! assert!((rotated - DVec3::X).length() < 1e-12);
//! ```

/// Special Orthogonal group SO(3) for 3D rotations.
pub mod so3;
