#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use omniview_image as image;

#[doc(inline)]
pub use omniview_imgproc as imgproc;

#[doc(inline)]
pub use omniview_io as io;

#[doc(inline)]
pub use omniview_3d as k3d;

#[doc(inline)]
pub use omniview_camera as camera;

#[doc(inline)]
pub use omniview_lie as lie;

/// Reprojection state shared by the two cameras of a pair.
pub mod session;

pub use session::{PairSide, SeamConfig, Session, SessionError};
