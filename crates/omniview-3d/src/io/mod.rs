/// Plain text extrinsic reader module.
pub mod extrinsic;
