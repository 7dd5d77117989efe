//! Pipeline conversions module
//!
//! Format conversion dispatch and the frame to TIFF orchestration built on it.

mod convert;
mod frame_to_tiff;

#[cfg(test)]
mod tests;

pub use convert::{convert, convert_with_config, demosaic};
pub use frame_to_tiff::{storage_format, FrameToTiffPipeline};
