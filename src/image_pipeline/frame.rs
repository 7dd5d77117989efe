//! Acquisition boundary
//!
//! Frames arrive as `(width, height, format, bytes)`; a [`FrameSource`] turns
//! whatever the device layer hands over into a validated [`RawFrame`].

mod raw_dump_source;
mod source;
pub mod types;

pub use raw_dump_source::RawDumpSource;
pub use source::FrameSource;
pub use types::RawFrame;
