//! Pixel format module
//!
//! Maps GigE Vision format identifiers onto [`PixelFormat`] and classifies each
//! format into component count, depth, packing and colour model.

mod descriptor;
mod pixel_format;
pub mod types;

pub use descriptor::{describe, FormatDescriptor};
pub use pixel_format::PixelFormat;
pub use types::{
    BiColorPattern, CfaAlignment, ChannelOrder, ChromaSubsampling, ColorModel, ComponentOrder,
    Packing,
};
