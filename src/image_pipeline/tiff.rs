//! TIFF raster codec
//!
//! Uncompressed, contiguous TIFF reading and writing of 1, 3 and 4 component
//! rasters at 8 or 16 bits, plus frame-aware helpers and the legacy entry points.

mod frame_tiff;
mod legacy;
mod standard_tiff_reader;
mod standard_tiff_writer;
pub mod types;
mod writer;

pub use frame_tiff::{read_frame_tiff, tiff_layout_for, write_frame_tiff, FrameTiffLayout};
pub use legacy::{read_tiff_legacy, write_tiff_legacy, LegacyTiffInfo};
pub use standard_tiff_reader::{read_tiff, read_tiff_into, read_tiff_ordered, tiff_info};
pub use standard_tiff_writer::{encode_tiff, write_raster, write_tiff, StandardTiffWriter};
pub use types::{
    ConversionConfig, ConversionConfigBuilder, FileByteOrder, Photometric, TiffImage, TiffInfo,
    TiffRaster,
};
pub use writer::TiffWriter;
