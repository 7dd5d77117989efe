//! Image processing pipeline module
//!
//! Pixel format conversion for machine-vision frames and an uncompressed TIFF
//! codec, with separate modules for format classification, repacking, the
//! colour reconstruction families, TIFF storage and conversion orchestration.

pub mod bicolor;
pub mod buffer;
pub mod common;
pub mod conversions;
pub mod debayer;
pub mod format;
pub mod frame;
pub mod repack;
pub mod tiff;
pub mod yuv;

pub use common::{
    ConversionError,
    LegacyTiffError,
    Result,
    TiffError,
};

pub use buffer::ImageView;

pub use format::{
    ComponentOrder,
    FormatDescriptor,
    PixelFormat,
};

pub use frame::{
    FrameSource,
    RawDumpSource,
    RawFrame,
};

pub use debayer::DemosaicAlgorithm;

pub use self::tiff::{
    ConversionConfig,
    ConversionConfigBuilder,
    StandardTiffWriter,
    TiffImage,
    TiffInfo,
    TiffWriter,
    read_tiff,
    read_tiff_legacy,
    write_tiff,
    write_tiff_legacy,
};

pub use conversions::{
    FrameToTiffPipeline,
    convert,
    demosaic,
};
