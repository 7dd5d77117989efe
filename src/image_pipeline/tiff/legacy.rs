//! Narrow TIFF entry points kept for older callers.
//!
//! Monochrome images report `depth` as bytes per sample; colour images report it
//! as the number of 8-bit components (3 or 4). Failures collapse into
//! [`LegacyTiffError`].

use std::path::Path;

use tracing::debug;

use crate::image_pipeline::common::error::{LegacyTiffError, TiffError};
use crate::image_pipeline::format::ComponentOrder;
use crate::image_pipeline::tiff::standard_tiff_reader::{read_tiff_into, tiff_info};
use crate::image_pipeline::tiff::standard_tiff_writer::write_raster;
use crate::image_pipeline::tiff::types::TiffRaster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyTiffInfo {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub color: bool,
}

fn legacy_error(err: TiffError, unsupported: LegacyTiffError) -> LegacyTiffError {
    debug!(error = %err, code = unsupported.code(), "Legacy TIFF call failed");
    match err {
        TiffError::FileAccess { .. } => LegacyTiffError::FileNotFound,
        TiffError::NullArgument(_)
        | TiffError::BufferTooSmall { .. }
        | TiffError::InvalidParameters(_) => LegacyTiffError::BadParameter,
        TiffError::WriteFailed { .. } | TiffError::ReadFailed { .. } | TiffError::MalformedFile(_) => {
            unsupported
        }
    }
}

/// Reads an 8-bit RGB/RGBA or an 8/16-bit monochrome TIFF file into `dst`.
pub fn read_tiff_legacy<P: AsRef<Path>>(
    path: P,
    dst: &mut [u8],
) -> Result<LegacyTiffInfo, LegacyTiffError> {
    let path = path.as_ref();
    let unsupported = LegacyTiffError::UnsupportedRead;

    let info = tiff_info(path).map_err(|e| legacy_error(e, unsupported))?;
    let color = info.components > 1;
    if color && info.decoded_bits() != 8 {
        return Err(unsupported);
    }

    let info = read_tiff_into(path, ComponentOrder::Normal, dst)
        .map_err(|e| legacy_error(e, unsupported))?;
    let depth = if color {
        info.components
    } else {
        (info.decoded_bits() as usize).div_ceil(8)
    };
    Ok(LegacyTiffInfo {
        width: info.width,
        height: info.height,
        depth,
        color,
    })
}

/// Writes monochrome (`depth` 1 or 2 bytes per sample) or 8-bit colour
/// (`depth` 3 or 4 components) pixels, returning the pixel bytes written.
pub fn write_tiff_legacy<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
    depth: usize,
    color: bool,
    pixels: &[u8],
) -> Result<usize, LegacyTiffError> {
    let (components, bits) = match (color, depth) {
        (false, 1) => (1, 8),
        (false, 2) => (1, 16),
        (true, 3 | 4) => (depth, 8),
        _ => return Err(LegacyTiffError::UnsupportedWrite),
    };

    let raster = TiffRaster {
        width,
        height,
        components,
        bits_per_component: bits,
        pixels,
    };
    write_raster(path.as_ref(), &raster, ComponentOrder::Normal)
        .map_err(|e| legacy_error(e, LegacyTiffError::UnsupportedWrite))
}
