//! TIFF storage of frames described by a [`PixelFormat`]

use std::path::Path;

use tracing::debug;

use crate::image_pipeline::buffer::ImageView;
use crate::image_pipeline::common::error::TiffError;
use crate::image_pipeline::format::{ChannelOrder, ColorModel, ComponentOrder, Packing, PixelFormat};
use crate::image_pipeline::tiff::standard_tiff_reader::{read_tiff_into, tiff_info};
use crate::image_pipeline::tiff::standard_tiff_writer::write_raster;
use crate::image_pipeline::tiff::types::{TiffInfo, TiffRaster};

/// How frames of one pixel format map onto a TIFF raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiffLayout {
    pub components: usize,
    pub bits_per_component: u32,
    pub order: ComponentOrder,
    /// TIFF columns per frame pixel; bi-color pairs are stored side by side.
    pub width_factor: usize,
}

/// Derives the TIFF raster layout used to store frames of `format`.
///
/// Bit-packed, YUV and 32-bit RGB formats have no direct TIFF layout.
pub fn tiff_layout_for(format: PixelFormat) -> Result<FrameTiffLayout, TiffError> {
    let desc = format.descriptor();
    let layout = |components, order, width_factor| FrameTiffLayout {
        components,
        bits_per_component: desc.bits_per_component,
        order,
        width_factor,
    };

    match (desc.model, desc.packing) {
        (ColorModel::Mono | ColorModel::Bayer(_), Packing::Unpacked) => {
            Ok(layout(1, ComponentOrder::Normal, 1))
        }
        (ColorModel::Rgb, Packing::Unpacked) => {
            let order = match desc.order {
                ChannelOrder::Rgb => ComponentOrder::Normal,
                ChannelOrder::Bgr => ComponentOrder::Reverse,
            };
            Ok(layout(desc.components, order, 1))
        }
        (ColorModel::Rgb, Packing::Planar) => Ok(layout(3, ComponentOrder::Planar, 1)),
        (ColorModel::BiColor(_), Packing::Unpacked) => Ok(layout(1, ComponentOrder::Normal, 2)),
        _ => Err(TiffError::InvalidParameters(format!(
            "{format} frames cannot be stored as TIFF"
        ))),
    }
}

/// Writes `frame` to a TIFF file and returns the number of pixel bytes written.
pub fn write_frame_tiff<P: AsRef<Path>>(path: P, frame: &ImageView<'_>) -> Result<usize, TiffError> {
    let layout = tiff_layout_for(frame.format())?;
    debug!(format = %frame.format(), ?layout, "Storing frame as TIFF");

    let raster = TiffRaster {
        width: frame.width() * layout.width_factor,
        height: frame.height(),
        components: layout.components,
        bits_per_component: layout.bits_per_component,
        pixels: frame.data(),
    };
    write_raster(path.as_ref(), &raster, layout.order)
}

/// Reads a TIFF file into `dst`, laid out as frames of `format`.
///
/// 16-bit samples are shifted down so they occupy the format's depth. Planar,
/// packed and YUV targets are rejected, as are files whose component count or
/// sample size do not match the format.
pub fn read_frame_tiff<P: AsRef<Path>>(
    path: P,
    format: PixelFormat,
    dst: &mut [u8],
) -> Result<TiffInfo, TiffError> {
    let path = path.as_ref();
    let layout = tiff_layout_for(format)?;
    if layout.order == ComponentOrder::Planar {
        return Err(TiffError::InvalidParameters(format!(
            "cannot read TIFF files into planar {format}"
        )));
    }

    let desc = format.descriptor();
    let info = tiff_info(path)?;
    let sample_bits = if desc.bytes_per_sample() == 1 { 8 } else { 16 };
    if info.components != layout.components || info.decoded_bits() != sample_bits {
        return Err(TiffError::InvalidParameters(format!(
            "{}-component {}-bit file does not match {format}",
            info.components,
            info.decoded_bits()
        )));
    }

    let info = read_tiff_into(path, layout.order, dst)?;

    let shift = sample_bits - desc.bits_per_component;
    if sample_bits == 16 && shift > 0 {
        for word in dst[..info.decoded_len()].chunks_exact_mut(2) {
            let value = u16::from_le_bytes([word[0], word[1]]) >> shift;
            word.copy_from_slice(&value.to_le_bytes());
        }
    }
    Ok(info)
}
