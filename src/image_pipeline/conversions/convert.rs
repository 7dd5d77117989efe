//! Conversion dispatch
//!
//! Every request is classified into one algorithm family (copy, repack, YUV
//! decode, demosaic, bi-color decode) and checked completely before the
//! destination is touched: dimensions, routing, destination size, source size.

use tracing::debug;

use crate::image_pipeline::bicolor::{decode_bicolor, BiColorSamples};
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::{run_demosaic, BayerMosaic, BayerSamples};
use crate::image_pipeline::format::{
    BiColorPattern, CfaAlignment, ChromaSubsampling, ColorModel, FormatDescriptor, Packing,
    PixelFormat,
};
use crate::image_pipeline::repack::{repack_pixels, unpack_to_vec, DestinationLayout, PixelSource};
use crate::image_pipeline::tiff::ConversionConfig;
use crate::image_pipeline::yuv::decode_yuv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Copy,
    Repack(DestinationLayout),
    Yuv(ChromaSubsampling, DestinationLayout),
    Demosaic(CfaAlignment, DestinationLayout),
    BiColor(BiColorPattern, DestinationLayout),
}

/// Converts a `width` x `height` frame of `src_format` into `dst_format`.
///
/// `src_depth_bits` is the number of significant bits per source sample; 0 uses
/// the nominal depth of `src_format`. Bayer sources are demosaiced when the
/// destination is a colour format.
pub fn convert(
    width: usize,
    height: usize,
    src_format: PixelFormat,
    src_depth_bits: u32,
    src: &[u8],
    dst_format: PixelFormat,
    dst: &mut [u8],
) -> Result<()> {
    convert_with_config(
        &ConversionConfig::default(),
        width,
        height,
        src_format,
        src_depth_bits,
        src,
        dst_format,
        dst,
    )
}

/// [`convert`] with an explicit demosaic algorithm and Bayer policy.
#[allow(clippy::too_many_arguments)]
pub fn convert_with_config(
    config: &ConversionConfig,
    width: usize,
    height: usize,
    src_format: PixelFormat,
    src_depth_bits: u32,
    src: &[u8],
    dst_format: PixelFormat,
    dst: &mut [u8],
) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ConversionError::InvalidDimensions(width, height));
    }
    let pixel_count = width
        .checked_mul(height)
        .ok_or(ConversionError::InvalidDimensions(width, height))?;

    let src_desc = src_format.descriptor();
    let src_bits = source_bits(src_format, &src_desc, src_depth_bits)?;
    let route = plan(config, src_format, &src_desc, src_bits, dst_format, pixel_count)?;

    let dst_len = dst_format.descriptor().frame_len(width, height)?;
    if dst.len() < dst_len {
        return Err(ConversionError::BufferTooSmall {
            required: dst_len,
            actual: dst.len(),
        });
    }
    let src_len = src_desc.frame_len(width, height)?;
    if src.len() < src_len {
        return Err(ConversionError::SourceTooSmall {
            required: src_len,
            actual: src.len(),
        });
    }

    debug!(
        width,
        height,
        src = %src_format,
        dst = %dst_format,
        src_bits,
        ?route,
        "Converting frame"
    );

    let src = &src[..src_len];
    let dst = &mut dst[..dst_len];
    match route {
        Route::Copy => {
            dst.copy_from_slice(src);
            Ok(())
        }
        Route::Repack(layout) => {
            let source = PixelSource::new(src_format, &src_desc, src, pixel_count, src_bits)?;
            repack_pixels(&source, &layout, dst)
        }
        Route::Yuv(subsampling, layout) => decode_yuv(subsampling, src, &layout, dst),
        Route::Demosaic(alignment, layout) => {
            let scratch;
            let samples = if src_desc.packing == Packing::Packed {
                scratch = unpack_to_vec(src, pixel_count, src_desc.bits_per_component)?;
                BayerSamples::Native(&scratch)
            } else if src_desc.bytes_per_sample() == 1 {
                BayerSamples::U8(src)
            } else {
                BayerSamples::U16Le(src)
            };
            let mosaic = BayerMosaic {
                width,
                height,
                bits: src_bits,
                alignment,
                samples,
            };
            run_demosaic(config.demosaic_algorithm, &mosaic, &layout, dst)
        }
        Route::BiColor(pattern, layout) => {
            let samples = if src_desc.bytes_per_sample() == 1 {
                BiColorSamples::U8(src)
            } else {
                BiColorSamples::U16(src)
            };
            decode_bicolor(samples, width, height, pattern, src_bits - layout.bits, &layout, dst)
        }
    }
}

/// Reconstructs RGB from a Bayer mosaic of `cfa_format`.
///
/// Destinations are limited to 8-bit RGB/BGR/RGBA/BGRA, 10/12-bit RGB/BGR and
/// planar RGB.
pub fn demosaic(
    width: usize,
    height: usize,
    cfa_format: PixelFormat,
    src: &[u8],
    dst_format: PixelFormat,
    dst: &mut [u8],
) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ConversionError::InvalidDimensions(width, height));
    }
    if !cfa_format.is_bayer() {
        return Err(ConversionError::InvalidParameters(format!(
            "{cfa_format} is not a Bayer format"
        )));
    }
    if !is_demosaic_destination(dst_format) {
        return Err(ConversionError::InvalidParameters(format!(
            "{dst_format} is not a demosaic destination"
        )));
    }
    let config = ConversionConfig::default();
    convert_with_config(&config, width, height, cfa_format, 0, src, dst_format, dst)
}

fn is_demosaic_destination(format: PixelFormat) -> bool {
    matches!(
        format,
        PixelFormat::Rgb8Packed
            | PixelFormat::Bgr8Packed
            | PixelFormat::Rgba8Packed
            | PixelFormat::Bgra8Packed
            | PixelFormat::Rgb10Packed
            | PixelFormat::Bgr10Packed
            | PixelFormat::Rgb12Packed
            | PixelFormat::Bgr12Packed
            | PixelFormat::Rgb8Planar
            | PixelFormat::Rgb10Planar
            | PixelFormat::Rgb12Planar
            | PixelFormat::Rgb16Planar
    )
}

fn source_bits(format: PixelFormat, desc: &FormatDescriptor, requested: u32) -> Result<u32> {
    let nominal = desc.bits_per_component;
    if requested == 0 {
        return Ok(nominal);
    }

    let container = match desc.packing {
        Packing::Packed => nominal,
        _ => desc.bytes_per_sample() as u32 * 8,
    };
    let valid = matches!(requested, 8 | 10 | 12 | 14 | 16)
        && requested <= container
        && (desc.packing != Packing::Packed || requested == nominal)
        && (!matches!(desc.model, ColorModel::Yuv(_)) || requested == nominal);
    if !valid {
        return Err(ConversionError::InvalidParameters(format!(
            "{requested}-bit samples do not fit {format}"
        )));
    }
    Ok(requested)
}

fn plan(
    config: &ConversionConfig,
    src_format: PixelFormat,
    src_desc: &FormatDescriptor,
    src_bits: u32,
    dst_format: PixelFormat,
    pixel_count: usize,
) -> Result<Route> {
    if src_format == dst_format && src_bits == src_desc.bits_per_component {
        return Ok(Route::Copy);
    }

    let dst_model = dst_format.descriptor().model;
    let route = match src_desc.model {
        ColorModel::Bayer(alignment) if config.convert_bayer && dst_model == ColorModel::Rgb => {
            if !is_demosaic_destination(dst_format) {
                return Err(ConversionError::InvalidParameters(format!(
                    "{dst_format} is not a demosaic destination"
                )));
            }
            Route::Demosaic(alignment, DestinationLayout::for_format(dst_format, pixel_count)?)
        }
        ColorModel::Yuv(subsampling) => Route::Yuv(
            subsampling,
            DestinationLayout::for_format(dst_format, pixel_count)?,
        ),
        ColorModel::BiColor(pattern) => {
            if src_desc.packing == Packing::Packed {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "{src_format} must be unpacked before decoding"
                )));
            }
            let layout = DestinationLayout::for_format(dst_format, pixel_count)?;
            if layout.is_mono() || layout.bits > src_bits {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "{src_format} cannot be decoded into {dst_format}"
                )));
            }
            Route::BiColor(pattern, layout)
        }
        ColorModel::Mono | ColorModel::Bayer(_) | ColorModel::Rgb => {
            let layout = DestinationLayout::for_format(dst_format, pixel_count)?;
            if layout.is_mono() && src_desc.model == ColorModel::Rgb {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "{src_format} to {dst_format}: colour to monochrome is not provided"
                )));
            }
            Route::Repack(layout)
        }
    };
    Ok(route)
}
