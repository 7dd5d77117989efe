//! Generic Mono/RGB repacking: decode one source pixel, rescale, store it through
//! a [`DestinationLayout`].

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::format::{ChannelOrder, ColorModel, FormatDescriptor, Packing, PixelFormat};
use crate::image_pipeline::repack::layout::DestinationLayout;
use crate::image_pipeline::repack::sample::{opaque, read_sample, rescale};
use crate::image_pipeline::repack::unpack::packed_sample;

/// Pixel accessor over a Mono or RGB source buffer.
#[derive(Debug, Clone, Copy)]
pub enum PixelSource<'a> {
    Mono {
        data: &'a [u8],
        bits: u32,
        bytes: usize,
    },
    MonoPacked {
        data: &'a [u8],
        bits: u32,
    },
    Interleaved {
        data: &'a [u8],
        bits: u32,
        bytes: usize,
        order: ChannelOrder,
        alpha: bool,
    },
    /// 4 bytes per pixel: low bits of R, G, B in bits 0..5 of the first byte,
    /// then the high bytes of R, G, B.
    Rgb10V1 { data: &'a [u8] },
    /// 10-bit R, G, B in bits 0..9, 10..19, 20..29 of a little-endian word.
    Rgb10V2 { data: &'a [u8] },
    Planar {
        data: &'a [u8],
        bits: u32,
        bytes: usize,
        pixel_count: usize,
    },
}

impl<'a> PixelSource<'a> {
    /// `bits` is the number of significant bits per sample, which may be lower
    /// than the format's nominal depth for sensors that do not fill the container.
    pub fn new(
        format: PixelFormat,
        desc: &FormatDescriptor,
        data: &'a [u8],
        pixel_count: usize,
        bits: u32,
    ) -> Result<Self> {
        let bytes = desc.bytes_per_sample();
        let source = match (desc.model, desc.packing) {
            (ColorModel::Mono | ColorModel::Bayer(_), Packing::Packed) => {
                PixelSource::MonoPacked { data, bits }
            }
            (ColorModel::Mono | ColorModel::Bayer(_), _) => PixelSource::Mono { data, bits, bytes },
            (ColorModel::Rgb, Packing::Unpacked) => PixelSource::Interleaved {
                data,
                bits,
                bytes,
                order: desc.order,
                alpha: desc.has_alpha,
            },
            (ColorModel::Rgb, Packing::Planar) => PixelSource::Planar {
                data,
                bits,
                bytes,
                pixel_count,
            },
            (ColorModel::Rgb, Packing::Packed) if format == PixelFormat::Rgb10V1Packed => {
                PixelSource::Rgb10V1 { data }
            }
            (ColorModel::Rgb, Packing::Packed) => PixelSource::Rgb10V2 { data },
            _ => {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "{format} is not a Mono or RGB source"
                )));
            }
        };
        Ok(source)
    }

    pub fn bits(&self) -> u32 {
        match *self {
            PixelSource::Mono { bits, .. }
            | PixelSource::MonoPacked { bits, .. }
            | PixelSource::Interleaved { bits, .. }
            | PixelSource::Planar { bits, .. } => bits,
            PixelSource::Rgb10V1 { .. } | PixelSource::Rgb10V2 { .. } => 10,
        }
    }

    pub fn is_mono(&self) -> bool {
        matches!(self, PixelSource::Mono { .. } | PixelSource::MonoPacked { .. })
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelSource::Interleaved { alpha: true, .. })
    }

    /// Grey value of a monochrome pixel.
    #[inline]
    pub fn mono(&self, index: usize) -> u16 {
        match *self {
            PixelSource::Mono { data, bytes, .. } => read_sample(data, index, bytes),
            PixelSource::MonoPacked { data, bits } => packed_sample(data, index, bits),
            _ => self.rgba(index)[1],
        }
    }

    /// R, G, B, A of pixel `index`; A is opaque when the source has no alpha.
    #[inline]
    pub fn rgba(&self, index: usize) -> [u16; 4] {
        let max = opaque(self.bits());
        match *self {
            PixelSource::Mono { .. } | PixelSource::MonoPacked { .. } => {
                let v = self.mono(index);
                [v, v, v, max]
            }
            PixelSource::Interleaved {
                data,
                bytes,
                order,
                alpha,
                ..
            } => {
                let channels = if alpha { 4 } else { 3 };
                let base = index * channels;
                let first = read_sample(data, base, bytes);
                let green = read_sample(data, base + 1, bytes);
                let last = read_sample(data, base + 2, bytes);
                let a = if alpha { read_sample(data, base + 3, bytes) } else { max };
                match order {
                    ChannelOrder::Rgb => [first, green, last, a],
                    ChannelOrder::Bgr => [last, green, first, a],
                }
            }
            PixelSource::Rgb10V1 { data } => {
                let px = &data[index * 4..index * 4 + 4];
                let low = px[0] as u16;
                [
                    ((px[1] as u16) << 2) | (low & 0x3),
                    ((px[2] as u16) << 2) | ((low >> 2) & 0x3),
                    ((px[3] as u16) << 2) | ((low >> 4) & 0x3),
                    max,
                ]
            }
            PixelSource::Rgb10V2 { data } => {
                let px = &data[index * 4..index * 4 + 4];
                let word = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
                [
                    (word & 0x3FF) as u16,
                    ((word >> 10) & 0x3FF) as u16,
                    ((word >> 20) & 0x3FF) as u16,
                    max,
                ]
            }
            PixelSource::Planar {
                data,
                bytes,
                pixel_count,
                ..
            } => [
                read_sample(data, index, bytes),
                read_sample(data, pixel_count + index, bytes),
                read_sample(data, 2 * pixel_count + index, bytes),
                max,
            ],
        }
    }
}

/// Copies every pixel of `source` into `dst`, rescaling from the source depth to
/// the layout depth. Colour sources cannot be written to a Mono layout.
pub fn repack_pixels(
    source: &PixelSource<'_>,
    layout: &DestinationLayout,
    dst: &mut [u8],
) -> Result<()> {
    if layout.is_mono() && !source.is_mono() {
        return Err(ConversionError::UnsupportedFormat(
            "colour to monochrome conversion".to_string(),
        ));
    }

    let from = source.bits();
    let to = layout.bits;
    debug!(from, to, pixels = layout.pixel_count, "Repacking pixels");

    if layout.is_mono() {
        for index in 0..layout.pixel_count {
            layout.put_mono(dst, index, rescale(source.mono(index), from, to));
        }
        return Ok(());
    }

    let alpha_max = opaque(to);
    let keep_alpha = source.has_alpha();
    for index in 0..layout.pixel_count {
        let [r, g, b, a] = source.rgba(index);
        let a = if keep_alpha { rescale(a, from, to) } else { alpha_max };
        layout.put_rgba(
            dst,
            index,
            [rescale(r, from, to), rescale(g, from, to), rescale(b, from, to), a],
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(format: PixelFormat, data: &[u8], pixels: usize) -> PixelSource<'_> {
        let desc = format.descriptor();
        PixelSource::new(format, &desc, data, pixels, desc.bits_per_component).unwrap()
    }

    #[test]
    fn test_mono12_to_mono8_truncates() {
        let data = 0x0ABCu16.to_le_bytes();
        let src = source(PixelFormat::Mono12, &data, 1);
        let layout = DestinationLayout::for_format(PixelFormat::Mono8, 1).unwrap();
        let mut dst = [0u8; 1];
        repack_pixels(&src, &layout, &mut dst).unwrap();
        assert_eq!(dst[0], (0x0ABC >> 4) as u8);
    }

    #[test]
    fn test_mono_to_bgra_replicates_grey() {
        let data = [0x40u8, 0x80];
        let src = source(PixelFormat::Mono8, &data, 2);
        let layout = DestinationLayout::for_format(PixelFormat::Bgra8Packed, 2).unwrap();
        let mut dst = [0u8; 8];
        repack_pixels(&src, &layout, &mut dst).unwrap();
        assert_eq!(dst, [0x40, 0x40, 0x40, 0xFF, 0x80, 0x80, 0x80, 0xFF]);
    }

    #[test]
    fn test_bgr12_to_rgb8() {
        let mut data = Vec::new();
        for v in [0x0100u16, 0x0200, 0x0300] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let src = source(PixelFormat::Bgr12Packed, &data, 1);
        let layout = DestinationLayout::for_format(PixelFormat::Rgb8Packed, 1).unwrap();
        let mut dst = [0u8; 3];
        repack_pixels(&src, &layout, &mut dst).unwrap();
        assert_eq!(dst, [0x30, 0x20, 0x10]);
    }

    #[test]
    fn test_rgb10_v1_and_v2() {
        // R = 0x3FF, G = 0x201, B = 0x002
        let v1 = [0b0010_0111, 0xFF, 0x80, 0x00];
        let src = source(PixelFormat::Rgb10V1Packed, &v1, 1);
        assert_eq!(src.rgba(0), [0x3FF, 0x201, 0x002, 0x3FF]);

        let word: u32 = 0x3FF | (0x201 << 10) | (0x002 << 20);
        let v2 = word.to_le_bytes();
        let src = source(PixelFormat::Rgb10V2Packed, &v2, 1);
        assert_eq!(src.rgba(0), [0x3FF, 0x201, 0x002, 0x3FF]);

        let layout = DestinationLayout::for_format(PixelFormat::Rgb8Packed, 1).unwrap();
        let mut dst = [0u8; 3];
        repack_pixels(&src, &layout, &mut dst).unwrap();
        assert_eq!(dst, [0xFF, 0x80, 0x00]);
    }

    #[test]
    fn test_planar_to_interleaved_and_widen() {
        let data = [1u8, 2, 10, 20, 100, 200];
        let src = source(PixelFormat::Rgb8Planar, &data, 2);
        let layout = DestinationLayout::for_format(PixelFormat::Rgb16Packed, 2).unwrap();
        let mut dst = [0u8; 12];
        repack_pixels(&src, &layout, &mut dst).unwrap();
        assert_eq!(&dst[..6], &[0x00, 0x01, 0x00, 0x0A, 0x00, 0x64]);
    }

    #[test]
    fn test_colour_to_mono_rejected() {
        let data = [0u8; 3];
        let src = source(PixelFormat::Rgb8Packed, &data, 1);
        let layout = DestinationLayout::for_format(PixelFormat::Mono8, 1).unwrap();
        let mut dst = [0u8; 1];
        assert!(matches!(
            repack_pixels(&src, &layout, &mut dst),
            Err(ConversionError::UnsupportedFormat(_))
        ));
    }
}
