use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::format::{ChannelOrder, ColorModel, Packing, PixelFormat};
use crate::image_pipeline::repack::sample::{opaque, write_sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Mono,
    Interleaved,
    Planar,
}

/// Where each reconstructed channel of pixel `i` lands in a destination buffer.
///
/// Every decoder funnels its output through this type, so channel order,
/// alpha synthesis, plane offsets and container width are handled in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationLayout {
    pub kind: LayoutKind,
    pub order: ChannelOrder,
    pub alpha: bool,
    /// Significant bits of each stored sample.
    pub bits: u32,
    pub bytes_per_sample: usize,
    pub pixel_count: usize,
}

impl DestinationLayout {
    pub fn mono(pixel_count: usize, bits: u32) -> Self {
        Self {
            kind: LayoutKind::Mono,
            order: ChannelOrder::Rgb,
            alpha: false,
            bits,
            bytes_per_sample: container_bytes(bits),
            pixel_count,
        }
    }

    pub fn interleaved(pixel_count: usize, order: ChannelOrder, alpha: bool, bits: u32) -> Self {
        Self {
            kind: LayoutKind::Interleaved,
            order,
            alpha,
            bits,
            bytes_per_sample: container_bytes(bits),
            pixel_count,
        }
    }

    pub fn planar(pixel_count: usize, alpha: bool, bits: u32) -> Self {
        Self {
            kind: LayoutKind::Planar,
            order: ChannelOrder::Rgb,
            alpha,
            bits,
            bytes_per_sample: container_bytes(bits),
            pixel_count,
        }
    }

    /// Layout of an unpacked Mono, interleaved RGB or planar RGB format.
    pub fn for_format(format: PixelFormat, pixel_count: usize) -> Result<Self> {
        let desc = format.descriptor();
        let bits = desc.bits_per_component;
        match (desc.model, desc.packing) {
            (ColorModel::Mono, Packing::Unpacked) => Ok(Self::mono(pixel_count, bits)),
            (ColorModel::Rgb, Packing::Unpacked) => Ok(Self::interleaved(
                pixel_count,
                desc.order,
                desc.has_alpha,
                bits,
            )),
            (ColorModel::Rgb, Packing::Planar) => Ok(Self::planar(pixel_count, false, bits)),
            _ => Err(ConversionError::UnsupportedFormat(format!(
                "{format} cannot be used as a destination"
            ))),
        }
    }

    pub fn is_mono(&self) -> bool {
        self.kind == LayoutKind::Mono
    }

    pub fn channels(&self) -> usize {
        match self.kind {
            LayoutKind::Mono => 1,
            _ if self.alpha => 4,
            _ => 3,
        }
    }

    pub fn required_len(&self) -> usize {
        self.pixel_count * self.channels() * self.bytes_per_sample
    }

    /// Byte offset of `channel` (0 = R, 1 = G, 2 = B, 3 = A) of pixel `index`.
    #[inline]
    fn offset(&self, index: usize, channel: usize) -> usize {
        match self.kind {
            LayoutKind::Mono => index * self.bytes_per_sample,
            LayoutKind::Interleaved => {
                let position = match (self.order, channel) {
                    (ChannelOrder::Bgr, 0) => 2,
                    (ChannelOrder::Bgr, 2) => 0,
                    (_, c) => c,
                };
                (index * self.channels() + position) * self.bytes_per_sample
            }
            LayoutKind::Planar => (channel * self.pixel_count + index) * self.bytes_per_sample,
        }
    }

    #[inline]
    pub fn put_mono(&self, dst: &mut [u8], index: usize, value: u16) {
        write_sample(dst, self.offset(index, 0), self.bytes_per_sample, value);
    }

    /// Stores a colour pixel; alpha, when present, is opaque.
    #[inline]
    pub fn put_rgb(&self, dst: &mut [u8], index: usize, rgb: [u16; 3]) {
        self.put_rgba(dst, index, [rgb[0], rgb[1], rgb[2], opaque(self.bits)]);
    }

    #[inline]
    pub fn put_rgba(&self, dst: &mut [u8], index: usize, rgba: [u16; 4]) {
        let bytes = self.bytes_per_sample;
        for channel in 0..self.channels() {
            write_sample(dst, self.offset(index, channel), bytes, rgba[channel]);
        }
    }
}

fn container_bytes(bits: u32) -> usize {
    if bits <= 8 { 1 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleaved_orders() {
        let layout = DestinationLayout::for_format(PixelFormat::Bgra8Packed, 2).unwrap();
        let mut dst = vec![0u8; layout.required_len()];
        layout.put_rgb(&mut dst, 1, [10, 20, 30]);
        assert_eq!(dst, [0, 0, 0, 0, 30, 20, 10, 0xFF]);

        let layout = DestinationLayout::for_format(PixelFormat::Rgb12Packed, 1).unwrap();
        let mut dst = vec![0u8; layout.required_len()];
        layout.put_rgb(&mut dst, 0, [0x0FFF, 0x0100, 0x0001]);
        assert_eq!(dst, [0xFF, 0x0F, 0x00, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_planar_offsets() {
        let layout = DestinationLayout::for_format(PixelFormat::Rgb8Planar, 4).unwrap();
        assert_eq!(layout.required_len(), 12);
        let mut dst = vec![0u8; 12];
        layout.put_rgb(&mut dst, 1, [1, 2, 3]);
        assert_eq!(dst, [0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0]);

        let layout = DestinationLayout::for_format(PixelFormat::Rgb16Planar, 2).unwrap();
        let mut dst = vec![0u8; layout.required_len()];
        layout.put_rgb(&mut dst, 0, [0xAAAA, 0xBBBB, 0xCCCC]);
        assert_eq!(&dst[4..6], &[0xBB, 0xBB]);
        assert_eq!(&dst[8..10], &[0xCC, 0xCC]);
    }

    #[test]
    fn test_rejects_non_destinations() {
        for format in [
            PixelFormat::Mono12Packed,
            PixelFormat::BayerRg8,
            PixelFormat::Yuv422Packed,
            PixelFormat::Rgb10V1Packed,
            PixelFormat::BiColorRgbg8,
        ] {
            assert!(DestinationLayout::for_format(format, 4).is_err());
        }
    }
}
