//! Classification of pixel formats into layout properties

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::format::pixel_format::PixelFormat;
use crate::image_pipeline::format::types::{
    BiColorPattern, CfaAlignment, ChannelOrder, ChromaSubsampling, ColorModel, Packing,
};

/// Layout properties of a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Logical components per pixel: 1 for Mono and Bayer, 2 for bi-color,
    /// 3 for RGB and YUV, 4 with alpha.
    pub components: usize,
    pub bits_per_component: u32,
    pub packing: Packing,
    pub model: ColorModel,
    pub order: ChannelOrder,
    pub has_alpha: bool,
}

impl FormatDescriptor {
    const fn new(components: usize, bits: u32, packing: Packing, model: ColorModel) -> Self {
        Self {
            components,
            bits_per_component: bits,
            packing,
            model,
            order: ChannelOrder::Rgb,
            has_alpha: false,
        }
    }

    const fn bgr(mut self) -> Self {
        self.order = ChannelOrder::Bgr;
        self
    }

    const fn alpha(mut self) -> Self {
        self.has_alpha = true;
        self.components = 4;
        self
    }

    /// Bytes of one unpacked sample: 1 up to 8 bits, otherwise a little-endian u16.
    pub fn bytes_per_sample(&self) -> usize {
        if self.bits_per_component <= 8 { 1 } else { 2 }
    }

    pub fn cfa(&self) -> Option<CfaAlignment> {
        match self.model {
            ColorModel::Bayer(alignment) => Some(alignment),
            _ => None,
        }
    }

    /// Whether each pixel is a single sample (monochrome or an undemosaiced mosaic).
    pub fn is_single_sample(&self) -> bool {
        matches!(self.model, ColorModel::Mono | ColorModel::Bayer(_))
    }

    /// Number of bytes a `width` x `height` frame occupies in this format.
    pub fn frame_len(&self, width: usize, height: usize) -> Result<usize> {
        let pixels = width
            .checked_mul(height)
            .ok_or(ConversionError::InvalidDimensions(width, height))?;
        let overflow = || ConversionError::InvalidDimensions(width, height);

        let len = match (self.model, self.packing) {
            (ColorModel::Mono | ColorModel::Bayer(_), Packing::Packed) => {
                pixels.div_ceil(2).checked_mul(3)
            }
            (ColorModel::Mono | ColorModel::Bayer(_), _) => {
                pixels.checked_mul(self.bytes_per_sample())
            }
            (ColorModel::Yuv(subsampling), _) => {
                let (group_pixels, group_bytes) = subsampling.group();
                pixels.div_ceil(group_pixels).checked_mul(group_bytes)
            }
            (ColorModel::Rgb, Packing::Packed) => pixels.checked_mul(4),
            (ColorModel::Rgb, _) => pixels
                .checked_mul(self.components)
                .and_then(|samples| samples.checked_mul(self.bytes_per_sample())),
            (ColorModel::BiColor(_), Packing::Packed) => pixels
                .checked_mul(2 * self.bits_per_component as usize)
                .map(|bits| bits.div_ceil(8)),
            (ColorModel::BiColor(_), _) => pixels
                .checked_mul(2)
                .and_then(|samples| samples.checked_mul(self.bytes_per_sample())),
        };
        len.ok_or_else(overflow)
    }
}

/// Looks up the descriptor of a GigE Vision format identifier.
pub fn describe(code: u32) -> Result<FormatDescriptor> {
    PixelFormat::from_code(code).map(PixelFormat::descriptor)
}

impl PixelFormat {
    pub fn descriptor(self) -> FormatDescriptor {
        use ColorModel::{Bayer, BiColor, Mono, Rgb, Yuv};
        use Packing::{Packed, Planar, Unpacked};

        let gr = Bayer(CfaAlignment::GrBg);
        let rg = Bayer(CfaAlignment::RgGb);
        let gb = Bayer(CfaAlignment::GbRg);
        let bg = Bayer(CfaAlignment::BgGr);
        let rgbg = BiColor(BiColorPattern::Rgbg);
        let bgrg = BiColor(BiColorPattern::Bgrg);

        match self {
            PixelFormat::Mono8 | PixelFormat::Mono8Signed => {
                FormatDescriptor::new(1, 8, Unpacked, Mono)
            }
            PixelFormat::Mono10 => FormatDescriptor::new(1, 10, Unpacked, Mono),
            PixelFormat::Mono10Packed => FormatDescriptor::new(1, 10, Packed, Mono),
            PixelFormat::Mono12 => FormatDescriptor::new(1, 12, Unpacked, Mono),
            PixelFormat::Mono12Packed => FormatDescriptor::new(1, 12, Packed, Mono),
            PixelFormat::Mono14 => FormatDescriptor::new(1, 14, Unpacked, Mono),
            PixelFormat::Mono16 => FormatDescriptor::new(1, 16, Unpacked, Mono),

            PixelFormat::BayerGr8 => FormatDescriptor::new(1, 8, Unpacked, gr),
            PixelFormat::BayerRg8 => FormatDescriptor::new(1, 8, Unpacked, rg),
            PixelFormat::BayerGb8 => FormatDescriptor::new(1, 8, Unpacked, gb),
            PixelFormat::BayerBg8 => FormatDescriptor::new(1, 8, Unpacked, bg),
            PixelFormat::BayerGr10 => FormatDescriptor::new(1, 10, Unpacked, gr),
            PixelFormat::BayerRg10 => FormatDescriptor::new(1, 10, Unpacked, rg),
            PixelFormat::BayerGb10 => FormatDescriptor::new(1, 10, Unpacked, gb),
            PixelFormat::BayerBg10 => FormatDescriptor::new(1, 10, Unpacked, bg),
            PixelFormat::BayerGr12 => FormatDescriptor::new(1, 12, Unpacked, gr),
            PixelFormat::BayerRg12 => FormatDescriptor::new(1, 12, Unpacked, rg),
            PixelFormat::BayerGb12 => FormatDescriptor::new(1, 12, Unpacked, gb),
            PixelFormat::BayerBg12 => FormatDescriptor::new(1, 12, Unpacked, bg),
            PixelFormat::BayerGr10Packed => FormatDescriptor::new(1, 10, Packed, gr),
            PixelFormat::BayerRg10Packed => FormatDescriptor::new(1, 10, Packed, rg),
            PixelFormat::BayerGb10Packed => FormatDescriptor::new(1, 10, Packed, gb),
            PixelFormat::BayerBg10Packed => FormatDescriptor::new(1, 10, Packed, bg),
            PixelFormat::BayerGr12Packed => FormatDescriptor::new(1, 12, Packed, gr),
            PixelFormat::BayerRg12Packed => FormatDescriptor::new(1, 12, Packed, rg),
            PixelFormat::BayerGb12Packed => FormatDescriptor::new(1, 12, Packed, gb),
            PixelFormat::BayerBg12Packed => FormatDescriptor::new(1, 12, Packed, bg),

            PixelFormat::Rgb8Packed => FormatDescriptor::new(3, 8, Unpacked, Rgb),
            PixelFormat::Bgr8Packed => FormatDescriptor::new(3, 8, Unpacked, Rgb).bgr(),
            PixelFormat::Rgba8Packed => FormatDescriptor::new(3, 8, Unpacked, Rgb).alpha(),
            PixelFormat::Bgra8Packed => FormatDescriptor::new(3, 8, Unpacked, Rgb).bgr().alpha(),
            PixelFormat::Rgb10Packed => FormatDescriptor::new(3, 10, Unpacked, Rgb),
            PixelFormat::Bgr10Packed => FormatDescriptor::new(3, 10, Unpacked, Rgb).bgr(),
            PixelFormat::Rgb12Packed => FormatDescriptor::new(3, 12, Unpacked, Rgb),
            PixelFormat::Bgr12Packed => FormatDescriptor::new(3, 12, Unpacked, Rgb).bgr(),
            PixelFormat::Rgb14Packed => FormatDescriptor::new(3, 14, Unpacked, Rgb),
            PixelFormat::Bgr14Packed => FormatDescriptor::new(3, 14, Unpacked, Rgb).bgr(),
            PixelFormat::Rgb16Packed => FormatDescriptor::new(3, 16, Unpacked, Rgb),
            PixelFormat::Bgr16Packed => FormatDescriptor::new(3, 16, Unpacked, Rgb).bgr(),
            PixelFormat::Rgb10V1Packed | PixelFormat::Rgb10V2Packed => {
                FormatDescriptor::new(3, 10, Packed, Rgb)
            }

            PixelFormat::Yuv411Packed => {
                FormatDescriptor::new(3, 8, Packed, Yuv(ChromaSubsampling::Yuv411))
            }
            PixelFormat::Yuv422Packed => {
                FormatDescriptor::new(3, 8, Packed, Yuv(ChromaSubsampling::Yuv422))
            }
            PixelFormat::Yuv444Packed => {
                FormatDescriptor::new(3, 8, Packed, Yuv(ChromaSubsampling::Yuv444))
            }

            PixelFormat::Rgb8Planar => FormatDescriptor::new(3, 8, Planar, Rgb),
            PixelFormat::Rgb10Planar => FormatDescriptor::new(3, 10, Planar, Rgb),
            PixelFormat::Rgb12Planar => FormatDescriptor::new(3, 12, Planar, Rgb),
            PixelFormat::Rgb16Planar => FormatDescriptor::new(3, 16, Planar, Rgb),

            PixelFormat::BiColorRgbg8 => FormatDescriptor::new(2, 8, Unpacked, rgbg),
            PixelFormat::BiColorBgrg8 => FormatDescriptor::new(2, 8, Unpacked, bgrg),
            PixelFormat::BiColorRgbg10 => FormatDescriptor::new(2, 10, Unpacked, rgbg),
            PixelFormat::BiColorBgrg10 => FormatDescriptor::new(2, 10, Unpacked, bgrg),
            PixelFormat::BiColorRgbg12 => FormatDescriptor::new(2, 12, Unpacked, rgbg),
            PixelFormat::BiColorBgrg12 => FormatDescriptor::new(2, 12, Unpacked, bgrg),
            PixelFormat::BiColorRgbg10p => FormatDescriptor::new(2, 10, Packed, rgbg),
            PixelFormat::BiColorBgrg10p => FormatDescriptor::new(2, 10, Packed, bgrg),
            PixelFormat::BiColorRgbg12p => FormatDescriptor::new(2, 12, Packed, rgbg),
            PixelFormat::BiColorBgrg12p => FormatDescriptor::new(2, 12, Packed, bgrg),
        }
    }
}
