use std::fmt;

use tracing::warn;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Pixel layouts understood by the engine, named after their GigE Vision / PFNC tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Mono8,
    Mono8Signed,
    Mono10,
    Mono10Packed,
    Mono12,
    Mono12Packed,
    Mono14,
    Mono16,

    BayerGr8,
    BayerRg8,
    BayerGb8,
    BayerBg8,
    BayerGr10,
    BayerRg10,
    BayerGb10,
    BayerBg10,
    BayerGr12,
    BayerRg12,
    BayerGb12,
    BayerBg12,
    BayerGr10Packed,
    BayerRg10Packed,
    BayerGb10Packed,
    BayerBg10Packed,
    BayerGr12Packed,
    BayerRg12Packed,
    BayerGb12Packed,
    BayerBg12Packed,

    Rgb8Packed,
    Bgr8Packed,
    Rgba8Packed,
    Bgra8Packed,
    Rgb10Packed,
    Bgr10Packed,
    Rgb12Packed,
    Bgr12Packed,
    Rgb14Packed,
    Bgr14Packed,
    Rgb16Packed,
    Bgr16Packed,
    Rgb10V1Packed,
    Rgb10V2Packed,

    Yuv411Packed,
    Yuv422Packed,
    Yuv444Packed,

    Rgb8Planar,
    Rgb10Planar,
    Rgb12Planar,
    Rgb16Planar,

    BiColorRgbg8,
    BiColorBgrg8,
    BiColorRgbg10,
    BiColorBgrg10,
    BiColorRgbg12,
    BiColorBgrg12,
    BiColorRgbg10p,
    BiColorBgrg10p,
    BiColorRgbg12p,
    BiColorBgrg12p,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 59] = [
        PixelFormat::Mono8,
        PixelFormat::Mono8Signed,
        PixelFormat::Mono10,
        PixelFormat::Mono10Packed,
        PixelFormat::Mono12,
        PixelFormat::Mono12Packed,
        PixelFormat::Mono14,
        PixelFormat::Mono16,
        PixelFormat::BayerGr8,
        PixelFormat::BayerRg8,
        PixelFormat::BayerGb8,
        PixelFormat::BayerBg8,
        PixelFormat::BayerGr10,
        PixelFormat::BayerRg10,
        PixelFormat::BayerGb10,
        PixelFormat::BayerBg10,
        PixelFormat::BayerGr12,
        PixelFormat::BayerRg12,
        PixelFormat::BayerGb12,
        PixelFormat::BayerBg12,
        PixelFormat::BayerGr10Packed,
        PixelFormat::BayerRg10Packed,
        PixelFormat::BayerGb10Packed,
        PixelFormat::BayerBg10Packed,
        PixelFormat::BayerGr12Packed,
        PixelFormat::BayerRg12Packed,
        PixelFormat::BayerGb12Packed,
        PixelFormat::BayerBg12Packed,
        PixelFormat::Rgb8Packed,
        PixelFormat::Bgr8Packed,
        PixelFormat::Rgba8Packed,
        PixelFormat::Bgra8Packed,
        PixelFormat::Rgb10Packed,
        PixelFormat::Bgr10Packed,
        PixelFormat::Rgb12Packed,
        PixelFormat::Bgr12Packed,
        PixelFormat::Rgb14Packed,
        PixelFormat::Bgr14Packed,
        PixelFormat::Rgb16Packed,
        PixelFormat::Bgr16Packed,
        PixelFormat::Rgb10V1Packed,
        PixelFormat::Rgb10V2Packed,
        PixelFormat::Yuv411Packed,
        PixelFormat::Yuv422Packed,
        PixelFormat::Yuv444Packed,
        PixelFormat::Rgb8Planar,
        PixelFormat::Rgb10Planar,
        PixelFormat::Rgb12Planar,
        PixelFormat::Rgb16Planar,
        PixelFormat::BiColorRgbg8,
        PixelFormat::BiColorBgrg8,
        PixelFormat::BiColorRgbg10,
        PixelFormat::BiColorBgrg10,
        PixelFormat::BiColorRgbg12,
        PixelFormat::BiColorBgrg12,
        PixelFormat::BiColorRgbg10p,
        PixelFormat::BiColorBgrg10p,
        PixelFormat::BiColorRgbg12p,
        PixelFormat::BiColorBgrg12p,
    ];

    /// 32-bit GigE Vision identifier of the format.
    pub fn code(self) -> u32 {
        match self {
            PixelFormat::Mono8 => 0x0108_0001,
            PixelFormat::Mono8Signed => 0x0108_0002,
            PixelFormat::Mono10 => 0x0110_0003,
            PixelFormat::Mono10Packed => 0x010C_0004,
            PixelFormat::Mono12 => 0x0110_0005,
            PixelFormat::Mono12Packed => 0x010C_0006,
            PixelFormat::Mono14 => 0x0110_0025,
            PixelFormat::Mono16 => 0x0110_0007,

            PixelFormat::BayerGr8 => 0x0108_0008,
            PixelFormat::BayerRg8 => 0x0108_0009,
            PixelFormat::BayerGb8 => 0x0108_000A,
            PixelFormat::BayerBg8 => 0x0108_000B,
            PixelFormat::BayerGr10 => 0x0110_000C,
            PixelFormat::BayerRg10 => 0x0110_000D,
            PixelFormat::BayerGb10 => 0x0110_000E,
            PixelFormat::BayerBg10 => 0x0110_000F,
            PixelFormat::BayerGr12 => 0x0110_0010,
            PixelFormat::BayerRg12 => 0x0110_0011,
            PixelFormat::BayerGb12 => 0x0110_0012,
            PixelFormat::BayerBg12 => 0x0110_0013,
            PixelFormat::BayerGr10Packed => 0x010C_0026,
            PixelFormat::BayerRg10Packed => 0x010C_0027,
            PixelFormat::BayerGb10Packed => 0x010C_0028,
            PixelFormat::BayerBg10Packed => 0x010C_0029,
            PixelFormat::BayerGr12Packed => 0x010C_002A,
            PixelFormat::BayerRg12Packed => 0x010C_002B,
            PixelFormat::BayerGb12Packed => 0x010C_002C,
            PixelFormat::BayerBg12Packed => 0x010C_002D,

            PixelFormat::Rgb8Packed => 0x0218_0014,
            PixelFormat::Bgr8Packed => 0x0218_0015,
            PixelFormat::Rgba8Packed => 0x0220_0016,
            PixelFormat::Bgra8Packed => 0x0220_0017,
            PixelFormat::Rgb10Packed => 0x0230_0018,
            PixelFormat::Bgr10Packed => 0x0230_0019,
            PixelFormat::Rgb12Packed => 0x0230_001A,
            PixelFormat::Bgr12Packed => 0x0230_001B,
            PixelFormat::Rgb14Packed => 0x0230_005E,
            PixelFormat::Bgr14Packed => 0x0230_004A,
            PixelFormat::Rgb16Packed => 0x0230_0033,
            PixelFormat::Bgr16Packed => 0x0230_004B,
            PixelFormat::Rgb10V1Packed => 0x0220_001C,
            PixelFormat::Rgb10V2Packed => 0x0220_001D,

            PixelFormat::Yuv411Packed => 0x020C_001E,
            PixelFormat::Yuv422Packed => 0x0210_001F,
            PixelFormat::Yuv444Packed => 0x0218_0020,

            PixelFormat::Rgb8Planar => 0x0218_0021,
            PixelFormat::Rgb10Planar => 0x0230_0022,
            PixelFormat::Rgb12Planar => 0x0230_0023,
            PixelFormat::Rgb16Planar => 0x0230_0024,

            PixelFormat::BiColorRgbg8 => 0x0210_00A5,
            PixelFormat::BiColorBgrg8 => 0x0210_00A6,
            PixelFormat::BiColorBgrg10 => 0x0220_00A9,
            PixelFormat::BiColorBgrg10p => 0x0214_00AA,
            PixelFormat::BiColorBgrg12 => 0x0220_00AB,
            PixelFormat::BiColorBgrg12p => 0x0218_00AC,
            PixelFormat::BiColorRgbg10 => 0x0220_00AD,
            PixelFormat::BiColorRgbg10p => 0x0214_00AE,
            PixelFormat::BiColorRgbg12 => 0x0220_00AF,
            PixelFormat::BiColorRgbg12p => 0x0218_00B0,
        }
    }

    pub fn from_code(code: u32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.code() == code)
            .ok_or(ConversionError::UnknownFormatCode(code))
    }

    /// Resolves `code`, treating unknown identifiers as raw 8-bit monochrome.
    pub fn from_code_or_mono8(code: u32) -> Self {
        match Self::from_code(code) {
            Ok(format) => format,
            Err(_) => {
                warn!("Unknown pixel format {:#010x}, treating frame as Mono8", code);
                PixelFormat::Mono8
            }
        }
    }

    /// Bits per component of the format (sample bits for Bayer and bi-color).
    pub fn bits(self) -> u32 {
        self.descriptor().bits_per_component
    }

    pub fn is_bayer(self) -> bool {
        self.descriptor().cfa().is_some()
    }

    pub fn is_packed(self) -> bool {
        self.descriptor().packing == crate::image_pipeline::format::Packing::Packed
    }

    /// Unpacked equivalent of a packed mono or Bayer format.
    pub fn unpacked(self) -> Self {
        match self {
            PixelFormat::Mono10Packed => PixelFormat::Mono10,
            PixelFormat::Mono12Packed => PixelFormat::Mono12,
            PixelFormat::BayerGr10Packed => PixelFormat::BayerGr10,
            PixelFormat::BayerRg10Packed => PixelFormat::BayerRg10,
            PixelFormat::BayerGb10Packed => PixelFormat::BayerGb10,
            PixelFormat::BayerBg10Packed => PixelFormat::BayerBg10,
            PixelFormat::BayerGr12Packed => PixelFormat::BayerGr12,
            PixelFormat::BayerRg12Packed => PixelFormat::BayerRg12,
            PixelFormat::BayerGb12Packed => PixelFormat::BayerGb12,
            PixelFormat::BayerBg12Packed => PixelFormat::BayerBg12,
            other => other,
        }
    }

    /// RGB format a Bayer frame of this depth is demosaiced into.
    pub fn demosaiced(self) -> Self {
        if !self.is_bayer() {
            return self;
        }
        match self.bits() {
            8 => PixelFormat::Rgb8Packed,
            10 => PixelFormat::Rgb10Packed,
            _ => PixelFormat::Rgb12Packed,
        }
    }

    /// Format a display surface should receive for frames of this format.
    pub fn display_format(self, convert_bayer: bool) -> Self {
        use crate::image_pipeline::format::ColorModel;

        match self.descriptor().model {
            ColorModel::Mono => self.unpacked(),
            ColorModel::Bayer(_) if convert_bayer => PixelFormat::Bgra8Packed,
            ColorModel::Bayer(_) => self.unpacked(),
            ColorModel::Rgb => match self {
                PixelFormat::Rgb8Packed
                | PixelFormat::Bgr8Packed
                | PixelFormat::Rgba8Packed
                | PixelFormat::Bgra8Packed => self,
                _ => PixelFormat::Bgra8Packed,
            },
            ColorModel::Yuv(_) | ColorModel::BiColor(_) => PixelFormat::Bgra8Packed,
        }
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = ConversionError;

    fn try_from(code: u32) -> Result<Self> {
        PixelFormat::from_code(code)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:#010x})", self, self.code())
    }
}
