//! Small enums shared by the format descriptor and the decoders

/// Phase of a 2x2 Bayer mosaic: which colours sit on the first two rows.
///
/// The discriminants are chosen so that moving one column flips bit 0 and
/// moving one row flips bit 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CfaAlignment {
    /// G B / R G
    GbRg = 0,
    /// B G / G R
    BgGr = 1,
    /// R G / G B
    RgGb = 2,
    /// G R / B G
    GrBg = 3,
}

impl CfaAlignment {
    pub fn from_index(index: u8) -> Self {
        match index & 0x3 {
            0 => CfaAlignment::GbRg,
            1 => CfaAlignment::BgGr,
            2 => CfaAlignment::RgGb,
            _ => CfaAlignment::GrBg,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Alignment seen one column to the right.
    pub fn next_column(self) -> Self {
        Self::from_index(self.index() ^ 1)
    }

    /// Alignment seen one row down.
    pub fn next_row(self) -> Self {
        Self::from_index(self.index() ^ 2)
    }

    /// Alignment of the sample at (`row`, `col`) of a mosaic starting with `self`.
    pub fn at(self, row: usize, col: usize) -> Self {
        let flip = ((row & 1) << 1) | (col & 1);
        Self::from_index(self.index() ^ flip as u8)
    }
}

/// Colour carried by the first sample pair of a bi-color row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiColorPattern {
    /// R,G then B,G
    Rgbg,
    /// B,G then R,G
    Bgrg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromaSubsampling {
    /// U,Y0,Y1,V,Y2,Y3
    Yuv411,
    /// U,Y0,V,Y1
    Yuv422,
    /// Y,V,U
    Yuv444,
}

impl ChromaSubsampling {
    /// (pixels, bytes) of one repeating group.
    pub fn group(self) -> (usize, usize) {
        match self {
            ChromaSubsampling::Yuv411 => (4, 6),
            ChromaSubsampling::Yuv422 => (2, 4),
            ChromaSubsampling::Yuv444 => (1, 3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Packing {
    /// Every sample fills a whole byte or a little-endian 16-bit word.
    Unpacked,
    /// Samples straddle byte boundaries.
    Packed,
    /// One contiguous block per channel.
    Planar,
}

/// Position of red relative to blue in interleaved colour data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorModel {
    Mono,
    Rgb,
    Yuv(ChromaSubsampling),
    Bayer(CfaAlignment),
    BiColor(BiColorPattern),
}

/// Channel arrangement of colour rasters handed to or produced by the TIFF codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentOrder {
    /// R,G,B[,A] per pixel
    #[default]
    Normal,
    /// B,G,R[,A] per pixel
    Reverse,
    /// R plane, G plane, B plane[, A plane]
    Planar,
}

impl TryFrom<u32> for ComponentOrder {
    type Error = u32;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(ComponentOrder::Normal),
            1 => Ok(ComponentOrder::Reverse),
            2 => Ok(ComponentOrder::Planar),
            other => Err(other),
        }
    }
}
