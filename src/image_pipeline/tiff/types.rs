//! TIFF codec data types and conversion configuration

use crate::image_pipeline::debayer::DemosaicAlgorithm;

/// Borrowed raster handed to the TIFF writer.
///
/// Samples of 9 to 16 bits are little-endian u16; shallower samples are bytes.
#[derive(Debug, Clone, Copy)]
pub struct TiffRaster<'a> {
    pub width: usize,
    pub height: usize,
    pub components: usize,
    pub bits_per_component: u32,
    pub pixels: &'a [u8],
}

impl TiffRaster<'_> {
    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_per_component as usize).div_ceil(8)
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Pixel bytes described by the geometry.
    pub fn data_len(&self) -> usize {
        self.pixel_count() * self.components * self.bytes_per_sample()
    }
}

/// Decoded TIFF raster owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiffImage {
    pub width: usize,
    pub height: usize,
    /// Components delivered per pixel (palette images deliver 3)
    pub components: usize,
    /// 8 or 16; 16-bit samples are little-endian
    pub bits_per_component: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Photometric {
    MinIsWhite,
    MinIsBlack,
    Rgb,
    Palette,
}

impl Photometric {
    pub fn from_tag(value: u16) -> Option<Self> {
        match value {
            0 => Some(Photometric::MinIsWhite),
            1 => Some(Photometric::MinIsBlack),
            2 => Some(Photometric::Rgb),
            3 => Some(Photometric::Palette),
            _ => None,
        }
    }
}

/// Byte order declared by the file header (`II` or `MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileByteOrder {
    LittleEndian,
    BigEndian,
}

/// Header-level description of a TIFF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffInfo {
    pub width: usize,
    pub height: usize,
    pub bits_per_sample: u32,
    pub samples_per_pixel: usize,
    /// Components a read delivers per pixel
    pub components: usize,
    pub photometric: Photometric,
    pub byte_order: FileByteOrder,
}

impl TiffInfo {
    /// Bytes a read of this file places in the destination.
    pub fn decoded_len(&self) -> usize {
        let bytes = if self.photometric == Photometric::Palette || self.bits_per_sample <= 8 {
            1
        } else {
            2
        };
        self.width * self.height * self.components * bytes
    }

    pub fn decoded_bits(&self) -> u32 {
        if self.photometric == Photometric::Palette { 8 } else { self.bits_per_sample }
    }
}

/// Configuration for frame to TIFF conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Reconstruction used when Bayer frames are converted to RGB
    pub demosaic_algorithm: DemosaicAlgorithm,
    /// Whether Bayer frames are demosaiced (true) or stored as grayscale mosaics (false)
    pub convert_bayer: bool,
    /// Whether to validate frame dimensions before conversion
    pub validate_dimensions: bool,
    /// Largest accepted width or height
    pub max_dimension: Option<usize>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            demosaic_algorithm: DemosaicAlgorithm::Nearest2x2,
            convert_bayer: true,
            validate_dimensions: true,
            max_dimension: None,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    demosaic_algorithm: Option<DemosaicAlgorithm>,
    convert_bayer: Option<bool>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl ConversionConfigBuilder {
    pub fn demosaic_algorithm(mut self, algorithm: DemosaicAlgorithm) -> Self {
        self.demosaic_algorithm = Some(algorithm);
        self
    }

    pub fn convert_bayer(mut self, enable: bool) -> Self {
        self.convert_bayer = Some(enable);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            demosaic_algorithm: self.demosaic_algorithm.unwrap_or(default.demosaic_algorithm),
            convert_bayer: self.convert_bayer.unwrap_or(default.convert_bayer),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
