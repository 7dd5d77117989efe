//! Types for debayering operations

use crate::image_pipeline::format::CfaAlignment;

/// Reconstruction method used for Bayer mosaics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemosaicAlgorithm {
    /// 2x2 neighbourhood reconstruction, bit-exact with the legacy converter
    #[default]
    Nearest2x2,
    /// Bilinear interpolation through the `bayer` crate
    Linear,
}

/// Storage of mosaic samples.
#[derive(Debug, Clone, Copy)]
pub enum BayerSamples<'a> {
    /// One byte per sample
    U8(&'a [u8]),
    /// Little-endian 16-bit words
    U16Le(&'a [u8]),
    /// Samples already unpacked into native words
    Native(&'a [u16]),
}

/// A single-channel Bayer mosaic ready for reconstruction.
#[derive(Debug, Clone, Copy)]
pub struct BayerMosaic<'a> {
    pub width: usize,
    pub height: usize,
    /// Significant bits per sample
    pub bits: u32,
    /// Phase of the sample at (0, 0)
    pub alignment: CfaAlignment,
    pub samples: BayerSamples<'a>,
}

impl BayerMosaic<'_> {
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> u32 {
        let index = row * self.width + col;
        match self.samples {
            BayerSamples::U8(data) => data[index] as u32,
            BayerSamples::U16Le(data) => {
                u16::from_le_bytes([data[index * 2], data[index * 2 + 1]]) as u32
            }
            BayerSamples::Native(data) => data[index] as u32,
        }
    }

    /// Bytes per sample held by the backing storage.
    pub fn sample_bytes(&self) -> usize {
        match self.samples {
            BayerSamples::U8(_) => 1,
            BayerSamples::U16Le(_) | BayerSamples::Native(_) => 2,
        }
    }

    pub fn sample_count(&self) -> usize {
        match self.samples {
            BayerSamples::U8(data) => data.len(),
            BayerSamples::U16Le(data) => data.len() / 2,
            BayerSamples::Native(data) => data.len(),
        }
    }
}
