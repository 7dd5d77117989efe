//! Frame source over raw payload dumps.
//!
//! A dump is the frame payload exactly as the camera delivered it, without any
//! header, so geometry and format have to be supplied by the caller.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::format::PixelFormat;
use crate::image_pipeline::frame::source::FrameSource;
use crate::image_pipeline::frame::types::RawFrame;

#[derive(Debug, Clone, Copy)]
pub struct RawDumpSource {
    width: usize,
    height: usize,
    format: PixelFormat,
    bits_per_sample: u32,
}

impl RawDumpSource {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            bits_per_sample: 0,
        }
    }

    /// Declares how many bits of each sample the sensor actually fills.
    pub fn with_bits_per_sample(mut self, bits: u32) -> Self {
        self.bits_per_sample = bits;
        self
    }
}

impl FrameSource for RawDumpSource {
    fn read_frame(&self, data: &[u8]) -> Result<RawFrame> {
        let required = self.format.descriptor().frame_len(self.width, self.height)?;
        debug!(
            width = self.width,
            height = self.height,
            format = %self.format,
            required,
            available = data.len(),
            "Reading raw frame dump"
        );
        if data.len() < required {
            return Err(ConversionError::SourceTooSmall {
                required,
                actual: data.len(),
            });
        }

        Ok(RawFrame {
            width: self.width,
            height: self.height,
            format: self.format,
            bits_per_sample: self.bits_per_sample,
            data: data[..required].to_vec(),
        })
    }
}
