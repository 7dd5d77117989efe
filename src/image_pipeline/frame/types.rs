//! Frame data types

use crate::image_pipeline::buffer::ImageView;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::format::PixelFormat;

/// One acquired frame
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Width of the frame in pixels
    pub width: usize,
    /// Height of the frame in pixels
    pub height: usize,
    pub format: PixelFormat,
    /// Significant bits per sample from the sensor, 0 for the format's nominal depth
    pub bits_per_sample: u32,
    /// Exactly one frame of payload bytes
    pub data: Vec<u8>,
}

impl RawFrame {
    pub fn view(&self) -> Result<ImageView<'_>> {
        ImageView::new(self.width, self.height, self.format, &self.data)
    }
}
