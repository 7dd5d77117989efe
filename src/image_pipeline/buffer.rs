//! Bounds-checked views over caller-owned frame memory

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::format::{FormatDescriptor, PixelFormat};

/// Read-only frame: geometry, format and a byte slice at least one frame long.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: &'a [u8],
}

impl<'a> ImageView<'a> {
    pub fn new(width: usize, height: usize, format: PixelFormat, data: &'a [u8]) -> Result<Self> {
        let required = required_len(width, height, format)?;
        if data.len() < required {
            return Err(ConversionError::SourceTooSmall {
                required,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data: &data[..required],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn descriptor(&self) -> FormatDescriptor {
        self.format.descriptor()
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Exactly one frame worth of bytes.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Bytes needed to hold a `width` x `height` frame of `format`.
pub fn required_len(width: usize, height: usize, format: PixelFormat) -> Result<usize> {
    format.descriptor().frame_len(width, height)
}
