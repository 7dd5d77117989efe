//! Bi-color decoder
//!
//! Bi-color sensors deliver two samples per pixel: a colour sample (red or blue,
//! alternating from pixel to pixel) followed by green. The missing colour of a
//! pixel comes from the colour samples of its left and right neighbours.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::format::BiColorPattern;
use crate::image_pipeline::repack::DestinationLayout;

/// Sample storage of a bi-color frame.
#[derive(Debug, Clone, Copy)]
pub enum BiColorSamples<'a> {
    /// 8-bit samples
    U8(&'a [u8]),
    /// Little-endian 16-bit samples
    U16(&'a [u8]),
    /// 16-bit samples whose two bytes arrive high byte first
    U16Swapped(&'a [u8]),
}

impl BiColorSamples<'_> {
    #[inline]
    fn at(&self, index: usize) -> u32 {
        match *self {
            BiColorSamples::U8(data) => data[index] as u32,
            BiColorSamples::U16(data) => {
                u16::from_le_bytes([data[index * 2], data[index * 2 + 1]]) as u32
            }
            BiColorSamples::U16Swapped(data) => {
                u16::from_be_bytes([data[index * 2], data[index * 2 + 1]]) as u32
            }
        }
    }

    fn len(&self) -> usize {
        match *self {
            BiColorSamples::U8(data) => data.len(),
            BiColorSamples::U16(data) | BiColorSamples::U16Swapped(data) => data.len() / 2,
        }
    }

    fn sample_bytes(&self) -> usize {
        match self {
            BiColorSamples::U8(_) => 1,
            _ => 2,
        }
    }
}

/// Reconstructs RGB from a bi-color frame.
///
/// Every output sample is shifted right by `shift` and stored as-is, so the
/// caller picks `shift = source_bits - layout.bits`.
pub fn decode_bicolor(
    samples: BiColorSamples<'_>,
    width: usize,
    height: usize,
    pattern: BiColorPattern,
    shift: u32,
    layout: &DestinationLayout,
    dst: &mut [u8],
) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ConversionError::InvalidDimensions(width, height));
    }
    if layout.is_mono() {
        return Err(ConversionError::InvalidParameters(
            "bi-color destination must be a colour layout".to_string(),
        ));
    }
    if shift > 15 {
        return Err(ConversionError::InvalidParameters(format!(
            "bi-color shift of {shift} bits"
        )));
    }

    let pixel_count = width * height;
    let sample_count = pixel_count * 2;
    if samples.len() < sample_count {
        return Err(ConversionError::SourceTooSmall {
            required: sample_count * samples.sample_bytes(),
            actual: samples.len() * samples.sample_bytes(),
        });
    }
    if layout.pixel_count != pixel_count {
        return Err(ConversionError::InvalidParameters(format!(
            "layout holds {} pixels, frame has {pixel_count}",
            layout.pixel_count
        )));
    }
    let required = layout.required_len();
    if dst.len() < required {
        return Err(ConversionError::BufferTooSmall {
            required,
            actual: dst.len(),
        });
    }

    debug!(width, height, ?pattern, shift, "Decoding bi-color frame");

    let red_on_even = pattern == BiColorPattern::Rgbg;
    for row in 0..height {
        let base = row * width * 2;
        let colour = |pixel: usize| samples.at(base + 2 * pixel);

        for pixel in 0..width {
            let own = colour(pixel);
            let green = samples.at(base + 2 * pixel + 1);
            let missing = if width == 1 {
                0
            } else if pixel == 0 {
                colour(1)
            } else if pixel == width - 1 {
                colour(pixel - 1)
            } else {
                (colour(pixel - 1) + colour(pixel + 1) + 1) >> 1
            };

            let is_red = (pixel % 2 == 0) == red_on_even;
            let (r, b) = if is_red { (own, missing) } else { (missing, own) };
            layout.put_rgb(
                dst,
                row * width + pixel,
                [(r >> shift) as u16, (green >> shift) as u16, (b >> shift) as u16],
            );
        }
    }
    Ok(())
}

/// Swaps the two 8-bit samples of every pair.
pub fn swap_bicolor8_pairs(src: &[u8], dst: &mut [u8]) -> Result<()> {
    check_lengths(src.len(), dst.len(), 1)?;
    for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(2)) {
        d[0] = s[1];
        d[1] = s[0];
    }
    Ok(())
}

/// Widens 8-bit pairs into little-endian 16-bit pairs, optionally swapping
/// the two samples of each pair.
pub fn widen_bicolor8_to_16(src: &[u8], dst: &mut [u8], flip: bool) -> Result<()> {
    check_lengths(src.len(), dst.len(), 2)?;
    for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(4)) {
        let (first, second) = if flip { (s[1], s[0]) } else { (s[0], s[1]) };
        d.copy_from_slice(&[first, 0, second, 0]);
    }
    Ok(())
}

/// Shifts 16-bit pairs right by `shift`; unaligned input also has its two
/// samples swapped.
pub fn realign_bicolor16(src: &[u8], dst: &mut [u8], shift: u32, aligned: bool) -> Result<()> {
    if shift > 15 {
        return Err(ConversionError::InvalidParameters(format!(
            "bi-color shift of {shift} bits"
        )));
    }
    check_lengths(src.len(), dst.len(), 1)?;
    if aligned && shift == 0 {
        dst[..src.len()].copy_from_slice(src);
        return Ok(());
    }
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let a = u16::from_le_bytes([s[0], s[1]]);
        let b = u16::from_le_bytes([s[2], s[3]]);
        let (first, second) = if aligned { (a, b) } else { (b, a) };
        d[..2].copy_from_slice(&(first >> shift).to_le_bytes());
        d[2..].copy_from_slice(&(second >> shift).to_le_bytes());
    }
    Ok(())
}

fn check_lengths(src: usize, dst: usize, growth: usize) -> Result<()> {
    if src % 2 != 0 {
        return Err(ConversionError::InvalidParameters(
            "bi-color data must hold whole sample pairs".to_string(),
        ));
    }
    let required = src * growth;
    if dst < required {
        return Err(ConversionError::BufferTooSmall {
            required,
            actual: dst,
        });
    }
    Ok(())
}
