use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::repack::sample::{rescale, write_sample};

/// Decodes sample `index` of a GigE Vision packed stream (two samples in three bytes).
///
/// Byte 1 carries the low bits: bits 0..3 for the even sample, bits 4..7 for the odd one.
#[inline]
pub fn packed_sample(data: &[u8], index: usize, bits: u32) -> u16 {
    let group = (index / 2) * 3;
    let lsb = data[group + 1] as u16;
    if index & 1 == 0 {
        let msb = data[group] as u16;
        if bits == 10 {
            (msb << 2) | (lsb & 0x03)
        } else {
            (msb << 4) | (lsb & 0x0F)
        }
    } else {
        let msb = data[group + 2] as u16;
        if bits == 10 {
            (msb << 2) | ((lsb >> 4) & 0x03)
        } else {
            (msb << 4) | (lsb >> 4)
        }
    }
}

/// Bytes occupied by `pixel_count` packed samples.
pub fn packed_len(pixel_count: usize) -> usize {
    pixel_count.div_ceil(2) * 3
}

fn check_packed_bits(bits: u32) -> Result<()> {
    match bits {
        10 | 12 => Ok(()),
        other => Err(ConversionError::UnsupportedFormat(format!(
            "{other}-bit packed samples"
        ))),
    }
}

/// Unpacks `pixel_count` packed `packed_bits` samples into byte (8-bit) or
/// little-endian word (10/12/16-bit) containers of `dst_bits`.
pub fn unpack(
    src: &[u8],
    pixel_count: usize,
    packed_bits: u32,
    dst_bits: u32,
    dst: &mut [u8],
) -> Result<()> {
    check_packed_bits(packed_bits)?;
    if !matches!(dst_bits, 8 | 10 | 12 | 16) {
        return Err(ConversionError::UnsupportedFormat(format!(
            "{dst_bits}-bit unpacked destination"
        )));
    }

    let required = packed_len(pixel_count);
    if src.len() < required {
        return Err(ConversionError::SourceTooSmall {
            required,
            actual: src.len(),
        });
    }
    let bytes = if dst_bits == 8 { 1 } else { 2 };
    let dst_required = pixel_count * bytes;
    if dst.len() < dst_required {
        return Err(ConversionError::BufferTooSmall {
            required: dst_required,
            actual: dst.len(),
        });
    }

    debug!(pixel_count, packed_bits, dst_bits, "Unpacking samples");
    for index in 0..pixel_count {
        let value = rescale(packed_sample(src, index, packed_bits), packed_bits, dst_bits);
        write_sample(dst, index * bytes, bytes, value);
    }
    Ok(())
}

/// Unpacks into a scratch vector of native samples at their original depth.
pub fn unpack_to_vec(src: &[u8], pixel_count: usize, packed_bits: u32) -> Result<Vec<u16>> {
    check_packed_bits(packed_bits)?;
    let required = packed_len(pixel_count);
    if src.len() < required {
        return Err(ConversionError::SourceTooSmall {
            required,
            actual: src.len(),
        });
    }
    Ok((0..pixel_count)
        .map(|index| packed_sample(src, index, packed_bits))
        .collect())
}
