//! Sample-level helpers: container access, depth scaling and alpha synthesis

/// Reads sample `index` from a buffer of 1-byte or little-endian 2-byte samples.
#[inline]
pub fn read_sample(data: &[u8], index: usize, bytes_per_sample: usize) -> u16 {
    if bytes_per_sample == 1 {
        data[index] as u16
    } else {
        let offset = index * 2;
        u16::from_le_bytes([data[offset], data[offset + 1]])
    }
}

/// Stores `value` at byte `offset`; 2-byte samples are little-endian.
#[inline]
pub fn write_sample(data: &mut [u8], offset: usize, bytes_per_sample: usize, value: u16) {
    if bytes_per_sample == 1 {
        data[offset] = value as u8;
    } else {
        data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }
}

/// Moves a `from`-bit sample to `to` bits: truncating when narrowing,
/// left-justifying when widening.
#[inline]
pub fn rescale(value: u16, from: u32, to: u32) -> u16 {
    if from > to {
        value >> (from - to)
    } else {
        value << (to - from)
    }
}

/// Left-justifies an `bits`-bit sample into 16 bits.
#[inline]
pub fn scale_up(value: u16, bits: u32) -> u16 {
    if bits >= 16 {
        value
    } else {
        value << (16 - bits)
    }
}

/// Opaque alpha value for a `bits`-bit channel.
#[inline]
pub fn opaque(bits: u32) -> u16 {
    if bits >= 16 {
        u16::MAX
    } else {
        (1u16 << bits) - 1
    }
}

pub fn inject_alpha(rgb: [u8; 3]) -> [u8; 4] {
    [rgb[0], rgb[1], rgb[2], 0xFF]
}
