//! YUV decoder
//!
//! Fixed-point (14-bit scale) conversion of packed 4:1:1, 4:2:2 and 4:4:4 YUV
//! into any RGB or Mono destination layout.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::format::ChromaSubsampling;
use crate::image_pipeline::repack::{rescale, DestinationLayout};

const YUV_SHIFT: u32 = 14;
const Y_SCALE: i32 = 1 << YUV_SHIFT;
const U_TO_B: i32 = 29147;
const U_TO_G: i32 = 5661;
const V_TO_G: i32 = 11746;
const V_TO_R: i32 = 23060;

#[inline]
fn clamp8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Converts one YUV triple to `[R, G, B]`.
#[inline]
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as i32 * Y_SCALE;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    [
        clamp8((y + V_TO_R * v) >> YUV_SHIFT),
        clamp8((y - U_TO_G * u - V_TO_G * v) >> YUV_SHIFT),
        clamp8((y + U_TO_B * u) >> YUV_SHIFT),
    ]
}

/// Luma samples and shared chroma of one repeating group.
struct Group {
    luma: [u8; 4],
    len: usize,
    u: u8,
    v: u8,
}

#[inline]
fn split_group(subsampling: ChromaSubsampling, bytes: &[u8]) -> Group {
    match subsampling {
        ChromaSubsampling::Yuv411 => Group {
            luma: [bytes[1], bytes[2], bytes[4], bytes[5]],
            len: 4,
            u: bytes[0],
            v: bytes[3],
        },
        ChromaSubsampling::Yuv422 => Group {
            luma: [bytes[1], bytes[3], 0, 0],
            len: 2,
            u: bytes[0],
            v: bytes[2],
        },
        ChromaSubsampling::Yuv444 => Group {
            luma: [bytes[0], 0, 0, 0],
            len: 1,
            u: bytes[2],
            v: bytes[1],
        },
    }
}

/// Bytes of packed YUV needed for `pixel_count` pixels; a trailing partial
/// group still occupies a whole group.
pub fn yuv_frame_len(subsampling: ChromaSubsampling, pixel_count: usize) -> usize {
    let (group_pixels, group_bytes) = subsampling.group();
    pixel_count.div_ceil(group_pixels) * group_bytes
}

/// Decodes `layout.pixel_count` pixels of packed YUV into `dst`.
///
/// Colour layouts receive the converted RGB (rescaled from 8 bits to the layout
/// depth, alpha opaque); Mono layouts receive luma only.
pub fn decode_yuv(
    subsampling: ChromaSubsampling,
    src: &[u8],
    layout: &DestinationLayout,
    dst: &mut [u8],
) -> Result<()> {
    let pixel_count = layout.pixel_count;
    let required = yuv_frame_len(subsampling, pixel_count);
    if src.len() < required {
        return Err(ConversionError::SourceTooSmall {
            required,
            actual: src.len(),
        });
    }
    let dst_required = layout.required_len();
    if dst.len() < dst_required {
        return Err(ConversionError::BufferTooSmall {
            required: dst_required,
            actual: dst.len(),
        });
    }

    debug!(?subsampling, pixel_count, mono = layout.is_mono(), "Decoding YUV");

    let (_, group_bytes) = subsampling.group();
    let bits = layout.bits;
    let mut index = 0;
    for bytes in src[..required].chunks_exact(group_bytes) {
        let group = split_group(subsampling, bytes);
        for &y in &group.luma[..group.len] {
            if index == pixel_count {
                break;
            }
            if layout.is_mono() {
                layout.put_mono(dst, index, rescale(y as u16, 8, bits));
            } else {
                let [r, g, b] = yuv_to_rgb(y, group.u, group.v);
                layout.put_rgb(
                    dst,
                    index,
                    [
                        rescale(r as u16, 8, bits),
                        rescale(g as u16, 8, bits),
                        rescale(b as u16, 8, bits),
                    ],
                );
            }
            index += 1;
        }
    }
    Ok(())
}
