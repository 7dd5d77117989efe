use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::format::ComponentOrder;

/// Sample index of `channel` (0 = R, 1 = G, 2 = B, 3 = A) of `pixel` in a raster
/// of `components` channels stored in `order`.
#[inline]
pub fn component_index(
    order: ComponentOrder,
    pixel_count: usize,
    components: usize,
    pixel: usize,
    channel: usize,
) -> usize {
    match order {
        ComponentOrder::Normal => pixel * components + channel,
        ComponentOrder::Reverse => {
            let position = match channel {
                0 if components >= 3 => 2,
                2 => 0,
                c => c,
            };
            pixel * components + position
        }
        ComponentOrder::Planar => channel * pixel_count + pixel,
    }
}

/// Moves RGB[A] samples between component orders without touching their values.
pub fn reorder(
    src: &[u8],
    pixel_count: usize,
    components: usize,
    bytes_per_sample: usize,
    from: ComponentOrder,
    to: ComponentOrder,
    dst: &mut [u8],
) -> Result<()> {
    if !matches!(components, 3 | 4) {
        return Err(ConversionError::InvalidParameters(format!(
            "reorder needs 3 or 4 components, got {components}"
        )));
    }
    if !matches!(bytes_per_sample, 1 | 2) {
        return Err(ConversionError::InvalidParameters(format!(
            "unsupported sample width of {bytes_per_sample} bytes"
        )));
    }

    let required = pixel_count * components * bytes_per_sample;
    if src.len() < required {
        return Err(ConversionError::SourceTooSmall {
            required,
            actual: src.len(),
        });
    }
    if dst.len() < required {
        return Err(ConversionError::BufferTooSmall {
            required,
            actual: dst.len(),
        });
    }

    if from == to {
        dst[..required].copy_from_slice(&src[..required]);
        return Ok(());
    }

    for pixel in 0..pixel_count {
        for channel in 0..components {
            let s = component_index(from, pixel_count, components, pixel, channel) * bytes_per_sample;
            let d = component_index(to, pixel_count, components, pixel, channel) * bytes_per_sample;
            dst[d..d + bytes_per_sample].copy_from_slice(&src[s..s + bytes_per_sample]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_to_reverse() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let mut dst = [0u8; 6];
        reorder(&src, 2, 3, 1, ComponentOrder::Normal, ComponentOrder::Reverse, &mut dst).unwrap();
        assert_eq!(dst, [3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_interleaved_to_planar_with_alpha() {
        let src = [1u8, 2, 3, 9, 4, 5, 6, 8];
        let mut dst = [0u8; 8];
        reorder(&src, 2, 4, 1, ComponentOrder::Normal, ComponentOrder::Planar, &mut dst).unwrap();
        assert_eq!(dst, [1, 4, 2, 5, 3, 6, 9, 8]);

        let mut back = [0u8; 8];
        reorder(&dst, 2, 4, 1, ComponentOrder::Planar, ComponentOrder::Normal, &mut back).unwrap();
        assert_eq!(back, src);
    }

    #[test]
    fn test_wide_samples_move_together() {
        let src = [0x01, 0x10, 0x02, 0x20, 0x03, 0x30];
        let mut dst = [0u8; 6];
        reorder(&src, 1, 3, 2, ComponentOrder::Normal, ComponentOrder::Reverse, &mut dst).unwrap();
        assert_eq!(dst, [0x03, 0x30, 0x02, 0x20, 0x01, 0x10]);
    }

    #[test]
    fn test_rejects_short_destination() {
        let src = [0u8; 6];
        let mut dst = [0u8; 5];
        let err = reorder(&src, 2, 3, 1, ComponentOrder::Normal, ComponentOrder::Planar, &mut dst)
            .unwrap_err();
        assert!(matches!(err, ConversionError::BufferTooSmall { required: 6, actual: 5 }));
        assert_eq!(dst, [0u8; 5]);
    }
}
