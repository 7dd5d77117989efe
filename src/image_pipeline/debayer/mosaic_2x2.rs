use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::types::BayerMosaic;
use crate::image_pipeline::debayer::validate_demosaic;
use crate::image_pipeline::format::CfaAlignment;
use crate::image_pipeline::repack::{rescale, DestinationLayout};

/// Row-pair sliding-window reconstruction over 2x2 neighbourhoods.
///
/// Each output pixel takes R and B from one mosaic sample each and G as their
/// rounded mean. The last row pairs with the row above it and the last column
/// reads only the column to its left, so no sample outside the frame is touched.
pub struct Nearest2x2Debayer;

impl Nearest2x2Debayer {
    pub fn new() -> Self {
        Self
    }

    pub fn process(
        &self,
        mosaic: &BayerMosaic<'_>,
        layout: &DestinationLayout,
        dst: &mut [u8],
    ) -> Result<()> {
        validate_demosaic(mosaic, layout, dst)?;

        let (width, height) = (mosaic.width, mosaic.height);
        debug!(
            width,
            height,
            alignment = ?mosaic.alignment,
            from = mosaic.bits,
            to = layout.bits,
            "Running 2x2 demosaic"
        );

        for row in 0..height {
            let last_row = row == height - 1;
            let (line0, line1) = if last_row { (row, row - 1) } else { (row, row + 1) };
            let s0 = |col: usize| mosaic.at(line0, col);
            let s1 = |col: usize| mosaic.at(line1, col);
            let row_alignment = mosaic.alignment.at(row, 0);

            for col in 0..width {
                let alignment = row_alignment.at(0, col);
                let [r, g, b] = if col == width - 1 {
                    last_column(alignment, col, s0, s1)
                } else if last_row {
                    last_row_pixel(alignment, col, s0, s1)
                } else {
                    interior_pixel(alignment, col, s0, s1)
                };
                layout.put_rgb(
                    dst,
                    row * width + col,
                    [
                        rescale(r as u16, mosaic.bits, layout.bits),
                        rescale(g as u16, mosaic.bits, layout.bits),
                        rescale(b as u16, mosaic.bits, layout.bits),
                    ],
                );
            }
        }
        Ok(())
    }
}

impl Default for Nearest2x2Debayer {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn interior_pixel(
    alignment: CfaAlignment,
    x: usize,
    s0: impl Fn(usize) -> u32,
    s1: impl Fn(usize) -> u32,
) -> [u32; 3] {
    let (r, b) = match alignment {
        CfaAlignment::GbRg => (s1(x), s0(x + 1)),
        CfaAlignment::BgGr => (s1(x + 1), s0(x)),
        CfaAlignment::RgGb => (s0(x), s1(x + 1)),
        CfaAlignment::GrBg => (s0(x + 1), s1(x)),
    };
    [r, (r + b + 1) >> 1, b]
}

/// Last row: `s1` is the row above, samples are copied without averaging.
#[inline]
fn last_row_pixel(
    alignment: CfaAlignment,
    x: usize,
    s0: impl Fn(usize) -> u32,
    s1: impl Fn(usize) -> u32,
) -> [u32; 3] {
    match alignment {
        CfaAlignment::GbRg => [s1(x), s0(x), s0(x + 1)],
        CfaAlignment::BgGr => [s1(x + 1), s0(x + 1), s0(x)],
        CfaAlignment::RgGb => [s0(x), s0(x + 1), s1(x + 1)],
        CfaAlignment::GrBg => [s0(x + 1), s0(x), s1(x)],
    }
}

#[inline]
fn last_column(
    alignment: CfaAlignment,
    x: usize,
    s0: impl Fn(usize) -> u32,
    s1: impl Fn(usize) -> u32,
) -> [u32; 3] {
    match alignment {
        CfaAlignment::GbRg => [s1(x), s0(x), s0(x - 1)],
        CfaAlignment::BgGr => [s1(x - 1), s1(x), s0(x)],
        CfaAlignment::RgGb => [s0(x), s1(x), s1(x - 1)],
        CfaAlignment::GrBg => [s0(x - 1), s0(x), s1(x)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::ConversionError;
    use crate::image_pipeline::debayer::types::BayerSamples;
    use crate::image_pipeline::format::PixelFormat;

    const ALIGNMENTS: [CfaAlignment; 4] = [
        CfaAlignment::GbRg,
        CfaAlignment::BgGr,
        CfaAlignment::RgGb,
        CfaAlignment::GrBg,
    ];

    #[test]
    fn test_flat_field_8bit_every_alignment() {
        let (w, h) = (5, 4);
        let data = vec![77u8; w * h];
        for alignment in ALIGNMENTS {
            let mosaic = BayerMosaic {
                width: w,
                height: h,
                bits: 8,
                alignment,
                samples: BayerSamples::U8(&data),
            };
            let layout = DestinationLayout::for_format(PixelFormat::Rgba8Packed, w * h).unwrap();
            let mut dst = vec![0u8; layout.required_len()];
            Nearest2x2Debayer::new().process(&mosaic, &layout, &mut dst).unwrap();
            for px in dst.chunks_exact(4) {
                assert_eq!(px, &[77, 77, 77, 0xFF], "{alignment:?}");
            }
        }
    }

    #[test]
    fn test_flat_field_12bit_to_8_and_planar_16() {
        let (w, h) = (4, 3);
        let k: u16 = 0x0ABC;
        let data: Vec<u8> = (0..w * h).flat_map(|_| k.to_le_bytes()).collect();
        for alignment in ALIGNMENTS {
            let mosaic = BayerMosaic {
                width: w,
                height: h,
                bits: 12,
                alignment,
                samples: BayerSamples::U16Le(&data),
            };

            let layout = DestinationLayout::for_format(PixelFormat::Bgr8Packed, w * h).unwrap();
            let mut dst = vec![0u8; layout.required_len()];
            Nearest2x2Debayer::new().process(&mosaic, &layout, &mut dst).unwrap();
            assert!(dst.iter().all(|&v| v == (k >> 4) as u8));

            let layout = DestinationLayout::for_format(PixelFormat::Rgb12Packed, w * h).unwrap();
            let mut dst = vec![0u8; layout.required_len()];
            Nearest2x2Debayer::new().process(&mosaic, &layout, &mut dst).unwrap();
            assert!(dst.chunks_exact(2).all(|c| u16::from_le_bytes([c[0], c[1]]) == k));

            let layout = DestinationLayout::for_format(PixelFormat::Rgb16Planar, w * h).unwrap();
            let mut dst = vec![0u8; layout.required_len()];
            Nearest2x2Debayer::new().process(&mosaic, &layout, &mut dst).unwrap();
            assert!(dst.chunks_exact(2).all(|c| u16::from_le_bytes([c[0], c[1]]) == k << 4));
        }
    }

    #[test]
    fn test_rggb_picks_neighbours() {
        // R G
        // G B
        let data = [200u8, 90, 100, 20];
        let mosaic = BayerMosaic {
            width: 2,
            height: 2,
            bits: 8,
            alignment: CfaAlignment::RgGb,
            samples: BayerSamples::U8(&data),
        };
        let layout = DestinationLayout::for_format(PixelFormat::Rgb8Packed, 4).unwrap();
        let mut dst = vec![0u8; 12];
        Nearest2x2Debayer::new().process(&mosaic, &layout, &mut dst).unwrap();

        // (0,0): interior, R = 200, B = 20, G = (200 + 20 + 1) >> 1
        assert_eq!(&dst[0..3], &[200, 110, 20]);
        // (0,1): last column in GR phase
        assert_eq!(&dst[3..6], &[200, 90, 20]);
        // (1,0): last row in GB phase, row above supplies R
        assert_eq!(&dst[6..9], &[200, 100, 20]);
        // (1,1): last column in BG phase with the row above as line 1
        assert_eq!(&dst[9..12], &[200, 90, 20]);
    }

    #[test]
    fn test_rejects_tiny_frames() {
        let data = [1u8, 2];
        let mosaic = BayerMosaic {
            width: 2,
            height: 1,
            bits: 8,
            alignment: CfaAlignment::RgGb,
            samples: BayerSamples::U8(&data),
        };
        let layout = DestinationLayout::for_format(PixelFormat::Rgb8Packed, 2).unwrap();
        let mut dst = vec![0u8; 6];
        let err = Nearest2x2Debayer::new().process(&mosaic, &layout, &mut dst).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidParameters(_)));
        assert_eq!(dst, vec![0u8; 6]);
    }
}
