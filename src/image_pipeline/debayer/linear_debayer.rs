use std::io::Cursor;

use bayer::{BayerDepth, Demosaic, RasterDepth, RasterMut, CFA};
use tracing::{debug, info};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::types::{BayerMosaic, BayerSamples};
use crate::image_pipeline::debayer::validate_demosaic;
use crate::image_pipeline::format::CfaAlignment;
use crate::image_pipeline::repack::{rescale, DestinationLayout};

/// Bilinear reconstruction through the `bayer` crate.
pub struct LinearDebayer;

impl LinearDebayer {
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
        info!("Starting linear demosaic for image {}x{}", width, height);

        // bayer crate depth follows the storage, not the significant bits
        let bytes_per_sample = mosaic.sample_bytes();
        let (bayer_depth, raster_depth) = if bytes_per_sample == 1 {
            (BayerDepth::Depth8, RasterDepth::Depth8)
        } else {
            (BayerDepth::Depth16LE, RasterDepth::Depth16)
        };

        let pixel_count = width * height;
        let owned;
        let bayer_bytes: &[u8] = match mosaic.samples {
            BayerSamples::U8(data) => &data[..pixel_count],
            BayerSamples::U16Le(data) => &data[..pixel_count * 2],
            BayerSamples::Native(data) => {
                owned = data[..pixel_count]
                    .iter()
                    .flat_map(|&val| val.to_le_bytes())
                    .collect::<Vec<u8>>();
                &owned
            }
        };

        let mut output_buf = vec![0u8; pixel_count * 3 * bytes_per_sample];
        debug!(
            ?bayer_depth,
            cfa = ?mosaic.alignment,
            input_bytes = bayer_bytes.len(),
            output_bytes = output_buf.len(),
            "Running bayer crate demosaic"
        );

        {
            let mut output_raster = RasterMut::new(width, height, raster_depth, &mut output_buf);
            bayer::run_demosaic(
                &mut Cursor::new(bayer_bytes),
                bayer_depth,
                cfa_for(mosaic.alignment),
                Demosaic::Linear,
                &mut output_raster,
            )
            .map_err(|e| ConversionError::DemosaicFailed(format!("{:?}", e)))?;
        }

        // raster words are native-endian
        for (index, pixel) in output_buf.chunks_exact(3 * bytes_per_sample).enumerate() {
            let rgb = if bytes_per_sample == 1 {
                [pixel[0] as u16, pixel[1] as u16, pixel[2] as u16]
            } else {
                [
                    u16::from_ne_bytes([pixel[0], pixel[1]]),
                    u16::from_ne_bytes([pixel[2], pixel[3]]),
                    u16::from_ne_bytes([pixel[4], pixel[5]]),
                ]
            };
            layout.put_rgb(
                dst,
                index,
                rgb.map(|v| rescale(v, mosaic.bits, layout.bits)),
            );
        }
        Ok(())
    }
}

impl Default for LinearDebayer {
    fn default() -> Self {
        Self::new()
    }
}

fn cfa_for(alignment: CfaAlignment) -> CFA {
    match alignment {
        CfaAlignment::GbRg => CFA::GBRG,
        CfaAlignment::BgGr => CFA::BGGR,
        CfaAlignment::RgGb => CFA::RGGB,
        CfaAlignment::GrBg => CFA::GRBG,
    }
}
