//! Debayering module for converting Bayer mosaics to RGB

pub mod linear_debayer;
pub mod mosaic_2x2;
pub mod types;

pub use linear_debayer::LinearDebayer;
pub use mosaic_2x2::Nearest2x2Debayer;
pub use types::{BayerMosaic, BayerSamples, DemosaicAlgorithm};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::repack::DestinationLayout;

/// Reconstructs `mosaic` into `dst` with the selected algorithm.
pub fn run_demosaic(
    algorithm: DemosaicAlgorithm,
    mosaic: &BayerMosaic<'_>,
    layout: &DestinationLayout,
    dst: &mut [u8],
) -> Result<()> {
    match algorithm {
        DemosaicAlgorithm::Nearest2x2 => Nearest2x2Debayer::new().process(mosaic, layout, dst),
        DemosaicAlgorithm::Linear => LinearDebayer::new().process(mosaic, layout, dst),
    }
}

/// Checks shared by every algorithm; nothing is written when one fails.
pub(crate) fn validate_demosaic(
    mosaic: &BayerMosaic<'_>,
    layout: &DestinationLayout,
    dst: &[u8],
) -> Result<()> {
    if mosaic.width < 2 || mosaic.height < 2 {
        return Err(ConversionError::InvalidParameters(format!(
            "demosaic needs at least 2x2 pixels, got {}x{}",
            mosaic.width, mosaic.height
        )));
    }
    if layout.is_mono() {
        return Err(ConversionError::InvalidParameters(
            "demosaic destination must be a colour layout".to_string(),
        ));
    }

    let pixel_count = mosaic.width * mosaic.height;
    if layout.pixel_count != pixel_count {
        return Err(ConversionError::InvalidParameters(format!(
            "destination holds {} pixels, mosaic has {}",
            layout.pixel_count, pixel_count
        )));
    }
    if mosaic.sample_count() < pixel_count {
        return Err(ConversionError::SourceTooSmall {
            required: pixel_count * mosaic.sample_bytes(),
            actual: mosaic.sample_count() * mosaic.sample_bytes(),
        });
    }
    let required = layout.required_len();
    if dst.len() < required {
        return Err(ConversionError::BufferTooSmall {
            required,
            actual: dst.len(),
        });
    }
    Ok(())
}
