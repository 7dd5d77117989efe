use std::borrow::Cow;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::convert::convert_with_config,
    format::{ColorModel, Packing, PixelFormat},
    frame::{FrameSource, RawFrame, RawDumpSource},
    tiff::{tiff_layout_for, ConversionConfig, StandardTiffWriter, TiffRaster, TiffWriter},
};

/// Format a frame is converted to before it is written to TIFF.
pub fn storage_format(format: PixelFormat, convert_bayer: bool) -> PixelFormat {
    let desc = format.descriptor();
    match (desc.model, desc.packing) {
        (ColorModel::Bayer(_), _) if convert_bayer => format.demosaiced(),
        (ColorModel::Mono | ColorModel::Bayer(_), Packing::Packed) => format.unpacked(),
        (ColorModel::Rgb, Packing::Packed) => PixelFormat::Rgb10Packed,
        (ColorModel::Yuv(_) | ColorModel::BiColor(_), _) => PixelFormat::Rgb8Packed,
        _ => format,
    }
}

pub struct FrameToTiffPipeline<S: FrameSource, W: TiffWriter> {
    source: S,
    writer: W,
    config: ConversionConfig,
}

impl FrameToTiffPipeline<RawDumpSource, StandardTiffWriter> {
    pub fn new(source: RawDumpSource, config: ConversionConfig) -> Self {
        Self {
            source,
            writer: StandardTiffWriter,
            config,
        }
    }
}

impl<S: FrameSource, W: TiffWriter> FrameToTiffPipeline<S, W> {
    pub fn with_custom(source: S, writer: W, config: ConversionConfig) -> Self {
        Self {
            source,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(width, height, max, "Frame exceeds maximum dimension");
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Converts `frame` into its storage format, borrowing it when no work is needed.
    fn to_storage<'a>(&self, frame: &'a RawFrame) -> Result<(PixelFormat, Cow<'a, [u8]>)> {
        let target = storage_format(frame.format, self.config.convert_bayer);
        let nominal = frame.bits_per_sample == 0 || frame.bits_per_sample == frame.format.bits();
        if target == frame.format && nominal {
            return Ok((target, Cow::Borrowed(frame.view()?.data())));
        }

        let mut converted = vec![0u8; target.descriptor().frame_len(frame.width, frame.height)?];
        convert_with_config(
            &self.config,
            frame.width,
            frame.height,
            frame.format,
            frame.bits_per_sample,
            &frame.data,
            target,
            &mut converted,
        )?;
        Ok((target, Cow::Owned(converted)))
    }

    /// Reads one frame from `input_data`, converts it and stores it at
    /// `output_path`. Returns the number of pixel bytes written.
    #[instrument(skip(self, input_data, output_path), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output_path: &Path) -> Result<usize> {
        info!("Starting frame to TIFF conversion");

        let frame = {
            let _span = tracing::info_span!("read_frame").entered();
            self.source.read_frame(input_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = frame.width,
                height = frame.height
            ).entered();
            self.validate_dimensions(frame.width, frame.height)?;
        }

        let (format, pixels) = {
            let _span = tracing::info_span!("convert_frame", format = %frame.format).entered();
            self.to_storage(&frame)?
        };

        let written = {
            let _span = tracing::info_span!("encode_tiff", storage = %format).entered();
            let layout = tiff_layout_for(format)?;
            let raster = TiffRaster {
                width: frame.width * layout.width_factor,
                height: frame.height,
                components: layout.components,
                bits_per_component: layout.bits_per_component,
                pixels: &pixels,
            };
            self.writer.write_tiff(output_path, &raster, layout.order)?
        };

        info!(
            width = frame.width,
            height = frame.height,
            format = %format,
            bytes = written,
            "Conversion complete"
        );
        Ok(written)
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<usize> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        self.convert(&input_data, output_path)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}
