use anyhow::{Context, bail};
use frame_codec_rs::image_pipeline::{
    ConversionConfig, DemosaicAlgorithm, FrameToTiffPipeline, PixelFormat, RawDumpSource,
};
use frame_codec_rs::logger;

use tracing::{error, info};

const USAGE: &str =
    "usage: frame_codec_rs <input.raw> <width> <height> <format-code> <output.tif> [bits] [--linear] [--mosaic]";

fn parse_code(text: &str) -> anyhow::Result<u32> {
    let code = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    code.with_context(|| format!("invalid pixel format code {text:?}"))
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (positional, flags): (Vec<&String>, Vec<&String>) =
        args.iter().partition(|arg| !arg.starts_with("--"));
    if positional.len() < 5 {
        bail!(USAGE);
    }

    let input = positional[0];
    let width: usize = positional[1].parse().context("invalid width")?;
    let height: usize = positional[2].parse().context("invalid height")?;
    let format = PixelFormat::from_code_or_mono8(parse_code(positional[3])?);
    let output = positional[4];
    let bits: u32 = match positional.get(5) {
        Some(bits) => bits.parse().context("invalid bit depth")?,
        None => 0,
    };

    let algorithm = if flags.iter().any(|flag| *flag == "--linear") {
        DemosaicAlgorithm::Linear
    } else {
        DemosaicAlgorithm::Nearest2x2
    };
    let config = ConversionConfig::builder()
        .demosaic_algorithm(algorithm)
        .convert_bayer(!flags.iter().any(|flag| *flag == "--mosaic"))
        .build();

    info!("Starting frame_codec...");

    let source = RawDumpSource::new(width, height, format).with_bits_per_sample(bits);
    let pipeline = FrameToTiffPipeline::new(source, config);

    info!("Frame to TIFF pipeline initialized");
    info!("Format: {}", format);
    info!("Demosaic: {:?}", pipeline.config().demosaic_algorithm);
    info!(
        "Bayer conversion: {}",
        if pipeline.config().convert_bayer {
            "enabled"
        } else {
            "disabled"
        }
    );

    match pipeline.convert_file(input, output) {
        Ok(bytes) => info!("Conversion successful! {} pixel bytes written", bytes),
        Err(e) => {
            error!("Conversion failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
