use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use tiff::encoder::colortype::{self, ColorType};
use tiff::encoder::{Compression, TiffEncoder, TiffValue};
use tiff::tags::Tag;
use tracing::debug;

use crate::image_pipeline::common::error::TiffError;
use crate::image_pipeline::format::ComponentOrder;
use crate::image_pipeline::repack::{component_index, read_sample, scale_up};
use crate::image_pipeline::tiff::types::TiffRaster;
use crate::image_pipeline::tiff::writer::TiffWriter;

const PLANAR_CONTIGUOUS: u16 = 1;
const EXTRA_SAMPLE_ASSOCIATED_ALPHA: u16 = 1;

/// Uncompressed, contiguous TIFF writer backed by the `tiff` crate.
pub struct StandardTiffWriter;

impl TiffWriter for StandardTiffWriter {
    fn write_tiff(
        &self,
        path: &Path,
        raster: &TiffRaster<'_>,
        order: ComponentOrder,
    ) -> Result<usize, TiffError> {
        write_raster(path, raster, order)
    }
}

/// Writes a `width` x `height` raster of `components` samples per pixel.
///
/// Samples deeper than 8 bits are stored left-justified in 16 bits.
pub fn write_tiff<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
    components: usize,
    bits_per_component: u32,
    order: ComponentOrder,
    pixels: &[u8],
) -> Result<usize, TiffError> {
    let raster = TiffRaster {
        width,
        height,
        components,
        bits_per_component,
        pixels,
    };
    write_raster(path.as_ref(), &raster, order)
}

pub fn write_raster(
    path: &Path,
    raster: &TiffRaster<'_>,
    order: ComponentOrder,
) -> Result<usize, TiffError> {
    if path.as_os_str().is_empty() {
        return Err(TiffError::NullArgument("path"));
    }
    validate_raster(raster)?;

    let shown = path.display().to_string();
    debug!(
        path = %shown,
        width = raster.width,
        height = raster.height,
        components = raster.components,
        bits = raster.bits_per_component,
        ?order,
        "Writing TIFF"
    );

    let mut file = File::create(path).map_err(|e| TiffError::FileAccess {
        path: shown.clone(),
        reason: e.to_string(),
    })?;

    let buffer = encode(raster, order).map_err(|e| TiffError::WriteFailed {
        path: shown.clone(),
        reason: e.to_string(),
    })?;

    file.write_all(&buffer)
        .and_then(|_| file.flush())
        .map_err(|e| TiffError::WriteFailed {
            path: shown,
            reason: e.to_string(),
        })?;

    Ok(raster.data_len())
}

/// Encodes `raster` into an in-memory TIFF file.
pub fn encode_tiff(raster: &TiffRaster<'_>, order: ComponentOrder) -> Result<Vec<u8>, TiffError> {
    validate_raster(raster)?;
    encode(raster, order).map_err(|e| TiffError::WriteFailed {
        path: "<memory>".to_string(),
        reason: e.to_string(),
    })
}

fn validate_raster(raster: &TiffRaster<'_>) -> Result<(), TiffError> {
    if raster.pixels.is_empty() {
        return Err(TiffError::NullArgument("pixels"));
    }
    if !(1..=4).contains(&raster.components) {
        return Err(TiffError::InvalidParameters(format!(
            "{} components per pixel",
            raster.components
        )));
    }
    if raster.components == 2 {
        return Err(TiffError::InvalidParameters(
            "two-component rasters have no photometric interpretation".to_string(),
        ));
    }
    if !(1..=16).contains(&raster.bits_per_component) {
        return Err(TiffError::InvalidParameters(format!(
            "{} bits per component",
            raster.bits_per_component
        )));
    }
    if raster.width == 0
        || raster.height == 0
        || u32::try_from(raster.width).is_err()
        || u32::try_from(raster.height).is_err()
    {
        return Err(TiffError::InvalidParameters(format!(
            "image size {}x{}",
            raster.width, raster.height
        )));
    }

    let required = raster.data_len();
    if raster.pixels.len() < required {
        return Err(TiffError::BufferTooSmall {
            required,
            actual: raster.pixels.len(),
        });
    }
    Ok(())
}

fn encode(raster: &TiffRaster<'_>, order: ComponentOrder) -> tiff::TiffResult<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))?
            .with_compression(Compression::Uncompressed);

        let wide = raster.bits_per_component > 8;
        match (raster.components, wide) {
            (1, false) => encode_image::<_, colortype::Gray8>(&mut encoder, raster, order)?,
            (1, true) => encode_image::<_, colortype::Gray16>(&mut encoder, raster, order)?,
            (3, false) => encode_image::<_, colortype::RGB8>(&mut encoder, raster, order)?,
            (3, true) => encode_image::<_, colortype::RGB16>(&mut encoder, raster, order)?,
            (_, false) => encode_image::<_, colortype::RGBA8>(&mut encoder, raster, order)?,
            (_, true) => encode_image::<_, colortype::RGBA16>(&mut encoder, raster, order)?,
        }
    }
    Ok(buffer)
}

/// Sample type stored in the file.
trait StoredSample: Copy {
    fn from_sample(value: u16) -> Self;
}

impl StoredSample for u8 {
    fn from_sample(value: u16) -> Self {
        value as u8
    }
}

impl StoredSample for u16 {
    fn from_sample(value: u16) -> Self {
        value
    }
}

fn encode_image<W, C>(
    encoder: &mut TiffEncoder<W>,
    raster: &TiffRaster<'_>,
    order: ComponentOrder,
) -> tiff::TiffResult<()>
where
    W: Write + Seek,
    C: ColorType,
    C::Inner: StoredSample,
    [C::Inner]: TiffValue,
{
    let width = raster.width;
    let height = raster.height;
    let components = raster.components;
    let pixel_count = raster.pixel_count();
    let bytes = raster.bytes_per_sample();
    let bits = raster.bits_per_component;

    let sample = |index: usize| -> C::Inner {
        let value = read_sample(raster.pixels, index, bytes);
        <C::Inner as StoredSample>::from_sample(if bits > 8 { scale_up(value, bits) } else { value })
    };

    let mut image = encoder.new_image::<C>(width as u32, height as u32)?;
    image
        .encoder()
        .write_tag(Tag::PlanarConfiguration, PLANAR_CONTIGUOUS)?;
    if components == 4 {
        image
            .encoder()
            .write_tag(Tag::ExtraSamples, &[EXTRA_SAMPLE_ASSOCIATED_ALPHA][..])?;
    }

    if components == 1 && bits <= 8 {
        // whole image in a single strip
        image.rows_per_strip(height as u32)?;
        let strip: Vec<C::Inner> = (0..pixel_count).map(sample).collect();
        image.write_strip(&strip)?;
    } else {
        image.rows_per_strip(1)?;
        let mut line: Vec<C::Inner> = Vec::with_capacity(width * components);
        for row in 0..height {
            line.clear();
            for col in 0..width {
                let pixel = row * width + col;
                for channel in 0..components {
                    line.push(sample(component_index(
                        order,
                        pixel_count,
                        components,
                        pixel,
                        channel,
                    )));
                }
            }
            image.write_strip(&line)?;
        }
    }

    image.finish()
}
