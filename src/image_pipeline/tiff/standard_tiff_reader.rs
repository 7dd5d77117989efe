use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::debug;

use crate::image_pipeline::common::error::TiffError;
use crate::image_pipeline::format::ComponentOrder;
use crate::image_pipeline::repack::{component_index, write_sample};
use crate::image_pipeline::tiff::types::{FileByteOrder, Photometric, TiffImage, TiffInfo};

type FileDecoder = Decoder<BufReader<File>>;

/// Reads a TIFF file with components in Normal order.
pub fn read_tiff<P: AsRef<Path>>(path: P) -> Result<TiffImage, TiffError> {
    read_tiff_ordered(path, ComponentOrder::Normal)
}

/// Reads a TIFF file into a freshly allocated buffer, placing colour
/// components in `order`.
pub fn read_tiff_ordered<P: AsRef<Path>>(
    path: P,
    order: ComponentOrder,
) -> Result<TiffImage, TiffError> {
    let path = path.as_ref();
    let (mut decoder, info) = open(path)?;
    let mut pixels = vec![0u8; info.decoded_len()];
    decode_into(&mut decoder, &info, path, order, &mut pixels)?;
    Ok(TiffImage {
        width: info.width,
        height: info.height,
        components: info.components,
        bits_per_component: info.decoded_bits(),
        pixels,
    })
}

/// Reads a TIFF file into a caller-provided buffer.
///
/// The buffer is checked against the decoded size before any pixel data is read.
pub fn read_tiff_into<P: AsRef<Path>>(
    path: P,
    order: ComponentOrder,
    dst: &mut [u8],
) -> Result<TiffInfo, TiffError> {
    let path = path.as_ref();
    let (mut decoder, info) = open(path)?;
    let required = info.decoded_len();
    if dst.len() < required {
        return Err(TiffError::BufferTooSmall {
            required,
            actual: dst.len(),
        });
    }
    decode_into(&mut decoder, &info, path, order, &mut dst[..required])?;
    Ok(info)
}

/// Reads the header of a TIFF file without decoding pixel data.
pub fn tiff_info<P: AsRef<Path>>(path: P) -> Result<TiffInfo, TiffError> {
    open(path.as_ref()).map(|(_, info)| info)
}

fn open(path: &Path) -> Result<(FileDecoder, TiffInfo), TiffError> {
    if path.as_os_str().is_empty() {
        return Err(TiffError::NullArgument("path"));
    }
    let shown = path.display().to_string();
    let read_failed = |e: std::io::Error| TiffError::ReadFailed {
        path: shown.clone(),
        reason: e.to_string(),
    };

    let mut file = File::open(path).map_err(|e| TiffError::FileAccess {
        path: shown.clone(),
        reason: e.to_string(),
    })?;

    let mut magic = [0u8; 2];
    file.read_exact(&mut magic).map_err(read_failed)?;
    let byte_order = match &magic {
        b"II" => FileByteOrder::LittleEndian,
        b"MM" => FileByteOrder::BigEndian,
        _ => {
            return Err(TiffError::MalformedFile(format!(
                "{shown}: missing TIFF byte order mark"
            )));
        }
    };
    file.seek(SeekFrom::Start(0)).map_err(read_failed)?;

    let mut decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| decode_error(&shown, e))?;
    let info = probe(&mut decoder, byte_order, &shown)?;
    debug!(
        path = %shown,
        width = info.width,
        height = info.height,
        bits = info.bits_per_sample,
        components = info.components,
        photometric = ?info.photometric,
        byte_order = ?info.byte_order,
        "Opened TIFF"
    );
    Ok((decoder, info))
}

fn decode_error(path: &str, err: tiff::TiffError) -> TiffError {
    match err {
        tiff::TiffError::IoError(e) => TiffError::ReadFailed {
            path: path.to_string(),
            reason: e.to_string(),
        },
        other => TiffError::MalformedFile(format!("{path}: {other}")),
    }
}

fn probe(
    decoder: &mut FileDecoder,
    byte_order: FileByteOrder,
    path: &str,
) -> Result<TiffInfo, TiffError> {
    let malformed = |what: String| TiffError::MalformedFile(format!("{path}: {what}"));

    let (width, height) = decoder.dimensions().map_err(|e| decode_error(path, e))?;
    let samples_per_pixel = decoder
        .find_tag_unsigned::<u16>(Tag::SamplesPerPixel)
        .map_err(|e| decode_error(path, e))?
        .unwrap_or(1) as usize;
    let bits_per_sample = decoder
        .find_tag_unsigned_vec::<u16>(Tag::BitsPerSample)
        .map_err(|e| decode_error(path, e))?
        .and_then(|bits| bits.first().copied())
        .unwrap_or(1) as u32;
    let photometric_tag = decoder
        .get_tag_unsigned::<u16>(Tag::PhotometricInterpretation)
        .map_err(|e| decode_error(path, e))?;
    let photometric = Photometric::from_tag(photometric_tag)
        .ok_or_else(|| malformed(format!("unsupported photometric interpretation {photometric_tag}")))?;

    let components = match photometric {
        Photometric::MinIsBlack | Photometric::MinIsWhite => {
            if samples_per_pixel != 1 {
                return Err(malformed(format!(
                    "monochrome image with {samples_per_pixel} samples per pixel"
                )));
            }
            1
        }
        Photometric::Rgb => {
            if !matches!(samples_per_pixel, 3 | 4) {
                return Err(malformed(format!(
                    "RGB image with {samples_per_pixel} samples per pixel"
                )));
            }
            samples_per_pixel
        }
        Photometric::Palette => {
            if bits_per_sample > 8 {
                return Err(malformed(format!(
                    "palette image with {bits_per_sample}-bit indices"
                )));
            }
            if samples_per_pixel != 1 {
                return Err(malformed(format!(
                    "palette image with {samples_per_pixel} samples per pixel"
                )));
            }
            3
        }
    };
    if !matches!(bits_per_sample, 8 | 16) {
        return Err(malformed(format!("unsupported {bits_per_sample}-bit samples")));
    }

    Ok(TiffInfo {
        width: width as usize,
        height: height as usize,
        bits_per_sample,
        samples_per_pixel,
        components,
        photometric,
        byte_order,
    })
}

/// 256-entry RGB table scaled from the 16-bit colour map, or a grey ramp.
fn palette_table(decoder: &mut FileDecoder, path: &str) -> Result<Vec<[u8; 3]>, TiffError> {
    let scale = |entry: u16| ((entry as u32 * 256) / 65535).min(255) as u8;

    let map = decoder
        .find_tag_unsigned_vec::<u16>(Tag::ColorMap)
        .map_err(|e| decode_error(path, e))?;
    let mut table: Vec<[u8; 3]> = (0..=255u8).map(|i| [i, i, i]).collect();
    if let Some(map) = map {
        let entries = (map.len() / 3).min(256);
        let stride = map.len() / 3;
        for (i, slot) in table.iter_mut().enumerate().take(entries) {
            *slot = [
                scale(map[i]),
                scale(map[stride + i]),
                scale(map[2 * stride + i]),
            ];
        }
    }
    Ok(table)
}

fn decode_into(
    decoder: &mut FileDecoder,
    info: &TiffInfo,
    path: &Path,
    order: ComponentOrder,
    dst: &mut [u8],
) -> Result<(), TiffError> {
    let shown = path.display().to_string();
    let pixel_count = info.width * info.height;
    let components = info.components;

    if info.photometric == Photometric::Palette {
        let table = palette_table(decoder, &shown)?;
        let indices = read_palette_indices(decoder, path, &shown, pixel_count)?;
        for (pixel, &index) in indices.iter().enumerate() {
            let rgb = table[index as usize];
            for (channel, &value) in rgb.iter().enumerate() {
                dst[component_index(order, pixel_count, 3, pixel, channel)] = value;
            }
        }
        return Ok(());
    }

    // The decoder inverts MinIsWhite samples; callers get them as stored.
    let as_stored = info.photometric == Photometric::MinIsWhite;
    let expected = pixel_count * components;

    match decoder.read_image().map_err(|e| decode_error(&shown, e))? {
        DecodingResult::U8(mut data) => {
            check_len(data.len(), expected, &shown)?;
            if as_stored {
                data.iter_mut().for_each(|v| *v = !*v);
            }
            if components == 4 && order == ComponentOrder::Normal {
                dst[..expected].copy_from_slice(&data[..expected]);
            } else {
                for pixel in 0..pixel_count {
                    for channel in 0..components {
                        dst[component_index(order, pixel_count, components, pixel, channel)] =
                            data[pixel * components + channel];
                    }
                }
            }
        }
        DecodingResult::U16(mut data) => {
            check_len(data.len(), expected, &shown)?;
            if as_stored {
                data.iter_mut().for_each(|v| *v = !*v);
            }
            if info.byte_order == FileByteOrder::BigEndian {
                debug!(path = %shown, "Swapping big-endian samples to little-endian");
            }
            for pixel in 0..pixel_count {
                for channel in 0..components {
                    let index = component_index(order, pixel_count, components, pixel, channel);
                    write_sample(dst, index * 2, 2, data[pixel * components + channel]);
                }
            }
        }
        _ => {
            return Err(TiffError::MalformedFile(format!(
                "{shown}: unsupported sample layout"
            )));
        }
    }
    Ok(())
}

/// Reads the raw 8-bit indices of an uncompressed palette image strip by strip.
fn read_palette_indices(
    decoder: &mut FileDecoder,
    path: &Path,
    shown: &str,
    pixel_count: usize,
) -> Result<Vec<u8>, TiffError> {
    let compression = decoder
        .find_tag_unsigned::<u16>(Tag::Compression)
        .map_err(|e| decode_error(shown, e))?
        .unwrap_or(1);
    if compression != 1 {
        return Err(TiffError::MalformedFile(format!(
            "{shown}: palette image with compression {compression}"
        )));
    }

    let offsets = decoder
        .get_tag_u64_vec(Tag::StripOffsets)
        .map_err(|e| decode_error(shown, e))?;
    let byte_counts = decoder
        .get_tag_u64_vec(Tag::StripByteCounts)
        .map_err(|e| decode_error(shown, e))?;
    if offsets.len() != byte_counts.len() {
        return Err(TiffError::MalformedFile(format!(
            "{shown}: {} strip offsets but {} strip byte counts",
            offsets.len(),
            byte_counts.len()
        )));
    }

    let read_failed = |e: std::io::Error| TiffError::ReadFailed {
        path: shown.to_string(),
        reason: e.to_string(),
    };
    let mut file = File::open(path).map_err(|e| TiffError::FileAccess {
        path: shown.to_string(),
        reason: e.to_string(),
    })?;

    let mut indices = vec![0u8; pixel_count];
    let mut filled = 0;
    for (&offset, &byte_count) in offsets.iter().zip(&byte_counts) {
        if filled == pixel_count {
            break;
        }
        let take = usize::try_from(byte_count)
            .unwrap_or(usize::MAX)
            .min(pixel_count - filled);
        file.seek(SeekFrom::Start(offset)).map_err(read_failed)?;
        file.read_exact(&mut indices[filled..filled + take])
            .map_err(read_failed)?;
        filled += take;
    }
    check_len(filled, pixel_count, shown)?;
    Ok(indices)
}

fn check_len(actual: usize, expected: usize, path: &str) -> Result<(), TiffError> {
    if actual < expected {
        return Err(TiffError::MalformedFile(format!(
            "{path}: decoded {actual} samples, expected {expected}"
        )));
    }
    Ok(())
}
