#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use crate::image_pipeline::common::error::{ConversionError, LegacyTiffError, Result, TiffError};
    use crate::image_pipeline::conversions::{
        convert, convert_with_config, storage_format, FrameToTiffPipeline,
    };
    use crate::image_pipeline::debayer::DemosaicAlgorithm;
    use crate::image_pipeline::format::{ComponentOrder, PixelFormat};
    use crate::image_pipeline::frame::{FrameSource, RawDumpSource, RawFrame};
    use crate::image_pipeline::tiff::{
        read_tiff, read_tiff_into, read_tiff_legacy, tiff_info, write_tiff, write_tiff_legacy,
        ConversionConfig, FileByteOrder, Photometric, TiffRaster, TiffWriter,
    };

    struct MockSource {
        should_fail: bool,
        mock_frame: Option<RawFrame>,
    }

    impl FrameSource for MockSource {
        fn read_frame(&self, _data: &[u8]) -> Result<RawFrame> {
            if self.should_fail {
                return Err(ConversionError::InputReadError("Mock read error".to_string()));
            }
            Ok(self.mock_frame.clone().unwrap_or(RawFrame {
                width: 100,
                height: 100,
                format: PixelFormat::Mono8,
                bits_per_sample: 0,
                data: vec![0u8; 100 * 100],
            }))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Written {
        width: usize,
        height: usize,
        components: usize,
        bits: u32,
        order: ComponentOrder,
        pixels: Vec<u8>,
    }

    struct MockWriter {
        should_fail: bool,
        written_data: Arc<Mutex<Vec<Written>>>,
    }

    impl TiffWriter for MockWriter {
        fn write_tiff(
            &self,
            path: &Path,
            raster: &TiffRaster<'_>,
            order: ComponentOrder,
        ) -> std::result::Result<usize, TiffError> {
            if self.should_fail {
                return Err(TiffError::WriteFailed {
                    path: path.display().to_string(),
                    reason: "Mock encode error".to_string(),
                });
            }
            self.written_data.lock().unwrap().push(Written {
                width: raster.width,
                height: raster.height,
                components: raster.components,
                bits: raster.bits_per_component,
                order,
                pixels: raster.pixels[..raster.data_len()].to_vec(),
            });
            Ok(raster.data_len())
        }
    }

    fn frame(width: usize, height: usize, format: PixelFormat, data: Vec<u8>) -> RawFrame {
        RawFrame {
            width,
            height,
            format,
            bits_per_sample: 0,
            data,
        }
    }

    fn mock_pipeline(
        mock_frame: Option<RawFrame>,
        config: ConversionConfig,
    ) -> (FrameToTiffPipeline<MockSource, MockWriter>, Arc<Mutex<Vec<Written>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let source = MockSource { should_fail: false, mock_frame };
        let writer = MockWriter { should_fail: false, written_data: written.clone() };
        (FrameToTiffPipeline::with_custom(source, writer, config), written)
    }

    #[test]
    fn test_config_builder() {
        let config = ConversionConfig::builder()
            .demosaic_algorithm(DemosaicAlgorithm::Linear)
            .convert_bayer(false)
            .validate_dimensions(false)
            .max_dimension(Some(10000))
            .build();

        assert_eq!(config.demosaic_algorithm, DemosaicAlgorithm::Linear);
        assert!(!config.convert_bayer);
        assert!(!config.validate_dimensions);
        assert_eq!(config.max_dimension, Some(10000));

        let default = ConversionConfig::default();
        assert_eq!(default.demosaic_algorithm, DemosaicAlgorithm::Nearest2x2);
        assert!(default.convert_bayer);
    }

    #[test]
    fn test_successful_conversion() {
        let (pipeline, written) = mock_pipeline(None, ConversionConfig::default());

        let result = pipeline.convert(b"fake frame", Path::new("out.tif"));

        assert_eq!(result.unwrap(), 100 * 100);
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!((written[0].components, written[0].bits), (1, 8));
    }

    #[test]
    fn test_source_failure() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let source = MockSource { should_fail: true, mock_frame: None };
        let writer = MockWriter { should_fail: false, written_data: written.clone() };
        let pipeline = FrameToTiffPipeline::with_custom(source, writer, ConversionConfig::default());

        let result = pipeline.convert(b"fake frame", Path::new("out.tif"));

        assert!(matches!(result.unwrap_err(), ConversionError::InputReadError(_)));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_writer_failure() {
        let source = MockSource { should_fail: false, mock_frame: None };
        let writer = MockWriter { should_fail: true, written_data: Arc::new(Mutex::new(Vec::new())) };
        let pipeline = FrameToTiffPipeline::with_custom(source, writer, ConversionConfig::default());

        let result = pipeline.convert(b"fake frame", Path::new("out.tif"));

        assert!(matches!(
            result.unwrap_err(),
            ConversionError::Tiff(TiffError::WriteFailed { .. })
        ));
    }

    #[test]
    fn test_dimension_validation_success() {
        let config = ConversionConfig::builder()
            .validate_dimensions(true)
            .max_dimension(Some(2000))
            .build();
        let mock = frame(1000, 1000, PixelFormat::Mono8, vec![0u8; 1000 * 1000]);
        let (pipeline, _) = mock_pipeline(Some(mock), config);

        assert!(pipeline.convert(b"fake frame", Path::new("out.tif")).is_ok());
    }

    #[test]
    fn test_dimension_validation_failure() {
        let config = ConversionConfig::builder()
            .validate_dimensions(true)
            .max_dimension(Some(64))
            .build();
        let mock = frame(100, 10, PixelFormat::Mono8, vec![0u8; 1000]);
        let (pipeline, written) = mock_pipeline(Some(mock), config);

        let result = pipeline.convert(b"fake frame", Path::new("out.tif"));

        assert!(matches!(result.unwrap_err(), ConversionError::InvalidDimensions(100, 10)));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_validation_disabled() {
        let config = ConversionConfig::builder()
            .validate_dimensions(false)
            .max_dimension(Some(64))
            .build();
        let mock = frame(100, 10, PixelFormat::Mono8, vec![0u8; 1000]);
        let (pipeline, _) = mock_pipeline(Some(mock), config);

        assert!(pipeline.convert(b"fake frame", Path::new("out.tif")).is_ok());
    }

    #[test]
    fn test_bayer_frame_is_demosaiced() {
        let mock = frame(4, 4, PixelFormat::BayerRg8, vec![77u8; 16]);
        let (pipeline, written) = mock_pipeline(Some(mock.clone()), ConversionConfig::default());

        assert_eq!(pipeline.convert(b"", Path::new("out.tif")).unwrap(), 48);
        {
            let written = written.lock().unwrap();
            assert_eq!((written[0].components, written[0].bits), (3, 8));
            assert!(written[0].pixels.iter().all(|&v| v == 77));
        }

        let config = ConversionConfig::builder().convert_bayer(false).build();
        let (pipeline, written) = mock_pipeline(Some(mock), config);
        assert_eq!(pipeline.convert(b"", Path::new("out.tif")).unwrap(), 16);
        assert_eq!(written.lock().unwrap()[0].components, 1);
    }

    #[test]
    fn test_storage_layouts() {
        let bgr = frame(2, 1, PixelFormat::Bgr8Packed, vec![1, 2, 3, 4, 5, 6]);
        let (pipeline, written) = mock_pipeline(Some(bgr), ConversionConfig::default());
        pipeline.convert(b"", Path::new("out.tif")).unwrap();
        assert_eq!(written.lock().unwrap()[0].order, ComponentOrder::Reverse);

        let yuv = frame(2, 1, PixelFormat::Yuv422Packed, vec![128; 4]);
        let (pipeline, written) = mock_pipeline(Some(yuv), ConversionConfig::default());
        pipeline.convert(b"", Path::new("out.tif")).unwrap();
        let written = written.lock().unwrap();
        assert_eq!(written[0].components, 3);
        assert_eq!(written[0].pixels, vec![128; 6]);
    }

    #[test]
    fn test_storage_format_mapping() {
        assert_eq!(storage_format(PixelFormat::Mono12Packed, true), PixelFormat::Mono12);
        assert_eq!(storage_format(PixelFormat::BayerGb10Packed, true), PixelFormat::Rgb10Packed);
        assert_eq!(storage_format(PixelFormat::BayerGb10Packed, false), PixelFormat::BayerGb10);
        assert_eq!(storage_format(PixelFormat::Rgb10V1Packed, true), PixelFormat::Rgb10Packed);
        assert_eq!(storage_format(PixelFormat::BiColorBgrg12, true), PixelFormat::Rgb8Packed);
        assert_eq!(storage_format(PixelFormat::Rgba8Packed, true), PixelFormat::Rgba8Packed);
    }

    #[test]
    fn test_dump_file_to_tiff() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("frame.raw");
        let output = dir.path().join("frame.tif");
        // 12 significant bits in a 16-bit container
        let samples: Vec<u8> = [0x0ABCu16; 4].iter().flat_map(|v| v.to_le_bytes()).collect();
        std::fs::write(&input, &samples).unwrap();

        let source = RawDumpSource::new(2, 2, PixelFormat::Mono16).with_bits_per_sample(12);
        let pipeline = FrameToTiffPipeline::new(source, ConversionConfig::default());
        assert_eq!(pipeline.convert_file(&input, &output).unwrap(), 8);

        let image = read_tiff(&output).unwrap();
        assert_eq!(image.bits_per_component, 16);
        for word in image.pixels.chunks_exact(2) {
            assert_eq!(u16::from_le_bytes([word[0], word[1]]), 0xABC0);
        }

        let missing = pipeline.convert_file(dir.path().join("nope.raw"), &output);
        assert!(matches!(missing.unwrap_err(), ConversionError::InputReadError(_)));
    }

    #[test]
    fn test_linear_demosaic_of_8bit_samples_in_16bit_container() {
        let (w, h) = (4, 4);
        let src: Vec<u8> = std::iter::repeat([0x50u8, 0x00]).take(w * h).flatten().collect();

        let mut nearest = vec![0u8; w * h * 3];
        convert(w, h, PixelFormat::BayerRg12, 8, &src, PixelFormat::Rgb8Packed, &mut nearest)
            .unwrap();

        let config = ConversionConfig::builder()
            .demosaic_algorithm(DemosaicAlgorithm::Linear)
            .build();
        let mut linear = vec![0u8; w * h * 3];
        convert_with_config(
            &config,
            w,
            h,
            PixelFormat::BayerRg12,
            8,
            &src,
            PixelFormat::Rgb8Packed,
            &mut linear,
        )
        .unwrap();

        assert!(nearest.iter().all(|&v| v == 0x50));
        assert_eq!(linear, nearest);
    }

    #[test]
    fn test_tiff_round_trip_4x4() {
        let dir = tempfile::tempdir().unwrap();
        for components in [1usize, 3, 4] {
            let path = dir.path().join(format!("round_{components}.tif"));
            let pixels: Vec<u8> = (0..16 * components).map(|i| (i * 7 % 256) as u8).collect();

            let written =
                write_tiff(&path, 4, 4, components, 8, ComponentOrder::Normal, &pixels).unwrap();
            assert_eq!(written, pixels.len());

            let image = read_tiff(&path).unwrap();
            assert_eq!((image.width, image.height), (4, 4));
            assert_eq!(image.components, components);
            assert_eq!(image.bits_per_component, 8);
            assert_eq!(image.pixels, pixels);
        }
    }

    #[test]
    fn test_12bit_depth_scaling() {
        let value = 0x0ABCu16;
        let mut narrow = [0u8; 1];
        convert(1, 1, PixelFormat::Mono12, 0, &value.to_le_bytes(), PixelFormat::Mono8, &mut narrow)
            .unwrap();
        assert_eq!(narrow[0] as u16, value >> 4);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono12.tif");
        write_tiff(&path, 1, 1, 1, 12, ComponentOrder::Normal, &value.to_le_bytes()).unwrap();
        let image = read_tiff(&path).unwrap();
        assert_eq!(u16::from_le_bytes([image.pixels[0], image.pixels[1]]), value << 4);
    }

    #[test]
    fn test_reverse_and_planar_orders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planar.tif");
        // R plane, G plane, B plane of a 2x1 image
        let planar = [1u8, 2, 10, 20, 100, 200];
        write_tiff(&path, 2, 1, 3, 8, ComponentOrder::Planar, &planar).unwrap();
        assert_eq!(read_tiff(&path).unwrap().pixels, vec![1, 10, 100, 2, 20, 200]);

        let image = crate::image_pipeline::tiff::read_tiff_ordered(&path, ComponentOrder::Reverse)
            .unwrap();
        assert_eq!(image.pixels, vec![100, 10, 1, 200, 20, 2]);
    }

    const SHORT: u16 = 3;
    const LONG: u16 = 4;

    /// Builds an uncompressed single-strip TIFF by hand.
    #[allow(clippy::too_many_arguments)]
    fn handmade_tiff(
        big_endian: bool,
        width: u16,
        height: u16,
        bits: u16,
        photometric: u16,
        samples_per_pixel: u16,
        color_map: Option<&[u16]>,
        pixels: &[u8],
    ) -> Vec<u8> {
        let w16 = |v: u16| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        let w32 = |v: u32| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        let short = |v: u16| {
            let b = w16(v);
            [b[0], b[1], 0, 0]
        };

        let mut out = Vec::new();
        out.extend_from_slice(if big_endian { b"MM" } else { b"II" });
        out.extend_from_slice(&w16(42));
        out.extend_from_slice(&w32(0));

        let strip_offset = out.len() as u32;
        out.extend_from_slice(pixels);
        if out.len() % 2 == 1 {
            out.push(0);
        }
        let map_offset = out.len() as u32;
        for &entry in color_map.unwrap_or(&[]) {
            out.extend_from_slice(&w16(entry));
        }
        let ifd_offset = out.len() as u32;
        out[4..8].copy_from_slice(&w32(ifd_offset));

        let mut entries: Vec<(u16, u16, u32, [u8; 4])> = vec![
            (256, SHORT, 1, short(width)),
            (257, SHORT, 1, short(height)),
            (258, SHORT, 1, short(bits)),
            (259, SHORT, 1, short(1)),
            (262, SHORT, 1, short(photometric)),
            (273, LONG, 1, w32(strip_offset)),
            (277, SHORT, 1, short(samples_per_pixel)),
            (278, SHORT, 1, short(height)),
            (279, LONG, 1, w32(pixels.len() as u32)),
        ];
        if let Some(map) = color_map {
            entries.push((320, SHORT, map.len() as u32, w32(map_offset)));
        }

        out.extend_from_slice(&w16(entries.len() as u16));
        for (tag, kind, count, value) in entries {
            out.extend_from_slice(&w16(tag));
            out.extend_from_slice(&w16(kind));
            out.extend_from_slice(&w32(count));
            out.extend_from_slice(&value);
        }
        out.extend_from_slice(&w32(0));
        out
    }

    #[test]
    fn test_palette_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.tif");
        let mut map = vec![0u16; 3 * 256];
        map[1] = 65535;
        map[512 + 2] = 32768;
        std::fs::write(&path, handmade_tiff(false, 3, 1, 8, 3, 1, Some(&map), &[0, 1, 2])).unwrap();

        let info = tiff_info(&path).unwrap();
        assert_eq!(info.photometric, Photometric::Palette);
        assert_eq!(info.components, 3);

        let image = read_tiff(&path).unwrap();
        assert_eq!(image.components, 3);
        assert_eq!(image.pixels, vec![0, 0, 0, 255, 0, 0, 0, 0, 128]);
    }

    #[test]
    fn test_min_is_white_samples_read_as_stored() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("white8.tif");
        std::fs::write(&path, handmade_tiff(false, 2, 1, 8, 0, 1, None, &[10, 200])).unwrap();
        let info = tiff_info(&path).unwrap();
        assert_eq!(info.photometric, Photometric::MinIsWhite);
        assert_eq!(read_tiff(&path).unwrap().pixels, vec![10, 200]);

        let path = dir.path().join("white16.tif");
        let pixels = [0x34u8, 0x12, 0xCD, 0xAB];
        std::fs::write(&path, handmade_tiff(false, 2, 1, 16, 0, 1, None, &pixels)).unwrap();
        assert_eq!(read_tiff(&path).unwrap().pixels, pixels.to_vec());
    }

    #[test]
    fn test_big_endian_16bit_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("be16.tif");
        let pixels = [0x12u8, 0x34, 0xAB, 0xCD];
        std::fs::write(&path, handmade_tiff(true, 2, 1, 16, 1, 1, None, &pixels)).unwrap();

        let info = tiff_info(&path).unwrap();
        assert_eq!(info.byte_order, FileByteOrder::BigEndian);
        assert_eq!(info.bits_per_sample, 16);

        let image = read_tiff(&path).unwrap();
        assert_eq!(image.pixels, vec![0x34, 0x12, 0xCD, 0xAB]);
    }

    #[test]
    fn test_malformed_files() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("palette16.tif");
        std::fs::write(&path, handmade_tiff(false, 1, 1, 16, 3, 1, None, &[0, 0])).unwrap();
        assert!(matches!(read_tiff(&path).unwrap_err(), TiffError::MalformedFile(_)));

        let path = dir.path().join("grey3.tif");
        std::fs::write(&path, handmade_tiff(false, 1, 1, 8, 1, 3, None, &[0, 0, 0])).unwrap();
        assert!(matches!(read_tiff(&path).unwrap_err(), TiffError::MalformedFile(_)));

        let path = dir.path().join("not_a_tiff.tif");
        std::fs::write(&path, b"PK\x03\x04 definitely not a tiff").unwrap();
        let err = read_tiff(&path).unwrap_err();
        assert_eq!(err.code(), -1107);
    }

    #[test]
    fn test_read_into_short_buffer_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.tif");
        write_tiff(&path, 4, 4, 3, 8, ComponentOrder::Normal, &[9u8; 48]).unwrap();

        let mut dst = vec![0u8; 47];
        let err = read_tiff_into(&path, ComponentOrder::Normal, &mut dst).unwrap_err();
        assert!(matches!(err, TiffError::BufferTooSmall { required: 48, actual: 47 }));
        assert!(dst.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_missing_file_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.tif");

        assert_eq!(read_tiff(&path).unwrap_err().code(), -1101);
        assert_eq!(
            read_tiff_legacy(&path, &mut [0u8; 4]).unwrap_err(),
            LegacyTiffError::FileNotFound
        );
        assert_eq!(
            write_tiff_legacy(&path, 2, 2, 7, false, &[0u8; 4]).unwrap_err().code(),
            -4
        );
    }
}
