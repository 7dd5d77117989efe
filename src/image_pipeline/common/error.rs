use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Destination buffer too small: required {required} bytes, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("Source buffer too small: required {required} bytes, got {actual}")]
    SourceTooSmall { required: usize, actual: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown pixel format code: {0:#010x}")]
    UnknownFormatCode(u32),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Demosaic failed: {0}")]
    DemosaicFailed(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error(transparent)]
    Tiff(#[from] TiffError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Failure kinds of the TIFF raster codec.
///
/// `code()` yields the numeric family used by older callers
/// (-1101 file access through -1107 malformed file).
#[derive(Error, Debug)]
pub enum TiffError {
    #[error("Required argument is empty: {0}")]
    NullArgument(&'static str),

    #[error("Unable to access {path}: {reason}")]
    FileAccess { path: String, reason: String },

    #[error("Buffer too small for image: required {required} bytes, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("Invalid TIFF parameters: {0}")]
    InvalidParameters(String),

    #[error("Write to {path} failed, file is incomplete: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Read from {path} failed: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Malformed TIFF file: {0}")]
    MalformedFile(String),
}

impl TiffError {
    pub fn code(&self) -> i32 {
        match self {
            TiffError::FileAccess { .. } => -1101,
            TiffError::NullArgument(_) => -1102,
            TiffError::BufferTooSmall { .. } => -1103,
            TiffError::InvalidParameters(_) => -1104,
            TiffError::WriteFailed { .. } => -1105,
            TiffError::ReadFailed { .. } => -1106,
            TiffError::MalformedFile(_) => -1107,
        }
    }
}

/// Coarse error domain of the legacy TIFF entry points.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyTiffError {
    #[error("unable to open image file")]
    FileNotFound,

    #[error("bad parameter")]
    BadParameter,

    #[error("TIFF layout not supported for reading")]
    UnsupportedRead,

    #[error("TIFF layout not supported for writing")]
    UnsupportedWrite,
}

impl LegacyTiffError {
    pub fn code(self) -> i32 {
        match self {
            LegacyTiffError::FileNotFound => -1,
            LegacyTiffError::BadParameter => -2,
            LegacyTiffError::UnsupportedRead => -3,
            LegacyTiffError::UnsupportedWrite => -4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiff_error_codes() {
        assert_eq!(TiffError::NullArgument("path").code(), -1102);
        assert_eq!(TiffError::MalformedFile("x".into()).code(), -1107);
        assert_eq!(
            TiffError::WriteFailed { path: "a".into(), reason: "b".into() }.code(),
            -1105
        );
    }

    #[test]
    fn test_legacy_codes() {
        assert_eq!(LegacyTiffError::FileNotFound.code(), -1);
        assert_eq!(LegacyTiffError::BadParameter.code(), -2);
        assert_eq!(LegacyTiffError::UnsupportedRead.code(), -3);
        assert_eq!(LegacyTiffError::UnsupportedWrite.code(), -4);
    }

    #[test]
    fn test_tiff_error_converts() {
        let err: ConversionError = TiffError::NullArgument("pixels").into();
        assert!(matches!(err, ConversionError::Tiff(TiffError::NullArgument(_))));
    }
}
