//! Common utilities module
//!
//! Error types shared by the conversion engine and the TIFF codec.

pub mod error;

pub use error::{ConversionError, LegacyTiffError, Result, TiffError};
