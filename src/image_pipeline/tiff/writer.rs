use std::path::Path;

use crate::image_pipeline::common::error::TiffError;
use crate::image_pipeline::format::ComponentOrder;
use crate::image_pipeline::tiff::types::TiffRaster;

pub trait TiffWriter {
    /// Stores `raster` at `path`, returning the number of pixel bytes written.
    fn write_tiff(
        &self,
        path: &Path,
        raster: &TiffRaster<'_>,
        order: ComponentOrder,
    ) -> Result<usize, TiffError>;
}
