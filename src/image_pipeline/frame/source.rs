use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::frame::types::RawFrame;

pub trait FrameSource {
    fn read_frame(&self, data: &[u8]) -> Result<RawFrame>;
}
