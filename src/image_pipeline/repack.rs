//! Component repacking module
//!
//! Depth scaling, packed sample unpacking, channel reordering, alpha synthesis and
//! the generic Mono/RGB pixel pipe shared by every decoder.

pub mod layout;
pub mod pixel_pipe;
pub mod reorder;
pub mod sample;
pub mod unpack;

pub use layout::{DestinationLayout, LayoutKind};
pub use pixel_pipe::{repack_pixels, PixelSource};
pub use reorder::{component_index, reorder};
pub use sample::{inject_alpha, opaque, read_sample, rescale, scale_up, write_sample};
pub use unpack::{packed_len, packed_sample, unpack, unpack_to_vec};
