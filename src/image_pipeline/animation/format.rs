use crate::image_pipeline::animation::types::{AnimationHeader, AnimationMode, Frame};
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::quantize::IndexedRaster;
use crate::image_pipeline::raster::Raster;

/// Decoded frames in display order, yielded one at a time.
pub trait FrameSource: Iterator<Item = Result<Frame<Raster>>> {
    fn header(&self) -> &AnimationHeader;
}

/// Order-sensitive accumulator of encoded frames.
pub trait FrameSink {
    fn add_frame(&mut self, frame: Frame<IndexedRaster>) -> Result<()>;
    fn finish(self: Box<Self>) -> Result<Vec<u8>>;
}

/// Decode and encode capabilities of one animated format.
pub trait AnimatedFormat {
    fn name(&self) -> &'static str;

    /// Fails with `DecodeError` when `data` is not a valid animation.
    fn decode<'a>(&self, data: &'a [u8], mode: AnimationMode) -> Result<Box<dyn FrameSource + 'a>>;

    /// Starts an encoder for a sequence described by `header`.
    fn encoder(&self, header: &AnimationHeader) -> Result<Box<dyn FrameSink>>;
}
