//! Animated image processing module
//!
//! This module decodes multi-frame images, threads each frame through a
//! caller-supplied processor, re-quantizes it and encodes the sequence again.

mod format;
mod gif_format;
mod pipeline;
pub mod types;


pub use format::{AnimatedFormat, FrameSink, FrameSource};
pub use gif_format::GifFormat;
pub use pipeline::AnimationPipeline;
pub use types::{
    AnimationConfig, AnimationConfigBuilder, AnimationHeader, AnimationMode, Disposal, Frame,
    FrameMetadata, LoopCount,
};
