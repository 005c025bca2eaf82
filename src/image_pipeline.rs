//! Image processing pipeline module
//!
//! This module provides a parallel pixel transform engine for still rasters
//! and a frame-by-frame pipeline for animated images, with separate modules
//! for rasters, transforms, palette quantization and animation orchestration.

pub mod common;
pub mod raster;
pub mod transform;
pub mod quantize;
pub mod animation;

pub use common::{
    ProcessingError,
    Result,
};

pub use raster::{
    Bgra,
    Raster,
    Rectangle,
};

pub use transform::{
    ColorMatrix,
    ColorMatrixFilter,
    ParallelTransform,
    PixelTransform,
    TransformOptions,
    TransformOptionsBuilder,
};

pub use quantize::{
    IndexedRaster,
    NeuQuantizer,
    Quantizer,
    QuantizerOptions,
};

pub use animation::{
    AnimatedFormat,
    AnimationConfig,
    AnimationConfigBuilder,
    AnimationHeader,
    AnimationMode,
    AnimationPipeline,
    Disposal,
    Frame,
    FrameMetadata,
    FrameSink,
    FrameSource,
    GifFormat,
    LoopCount,
};
