use thiserror::Error;

use crate::image_pipeline::raster::Rectangle;

/// Boxed error returned by a caller-supplied frame processor.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Region {region} does not fit a {width}x{height} raster")]
    InvalidRegion {
        region: Rectangle,
        width: usize,
        height: usize,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to decode animation: {0}")]
    DecodeError(String),

    #[error("Failed to quantize frame: {0}")]
    QuantizeError(String),

    #[error("Failed to encode animation: {0}")]
    EncodeError(String),

    #[error("Frame processor failed: {0}")]
    ProcessorError(#[source] BoxedError),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPoolError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ProcessingError {
    /// Wraps an error raised inside a frame processor.
    pub fn processor(error: impl Into<BoxedError>) -> Self {
        Self::ProcessorError(error.into())
    }
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
