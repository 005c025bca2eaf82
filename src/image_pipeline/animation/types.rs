//! Animation frame and configuration types

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::quantize::QuantizerOptions;

/// What happens to a frame's area before the next frame is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposal {
    /// No disposal specified
    #[default]
    Any,
    /// Leave the frame in place
    Keep,
    /// Clear the frame area to the background
    Background,
    /// Restore what was there before the frame
    Previous,
}

/// Per-frame timing and compositing hints, forwarded untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameMetadata {
    /// Display time in hundredths of a second
    pub delay: u16,
    pub disposal: Disposal,
    pub needs_user_input: bool,
}

/// One frame of an animation: an image payload placed on the logical screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<T> {
    pub image: T,
    pub left: usize,
    pub top: usize,
    pub metadata: FrameMetadata,
}

impl<T> Frame<T> {
    pub fn new(image: T, metadata: FrameMetadata) -> Self {
        Self {
            image,
            left: 0,
            top: 0,
            metadata,
        }
    }

    pub fn with_offset(mut self, left: usize, top: usize) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Replaces the image, keeping placement and metadata.
    pub fn try_map<U, F>(self, f: F) -> Result<Frame<U>>
    where
        F: FnOnce(T) -> Result<U>,
    {
        Ok(Frame {
            image: f(self.image)?,
            left: self.left,
            top: self.top,
            metadata: self.metadata,
        })
    }
}

/// How many times an animation repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopCount {
    #[default]
    Infinite,
    /// Extra repetitions after the first pass; 0 plays once
    Finite(u16),
}

impl LoopCount {
    /// Value stored in a NETSCAPE2.0 extension, where 0 means forever.
    pub fn netscape_value(&self) -> Option<u16> {
        match self {
            LoopCount::Infinite => Some(0),
            LoopCount::Finite(0) => None,
            LoopCount::Finite(n) => Some(*n),
        }
    }
}

/// Sequence-level information of a decoded animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationHeader {
    pub width: usize,
    pub height: usize,
    pub loop_count: LoopCount,
}

/// How frame rasters are reconstructed while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationMode {
    /// Every frame is the full screen, composited according to disposal
    #[default]
    Composite,
    /// Every frame is the stored sub-rectangle at its own offset
    Delta,
}

/// Configuration for animation processing
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Frame reconstruction mode handed to the decoder
    pub mode: AnimationMode,
    /// Palette quantization settings applied to every processed frame
    pub quantizer: QuantizerOptions,
    /// Whether to reject processed frames with a zero dimension
    pub validate_dimensions: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            mode: AnimationMode::Composite,
            quantizer: QuantizerOptions::default(),
            validate_dimensions: true,
        }
    }
}

impl AnimationConfig {
    pub fn builder() -> AnimationConfigBuilder {
        AnimationConfigBuilder::default()
    }
}

/// Builder for AnimationConfig
#[derive(Default)]
pub struct AnimationConfigBuilder {
    mode: Option<AnimationMode>,
    quantizer: Option<QuantizerOptions>,
    validate_dimensions: Option<bool>,
}

impl AnimationConfigBuilder {
    pub fn mode(mut self, mode: AnimationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn quantizer(mut self, options: QuantizerOptions) -> Self {
        self.quantizer = Some(options);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn build(self) -> AnimationConfig {
        let default = AnimationConfig::default();
        AnimationConfig {
            mode: self.mode.unwrap_or(default.mode),
            quantizer: self.quantizer.unwrap_or(default.quantizer),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
        }
    }
}
