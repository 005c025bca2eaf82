//! GIF support built on the `gif` crate.
//!
//! Decoding streams frames: at most the composited canvas (plus one saved copy
//! for restore-to-previous disposal) is held besides the frame being handed out.
//! The whole stream is checked once before the first frame is handed out, so a
//! damaged file never reaches the per-frame processor.

use std::borrow::Cow;

use gif::{ColorOutput, DecodeOptions, DisposalMethod, Repeat};
use tracing::{debug, instrument};

use crate::image_pipeline::animation::format::{AnimatedFormat, FrameSink, FrameSource};
use crate::image_pipeline::animation::types::{
    AnimationHeader, AnimationMode, Disposal, Frame, FrameMetadata, LoopCount,
};
use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::quantize::IndexedRaster;
use crate::image_pipeline::raster::{Bgra, Raster, Rectangle};

pub struct GifFormat;

impl AnimatedFormat for GifFormat {
    fn name(&self) -> &'static str {
        "gif"
    }

    #[instrument(skip(self, data), fields(input_size = data.len()))]
    fn decode<'a>(&self, data: &'a [u8], mode: AnimationMode) -> Result<Box<dyn FrameSource + 'a>> {
        Ok(Box::new(GifFrameSource::open(data, mode)?))
    }

    fn encoder(&self, header: &AnimationHeader) -> Result<Box<dyn FrameSink>> {
        Ok(Box::new(GifFrameSink::begin(header)?))
    }
}

fn decode_error(error: impl std::fmt::Display) -> ProcessingError {
    ProcessingError::DecodeError(error.to_string())
}

fn encode_error(error: impl std::fmt::Display) -> ProcessingError {
    ProcessingError::EncodeError(error.to_string())
}

impl From<DisposalMethod> for Disposal {
    fn from(method: DisposalMethod) -> Self {
        match method {
            DisposalMethod::Any => Disposal::Any,
            DisposalMethod::Keep => Disposal::Keep,
            DisposalMethod::Background => Disposal::Background,
            DisposalMethod::Previous => Disposal::Previous,
        }
    }
}

impl From<Disposal> for DisposalMethod {
    fn from(disposal: Disposal) -> Self {
        match disposal {
            Disposal::Any => DisposalMethod::Any,
            Disposal::Keep => DisposalMethod::Keep,
            Disposal::Background => DisposalMethod::Background,
            Disposal::Previous => DisposalMethod::Previous,
        }
    }
}

/// A frame as stored in the file, before compositing.
struct StoredFrame {
    raster: Raster,
    area: Rectangle,
    metadata: FrameMetadata,
}

struct GifFrameSource<'a> {
    decoder: gif::Decoder<&'a [u8]>,
    header: AnimationHeader,
    mode: AnimationMode,
    canvas: Raster,
    pending: Option<Frame<Raster>>,
    index: usize,
}

/// Decodes every frame in indexed form, one at a time, and returns the count.
fn check_stream(data: &[u8]) -> Result<usize> {
    let mut decoder = DecodeOptions::new().read_info(data).map_err(decode_error)?;
    let mut frames = 0usize;
    while decoder.read_next_frame().map_err(decode_error)?.is_some() {
        frames += 1;
    }
    Ok(frames)
}

impl<'a> GifFrameSource<'a> {
    /// Validates the whole stream, then reads the header and the first frame.
    fn open(data: &'a [u8], mode: AnimationMode) -> Result<Self> {
        let frame_count = check_stream(data)?;
        if frame_count == 0 {
            return Err(ProcessingError::DecodeError("animation contains no frames".into()));
        }

        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::RGBA);
        let decoder = options.read_info(data).map_err(decode_error)?;

        let width = decoder.width() as usize;
        let height = decoder.height() as usize;
        let mut source = Self {
            decoder,
            header: AnimationHeader {
                width,
                height,
                loop_count: LoopCount::Finite(0),
            },
            mode,
            canvas: Raster::new(width, height),
            pending: None,
            index: 0,
        };

        let first = source
            .read_frame()?
            .ok_or_else(|| ProcessingError::DecodeError("animation contains no frames".into()))?;
        // The loop extension precedes the first image block.
        source.header.loop_count = match source.decoder.repeat() {
            Repeat::Infinite => LoopCount::Infinite,
            Repeat::Finite(n) => LoopCount::Finite(n),
        };
        source.pending = Some(first);

        debug!(width, height, frame_count, loop_count = ?source.header.loop_count, "Opened GIF");
        Ok(source)
    }

    fn read_stored(&mut self) -> Result<Option<StoredFrame>> {
        let Some(frame) = self.decoder.read_next_frame().map_err(decode_error)? else {
            return Ok(None);
        };
        let area = Rectangle::new(
            frame.left as usize,
            frame.top as usize,
            frame.width as usize,
            frame.height as usize,
        );
        let raster = Raster::from_rgba_bytes(area.width, area.height, &frame.buffer)
            .map_err(decode_error)?;
        let metadata = FrameMetadata {
            delay: frame.delay,
            disposal: frame.dispose.into(),
            needs_user_input: frame.needs_user_input,
        };
        Ok(Some(StoredFrame {
            raster,
            area,
            metadata,
        }))
    }

    fn read_frame(&mut self) -> Result<Option<Frame<Raster>>> {
        let Some(stored) = self.read_stored()? else {
            return Ok(None);
        };
        debug!(index = self.index, area = %stored.area, delay = stored.metadata.delay, "Decoded frame");
        self.index += 1;
        let frame = match self.mode {
            AnimationMode::Delta => Frame::new(stored.raster, stored.metadata)
                .with_offset(stored.area.x, stored.area.y),
            AnimationMode::Composite => self.composite(stored),
        };
        Ok(Some(frame))
    }

    /// Draws `stored` on the canvas, snapshots it and applies its disposal.
    fn composite(&mut self, stored: StoredFrame) -> Frame<Raster> {
        let saved = (stored.metadata.disposal == Disposal::Previous).then(|| self.canvas.clone());

        for fy in 0..stored.area.height {
            for fx in 0..stored.area.width {
                let Some(pixel) = stored.raster.get(fx, fy) else {
                    continue;
                };
                // Transparent pixels let the canvas show through.
                if pixel.a > 0 {
                    self.canvas.set(stored.area.x + fx, stored.area.y + fy, pixel);
                }
            }
        }
        let snapshot = self.canvas.clone();

        match stored.metadata.disposal {
            Disposal::Background => {
                for fy in 0..stored.area.height {
                    for fx in 0..stored.area.width {
                        self.canvas
                            .set(stored.area.x + fx, stored.area.y + fy, Bgra::TRANSPARENT);
                    }
                }
            }
            Disposal::Previous => {
                if let Some(saved) = saved {
                    self.canvas = saved;
                }
            }
            Disposal::Any | Disposal::Keep => {}
        }

        Frame::new(snapshot, stored.metadata)
    }
}

impl Iterator for GifFrameSource<'_> {
    type Item = Result<Frame<Raster>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(frame) = self.pending.take() {
            return Some(Ok(frame));
        }
        self.read_frame().transpose()
    }
}

impl FrameSource for GifFrameSource<'_> {
    fn header(&self) -> &AnimationHeader {
        &self.header
    }
}

struct GifFrameSink {
    encoder: gif::Encoder<Vec<u8>>,
    screen: Rectangle,
}

impl GifFrameSink {
    fn begin(header: &AnimationHeader) -> Result<Self> {
        let width = u16::try_from(header.width)
            .map_err(|_| ProcessingError::InvalidDimensions(header.width, header.height))?;
        let height = u16::try_from(header.height)
            .map_err(|_| ProcessingError::InvalidDimensions(header.width, header.height))?;

        let mut encoder = gif::Encoder::new(Vec::new(), width, height, &[]).map_err(encode_error)?;
        if let Some(value) = header.loop_count.netscape_value() {
            let repeat = if value == 0 { Repeat::Infinite } else { Repeat::Finite(value) };
            encoder.set_repeat(repeat).map_err(encode_error)?;
        }

        Ok(Self {
            encoder,
            screen: Rectangle::new(0, 0, header.width, header.height),
        })
    }
}

impl FrameSink for GifFrameSink {
    fn add_frame(&mut self, frame: Frame<IndexedRaster>) -> Result<()> {
        let image = frame.image;
        let area = Rectangle::new(frame.left, frame.top, image.width, image.height);
        if !area.fits_within(self.screen.width, self.screen.height) {
            return Err(ProcessingError::EncodeError(format!(
                "frame {area} exceeds logical screen {}",
                self.screen
            )));
        }

        let palette = image.palette_bytes();
        let gif_frame = gif::Frame {
            left: area.x as u16,
            top: area.y as u16,
            width: area.width as u16,
            height: area.height as u16,
            delay: frame.metadata.delay,
            dispose: frame.metadata.disposal.into(),
            needs_user_input: frame.metadata.needs_user_input,
            transparent: image.transparent,
            palette: Some(palette),
            buffer: Cow::Owned(image.indices),
            ..gif::Frame::default()
        };
        self.encoder.write_frame(&gif_frame).map_err(encode_error)
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>> {
        self.encoder.into_inner().map_err(encode_error)
    }
}
