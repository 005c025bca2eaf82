use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::animation::format::AnimatedFormat;
use crate::image_pipeline::animation::gif_format::GifFormat;
use crate::image_pipeline::animation::types::AnimationConfig;
use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::quantize::{NeuQuantizer, Quantizer};
use crate::image_pipeline::raster::Raster;

/// Decode, process, quantize and encode an animation one frame at a time.
///
/// Frames are handled strictly in source order; frame `i + 1` is not decoded
/// before frame `i` has been appended to the encoder.
pub struct AnimationPipeline<F: AnimatedFormat, Q: Quantizer> {
    format: F,
    quantizer: Q,
    config: AnimationConfig,
}

impl AnimationPipeline<GifFormat, NeuQuantizer> {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            format: GifFormat,
            quantizer: NeuQuantizer,
            config,
        }
    }
}

impl<F: AnimatedFormat, Q: Quantizer> AnimationPipeline<F, Q> {
    pub fn with_custom(format: F, quantizer: Q, config: AnimationConfig) -> Self {
        Self {
            format,
            quantizer,
            config,
        }
    }

    fn validate_dimensions(&self, raster: &Raster) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if raster.width() == 0 || raster.height() == 0 {
            return Err(ProcessingError::InvalidDimensions(raster.width(), raster.height()));
        }

        Ok(())
    }

    /// Runs `processor` on every frame of `input` and returns the re-encoded
    /// animation. Any error aborts the whole run without output.
    #[instrument(skip(self, input, processor), fields(input_size = input.len(), format = self.format.name()))]
    pub fn process<P>(&self, input: &[u8], mut processor: P) -> Result<Vec<u8>>
    where
        P: FnMut(Raster) -> Result<Raster>,
    {
        info!("Starting animation processing");

        let frames = {
            let _span = tracing::info_span!("decode").entered();
            self.format.decode(input, self.config.mode)?
        };
        let header = *frames.header();
        let mut sink = self.format.encoder(&header)?;

        let mut frame_count = 0usize;
        for frame in frames {
            let frame = frame?;
            let _span = tracing::info_span!("process_frame",
                index = frame_count,
                delay = frame.metadata.delay
            ).entered();

            // The decoded raster moves into the processor and is gone once it returns.
            let processed = frame.try_map(&mut processor)?;
            self.validate_dimensions(&processed.image)?;

            let quantized = {
                let _span = tracing::info_span!("quantize").entered();
                processed.try_map(|raster| self.quantizer.quantize(&raster, &self.config.quantizer))?
            };

            {
                let _span = tracing::info_span!("encode_frame").entered();
                sink.add_frame(quantized)?;
            }
            frame_count += 1;
        }

        let output = {
            let _span = tracing::info_span!("finish_encoding").entered();
            sink.finish()?
        };

        info!(
            frames = frame_count,
            width = header.width,
            height = header.height,
            output_size = output.len(),
            "Animation processing complete"
        );
        Ok(output)
    }

    /// File-to-file variant of [`process`](Self::process). The output file is
    /// only created once processing has succeeded.
    #[instrument(skip(self, input_path, output_path, processor))]
    pub fn process_file<P, A: AsRef<Path>, B: AsRef<Path>>(
        &self,
        input_path: A,
        output_path: B,
        processor: P,
    ) -> Result<()>
    where
        P: FnMut(Raster) -> Result<Raster>,
    {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Processing file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ProcessingError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let output = self.process(&input_data, processor)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(output_path, output).map_err(|e| {
                ProcessingError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(())
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnimationConfig) {
        self.config = config;
    }
}
