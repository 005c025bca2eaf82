use pixelflow::image_pipeline::{
    AnimationConfig, AnimationPipeline, ColorMatrix, ColorMatrixFilter, ParallelTransform,
    TransformOptions,
};
use pixelflow::logger;

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting pixelflow...");

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "input.gif".to_string());
    let output = args.next().unwrap_or_else(|| "output.gif".to_string());

    let engine = ParallelTransform::new(TransformOptions::default())?;
    let filter = ColorMatrixFilter::new(ColorMatrix::sepia(), true);
    let pipeline = AnimationPipeline::new(AnimationConfig::default());

    info!("Animation pipeline initialized");
    info!("Frame mode: {:?}", pipeline.config().mode);
    info!("Palette size: {}", pipeline.config().quantizer.max_colors);

    if let Err(e) = pipeline.process_file(&input, &output, |raster| filter.process(&engine, raster)) {
        error!("Processing failed: {}", e);
        return Err(e.into());
    }

    info!("Processing successful!");
    Ok(())
}
