use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::quantize::types::{IndexedRaster, QuantizerOptions};
use crate::image_pipeline::raster::Raster;

/// Must be deterministic: identical rasters yield identical palettes.
pub trait Quantizer {
    fn quantize(&self, raster: &Raster, options: &QuantizerOptions) -> Result<IndexedRaster>;
}
