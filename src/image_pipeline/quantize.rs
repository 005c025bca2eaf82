//! Palette quantization module
//!
//! Reduces a processed raster to an indexed raster with at most 256 colors.

mod quantizer;
mod neuquant_quantizer;
pub mod types;

pub use quantizer::Quantizer;
pub use neuquant_quantizer::NeuQuantizer;
pub use types::{IndexedRaster, QuantizerOptions};
