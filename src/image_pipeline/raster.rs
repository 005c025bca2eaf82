//! Raster module
//!
//! Pixel storage shared by the transform engine and the animation pipeline.

pub mod types;

pub use types::{Bgra, Raster, Rectangle};
