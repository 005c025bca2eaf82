//! Pixel transform module
//!
//! This module provides the parallel row-band transform engine and the
//! color matrix filter built on top of it.

mod engine;
pub mod color_matrix;
pub mod srgb;
pub mod types;


pub use engine::{ParallelTransform, PixelTransform, default_band_height, row_bands};
pub use color_matrix::{ColorMatrix, ColorMatrixFilter};
pub use types::{TransformOptions, TransformOptionsBuilder};
