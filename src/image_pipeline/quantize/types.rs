//! Palette quantization types

/// Largest palette an indexed raster can carry.
pub const MAX_PALETTE_SIZE: usize = 256;

/// A raster of palette indices plus its palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRaster {
    pub width: usize,
    pub height: usize,
    /// One palette index per pixel, row-major
    pub indices: Vec<u8>,
    /// RGB palette entries, at most 256
    pub palette: Vec<[u8; 3]>,
    /// Palette index standing for fully transparent pixels
    pub transparent: Option<u8>,
}

impl IndexedRaster {
    /// Palette flattened to `[R, G, B, R, G, B, ...]`.
    pub fn palette_bytes(&self) -> Vec<u8> {
        self.palette.iter().flatten().copied().collect()
    }
}

/// Configuration for palette quantization
#[derive(Debug, Clone)]
pub struct QuantizerOptions {
    /// Palette size including the transparent slot (2..=256)
    pub max_colors: usize,
    /// NeuQuant sampling factor, 1 is slowest and best (1..=30)
    pub sample_factor: i32,
    /// Pixels with alpha below this value are written as transparent
    pub alpha_threshold: u8,
}

impl Default for QuantizerOptions {
    fn default() -> Self {
        Self {
            max_colors: MAX_PALETTE_SIZE,
            sample_factor: 10,
            alpha_threshold: 128,
        }
    }
}
