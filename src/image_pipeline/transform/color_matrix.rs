//! Color matrix filter.
//!
//! A [`ColorMatrix`] holds five input rows (red, green, blue, alpha and a
//! constant bias) by four output columns (red, green, blue, alpha). Each
//! output channel is `sum(input_i * m[i][c]) + 255 * m[4][c]`, clamped and
//! rounded back into a byte.

use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::{Bgra, Raster, Rectangle};
use crate::image_pipeline::transform::engine::{ParallelTransform, PixelTransform};
use crate::image_pipeline::transform::srgb;

/// Index of the constant bias row.
const BIAS: usize = 4;

/// Luminance weights used by the saturation preset.
const SATURATION_LUMA: [f32; 3] = [0.3086, 0.6094, 0.0820];

/// Rec. 709 luma weights used by the greyscale preset.
const BT709_LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    /// `rows[input][output]`, inputs ordered R, G, B, A, bias.
    pub rows: [[f32; 4]; 5],
}

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0, 0.0],
        ],
    };

    pub const fn new(rows: [[f32; 4]; 5]) -> Self {
        Self { rows }
    }

    pub fn greyscale() -> Self {
        let [r, g, b] = BT709_LUMA;
        Self::new([
            [r, r, r, 0.0],
            [g, g, g, 0.0],
            [b, b, b, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0, 0.0],
        ])
    }

    pub fn sepia() -> Self {
        Self::new([
            [0.393, 0.349, 0.272, 0.0],
            [0.769, 0.686, 0.534, 0.0],
            [0.189, 0.168, 0.131, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0, 0.0],
        ])
    }

    pub fn invert() -> Self {
        Self::new([
            [-1.0, 0.0, 0.0, 0.0],
            [0.0, -1.0, 0.0, 0.0],
            [0.0, 0.0, -1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0, 0.0],
        ])
    }

    pub fn polaroid() -> Self {
        Self::new([
            [1.438, -0.062, -0.062, 0.0],
            [-0.122, 1.378, -0.122, 0.0],
            [-0.016, -0.016, 1.483, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [-0.03, 0.05, -0.02, 0.0],
        ])
    }

    /// Shifts every color channel by `amount` of full scale (-1.0 to 1.0).
    pub fn brightness(amount: f32) -> Self {
        let mut matrix = Self::IDENTITY;
        matrix.rows[BIAS] = [amount, amount, amount, 0.0];
        matrix
    }

    /// Scales saturation; 0.0 is greyscale and 1.0 leaves colors unchanged.
    pub fn saturation(amount: f32) -> Self {
        let [r, g, b] = SATURATION_LUMA.map(|weight| weight * (1.0 - amount));
        Self::new([
            [r + amount, r, r, 0.0],
            [g, g + amount, g, 0.0],
            [b, b, b + amount, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0, 0.0],
        ])
    }

    /// Applies the matrix to one pixel, saturating into the byte range.
    pub fn apply(&self, pixel: Bgra) -> Bgra {
        let input = [
            pixel.r as f32,
            pixel.g as f32,
            pixel.b as f32,
            pixel.a as f32,
        ];
        let channel = |c: usize| {
            let sum = input
                .iter()
                .zip(&self.rows[..BIAS])
                .map(|(value, row)| value * row[c])
                .sum::<f32>();
            to_byte(sum + 255.0 * self.rows[BIAS][c])
        };
        Bgra::from_rgba(channel(0), channel(1), channel(2), channel(3))
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn to_byte(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

/// A color matrix together with its gamma handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrixFilter {
    pub matrix: ColorMatrix,
    /// Convert to linear light before the matrix and back afterwards
    pub gamma_adjust: bool,
}

impl ColorMatrixFilter {
    pub fn new(matrix: ColorMatrix, gamma_adjust: bool) -> Self {
        Self {
            matrix,
            gamma_adjust,
        }
    }

    /// Consumes `raster` and returns the filtered raster.
    pub fn process(&self, engine: &ParallelTransform, raster: Raster) -> Result<Raster> {
        let bounds = raster.bounds();
        let mut target = Raster::new(raster.width(), raster.height());
        engine.apply(&raster, &mut target, bounds, bounds, self)?;
        Ok(target)
    }

    /// Like [`process`](Self::process) but only pixels inside `region` change.
    pub fn process_region(
        &self,
        engine: &ParallelTransform,
        raster: Raster,
        region: Rectangle,
    ) -> Result<Raster> {
        debug!(%region, "Applying color matrix to region");
        let mut target = raster.clone();
        engine.apply(&raster, &mut target, raster.bounds(), region, self)?;
        Ok(target)
    }
}

impl PixelTransform for ColorMatrixFilter {
    fn transform(&self, pixel: Bgra) -> Bgra {
        if self.gamma_adjust {
            srgb::to_srgb(self.matrix.apply(srgb::to_linear(pixel)))
        } else {
            self.matrix.apply(pixel)
        }
    }
}
