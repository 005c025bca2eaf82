//! Quantizer backed by the NeuQuant network from `color_quant`.
//!
//! Frames whose distinct opaque colors already fit in the palette are indexed
//! exactly; only larger color sets go through the network.

use std::collections::HashMap;

use color_quant::NeuQuant;
use tracing::debug;

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::quantize::quantizer::Quantizer;
use crate::image_pipeline::quantize::types::{IndexedRaster, MAX_PALETTE_SIZE, QuantizerOptions};
use crate::image_pipeline::raster::{Bgra, Raster};

#[derive(Debug, Clone, Copy, Default)]
pub struct NeuQuantizer;

fn validate(options: &QuantizerOptions) -> Result<()> {
    if !(2..=MAX_PALETTE_SIZE).contains(&options.max_colors) {
        return Err(ProcessingError::QuantizeError(format!(
            "palette size {} outside 2..={}",
            options.max_colors, MAX_PALETTE_SIZE
        )));
    }
    if !(1..=30).contains(&options.sample_factor) {
        return Err(ProcessingError::QuantizeError(format!(
            "sample factor {} outside 1..=30",
            options.sample_factor
        )));
    }
    Ok(())
}

/// Palette in first-seen order, or `None` when more than `slots` colors occur.
fn exact_palette(
    raster: &Raster,
    slots: usize,
    is_opaque: impl Fn(&Bgra) -> bool,
) -> Option<(Vec<[u8; 3]>, Vec<u8>)> {
    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    let mut palette = Vec::new();
    let mut indices = Vec::with_capacity(raster.pixels().len());
    for pixel in raster.pixels() {
        if !is_opaque(pixel) {
            indices.push(0);
            continue;
        }
        let color = [pixel.r, pixel.g, pixel.b];
        let index = match lookup.get(&color) {
            Some(&index) => index,
            None => {
                if palette.len() == slots {
                    return None;
                }
                let index = palette.len() as u8;
                palette.push(color);
                lookup.insert(color, index);
                index
            }
        };
        indices.push(index);
    }
    Some((palette, indices))
}

fn network_palette(
    raster: &Raster,
    slots: usize,
    sample_factor: i32,
    is_opaque: impl Fn(&Bgra) -> bool,
) -> (Vec<[u8; 3]>, Vec<u8>) {
    let samples: Vec<u8> = raster
        .pixels()
        .iter()
        .filter(|p| is_opaque(*p))
        .flat_map(|p| [p.r, p.g, p.b, 255])
        .collect();
    let network = NeuQuant::new(sample_factor, slots, &samples);

    let palette = (0..slots)
        .map(|i| match network.lookup(i) {
            Some([r, g, b, _]) => [r, g, b],
            None => [0, 0, 0],
        })
        .collect();
    let indices = raster
        .pixels()
        .iter()
        .map(|p| {
            if is_opaque(p) {
                network.index_of(&[p.r, p.g, p.b, 255]) as u8
            } else {
                0
            }
        })
        .collect();
    (palette, indices)
}

impl Quantizer for NeuQuantizer {
    fn quantize(&self, raster: &Raster, options: &QuantizerOptions) -> Result<IndexedRaster> {
        validate(options)?;

        let threshold = options.alpha_threshold;
        let is_opaque = |p: &Bgra| p.a >= threshold;
        let has_transparency = raster.pixels().iter().any(|p| !is_opaque(p));
        let slots = options.max_colors - usize::from(has_transparency);

        let (mut palette, mut indices) = match exact_palette(raster, slots, is_opaque) {
            Some(exact) => exact,
            None => network_palette(raster, slots, options.sample_factor, is_opaque),
        };

        let transparent = if has_transparency {
            let index = palette.len() as u8;
            palette.push([0, 0, 0]);
            for (slot, pixel) in indices.iter_mut().zip(raster.pixels()) {
                if !is_opaque(pixel) {
                    *slot = index;
                }
            }
            Some(index)
        } else {
            None
        };

        debug!(
            colors = palette.len(),
            transparent = transparent.is_some(),
            "Quantized {}x{} raster",
            raster.width(),
            raster.height()
        );

        Ok(IndexedRaster {
            width: raster.width(),
            height: raster.height(),
            indices,
            palette,
            transparent,
        })
    }
}
