//! sRGB transfer curve conversions on 8-bit pixels, built on `linear_srgb`.
//!
//! Alpha is never converted.

use linear_srgb::default::{linear_to_srgb_u8, srgb_u8_to_linear};

use crate::image_pipeline::raster::Bgra;

fn decode_channel(value: u8) -> u8 {
    (srgb_u8_to_linear(value) * 255.0).clamp(0.0, 255.0).round() as u8
}

fn encode_channel(value: u8) -> u8 {
    linear_to_srgb_u8(value as f32 / 255.0)
}

/// Converts a gamma-encoded pixel to linear light.
pub fn to_linear(pixel: Bgra) -> Bgra {
    Bgra::new(
        decode_channel(pixel.b),
        decode_channel(pixel.g),
        decode_channel(pixel.r),
        pixel.a,
    )
}

/// Converts a linear-light pixel back to display space.
pub fn to_srgb(pixel: Bgra) -> Bgra {
    Bgra::new(
        encode_channel(pixel.b),
        encode_channel(pixel.g),
        encode_channel(pixel.r),
        pixel.a,
    )
}
