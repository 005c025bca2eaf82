//! Raster data types

use std::fmt;

use crate::image_pipeline::common::error::{ProcessingError, Result};

/// A pixel with four 8-bit channels stored in blue, green, red, alpha order.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bgra {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgra {
    pub const TRANSPARENT: Bgra = Bgra::new(0, 0, 0, 0);

    pub const fn new(b: u8, g: u8, r: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rectangle {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, `None` on overflow.
    pub fn right(&self) -> Option<usize> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom edge, `None` on overflow.
    pub fn bottom(&self) -> Option<usize> {
        self.y.checked_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the rectangle lies inside a `width` x `height` area.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        matches!((self.right(), self.bottom()), (Some(r), Some(b)) if r <= width && b <= height)
    }

    /// Overlap of two rectangles, or `None` if they do not intersect.
    pub fn intersect(&self, other: &Rectangle) -> Option<Rectangle> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right()?.min(other.right()?);
        let bottom = self.bottom()?.min(other.bottom()?);
        if right <= x || bottom <= y {
            return None;
        }
        Some(Rectangle::new(x, y, right - x, bottom - y))
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// A row-major 2-D pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Bgra>,
}

impl Raster {
    /// Creates a fully transparent raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Bgra::TRANSPARENT)
    }

    pub fn filled(width: usize, height: usize, pixel: Bgra) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width * height],
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Bgra>) -> Result<Self> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(ProcessingError::InvalidDimensions(width, height));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a raster from interleaved `[R, G, B, A, ...]` bytes.
    pub fn from_rgba_bytes(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        if width.checked_mul(height).and_then(|n| n.checked_mul(4)) != Some(data.len()) {
            return Err(ProcessingError::InvalidDimensions(width, height));
        }
        let pixels = data
            .chunks_exact(4)
            .map(|p| Bgra::from_rgba(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgba()).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(0, 0, self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Bgra> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn set(&mut self, x: usize, y: usize, pixel: Bgra) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[y * self.width + x] = pixel;
        true
    }

    pub fn row(&self, y: usize) -> Option<&[Bgra]> {
        if y >= self.height {
            return None;
        }
        Some(&self.pixels[y * self.width..(y + 1) * self.width])
    }

    pub fn pixels(&self) -> &[Bgra] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Bgra] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Bgra> {
        self.pixels
    }
}
