// Core pixel types shared by the compositor, the codec and the window.

use std::fmt;

use crate::error::Error;
use crate::geometry::Rect;

/// One RGBA8 pixel, straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    #[cfg(test)]
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const DARK_GRAY: Color = Color::rgba(80, 80, 80, 255);
    pub const BLANK: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha replaced by `alpha` in [0,1].
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
        Self { a, ..self }
    }

    /// Parse `RRGGBB` (exactly six hex digits) into an opaque color.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::Config(format!(
                "color '{hex}' is not of the form RRGGBB"
            )));
        }
        let v = u32::from_str_radix(hex, 16)
            .map_err(|e| Error::Config(format!("color '{hex}': {e}")))?;
        Ok(Self::rgba((v >> 16) as u8, (v >> 8) as u8, v as u8, 255))
    }

    /// Pack as 0x00RRGGBB, the word layout minifb expects. Alpha is dropped.
    #[inline]
    pub fn to_0rgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// `RRGGBB`, the form `from_hex` accepts. Alpha is not shown.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Row-major RGBA8 pixel grid. Used both for decoded images (image space)
/// and for the off-screen frame we composite into (screen space).
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>, // len = width * height
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, fill: Color) -> Self {
        Self { width, height, pixels: vec![fill; width * height] }
    }

    /// Wrap an existing pixel vector. None if the length does not match.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The whole buffer as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Color> {
        self.index(x, y).map(move |i| &mut self.pixels[i])
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Change the dimensions, reusing the allocation. Contents are unspecified
    /// afterwards; callers clear before drawing.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels.resize(width * height, Color::BLANK);
    }
}
