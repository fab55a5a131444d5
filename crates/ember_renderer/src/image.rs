//! Display images extracted from a render state.

use ember_core::rgb_to_srgb;
use ember_math::Vec4;

use crate::error::{RenderResult, ShapeMismatchError};
use crate::state::RenderState;

/// RGBA float image.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    pub width: usize,
    pub height: usize,
    /// True if pixels hold linear radiance, false for sRGB-encoded values
    pub linear: bool,
    /// Pixel data in RGBA format, row-major order
    pub pixels: Vec<Vec4>,
}

impl ColorImage {
    /// Create a black, fully transparent image.
    pub fn new(width: usize, height: usize, linear: bool) -> Self {
        Self {
            width,
            height,
            linear,
            pixels: vec![Vec4::ZERO; width * height],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: usize, y: usize) -> Vec4 {
        self.pixels[y * self.width + x]
    }

    /// Check that this image can receive a `width` x `height` result.
    pub fn check(&self, width: usize, height: usize, linear: bool) -> Result<(), ShapeMismatchError> {
        if self.width != width || self.height != height {
            return Err(ShapeMismatchError::Size {
                expected: (width, height),
                actual: (self.width, self.height),
            });
        }
        if self.linear != linear {
            return Err(ShapeMismatchError::ColorSpace {
                expected_linear: linear,
            });
        }
        Ok(())
    }

    /// Convert to 8-bit RGBA bytes (for display or saving).
    ///
    /// Linear images are sRGB-encoded; values are clamped to `[0,1]`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let quantize = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            let rgb = if self.linear {
                [rgb_to_srgb(p.x), rgb_to_srgb(p.y), rgb_to_srgb(p.z)]
            } else {
                [p.x, p.y, p.z]
            };
            bytes.extend(rgb.map(quantize));
            bytes.push(quantize(p.w));
        }
        bytes
    }
}

/// Averaged radiance of a render state as a new linear image.
pub fn get_image(state: &RenderState) -> ColorImage {
    let mut image = ColorImage::new(state.width, state.height, true);
    fill(&mut image, state);
    image
}

/// Averaged radiance of a render state written into an existing image.
///
/// The image must be linear and match the state's size; on mismatch it is
/// left untouched.
pub fn get_image_into(image: &mut ColorImage, state: &RenderState) -> RenderResult<()> {
    image.check(state.width, state.height, true)?;
    fill(image, state);
    Ok(())
}

fn fill(image: &mut ColorImage, state: &RenderState) {
    let scale = if state.samples == 0 {
        0.0
    } else {
        1.0 / state.samples as f32
    };
    for (dst, src) in image.pixels.iter_mut().zip(&state.image) {
        *dst = *src * scale;
    }
}
