//! Textures for material and environment lookups.
//!
//! Pixels are stored as RGBA floats. Textures marked non-linear hold
//! sRGB-encoded values (8-bit style color maps) and are decoded on lookup
//! when the caller asks for linear values.

use ember_math::{Vec2, Vec4};

/// A texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: usize,

    /// Texture height in pixels
    pub height: usize,

    /// True if pixels hold linear values, false for sRGB-encoded values
    pub linear: bool,

    /// Pixel data in RGBA format, row-major order
    pub pixels: Vec<Vec4>,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: usize, height: usize, linear: bool, pixels: Vec<Vec4>) -> Self {
        Self {
            width,
            height,
            linear,
            pixels,
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid(color: Vec4) -> Self {
        Self::new(1, 1, true, vec![color])
    }

    /// Two-color checkerboard with `tiles` squares per side.
    pub fn checker(size: usize, tiles: usize, a: Vec4, b: Vec4) -> Self {
        let tile = (size / tiles.max(1)).max(1);
        let mut pixels = Vec::with_capacity(size * size);
        for j in 0..size {
            for i in 0..size {
                let even = ((i / tile) + (j / tile)) % 2 == 0;
                pixels.push(if even { a } else { b });
            }
        }
        Self::new(size, size, true, pixels)
    }

    /// Get pixel at integer coordinates, decoding sRGB if requested.
    pub fn lookup(&self, i: usize, j: usize, as_linear: bool) -> Vec4 {
        let texel = self.pixels[j * self.width + i];
        if as_linear && !self.linear {
            Vec4::new(
                srgb_to_rgb(texel.x),
                srgb_to_rgb(texel.y),
                srgb_to_rgb(texel.z),
                texel.w,
            )
        } else {
            texel
        }
    }

    /// Sample the texture at UV coordinates (bilinear filtering, wrap-around).
    pub fn eval(&self, uv: Vec2, as_linear: bool) -> Vec4 {
        if self.pixels.is_empty() {
            return Vec4::ONE;
        }

        let s = uv.x.rem_euclid(1.0) * self.width as f32;
        let t = uv.y.rem_euclid(1.0) * self.height as f32;
        let i = (s as usize).min(self.width - 1);
        let j = (t as usize).min(self.height - 1);
        let ii = (i + 1) % self.width;
        let jj = (j + 1) % self.height;
        let u = s - i as f32;
        let v = t - j as f32;

        self.lookup(i, j, as_linear) * (1.0 - u) * (1.0 - v)
            + self.lookup(i, jj, as_linear) * (1.0 - u) * v
            + self.lookup(ii, j, as_linear) * u * (1.0 - v)
            + self.lookup(ii, jj, as_linear) * u * v
    }
}

/// Decode one sRGB channel to linear.
#[inline]
pub fn srgb_to_rgb(srgb: f32) -> f32 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode one linear channel to sRGB.
#[inline]
pub fn rgb_to_srgb(rgb: f32) -> f32 {
    if rgb <= 0.0031308 {
        12.92 * rgb
    } else {
        1.055 * rgb.powf(1.0 / 2.4) - 0.055
    }
}
