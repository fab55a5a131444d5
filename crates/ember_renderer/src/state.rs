//! Accumulation buffers and per-pixel random streams.

use ember_core::Scene;
use ember_math::Vec4;
use rand::{Rng, SeedableRng};

use crate::camera::image_size;
use crate::error::RenderResult;
use crate::params::RenderParams;
use crate::sampling::PixelRng;

/// Seeds the generator that hands out per-pixel sub-seeds.
const SEED_GENERATOR_STATE: u64 = 1301081;

/// Stream constant shared by every pixel generator.
const PIXEL_STREAM_STATE: u64 = 961748941;

/// Running sums for a progressive render.
///
/// Created once per (scene, params) configuration and advanced in place by
/// sampling passes; the pixel count never changes. Results are read with
/// [`crate::get_image`], which divides by the sample count.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) samples: u32,
    /// Sum of RGBA radiance per pixel
    pub(crate) image: Vec<Vec4>,
    /// Number of samples that hit something or an environment
    pub(crate) hits: Vec<u32>,
    pub(crate) rngs: Vec<PixelRng>,
}

impl RenderState {
    /// Allocate a zeroed state for a scene and its parameters.
    ///
    /// Pixel streams depend only on `params.seed` and the pixel index, so a
    /// fresh state always reproduces the same samples.
    pub fn new(scene: &Scene, params: &RenderParams) -> RenderResult<Self> {
        params.validate(scene)?;
        let camera = params.camera(scene)?;
        let (width, height) = image_size(camera, params.resolution);
        let count = width * height;

        let mut seeds = PixelRng::seed_from_u64(SEED_GENERATOR_STATE ^ params.seed);
        let rngs = (0..count)
            .map(|_| {
                let sub_seed = seeds.gen_range(0..1u64 << 31) / 2 + 1;
                PixelRng::seed_from_u64(PIXEL_STREAM_STATE ^ (sub_seed << 32))
            })
            .collect();

        log::debug!(
            "render state {}x{} ({} pixels), seed {}",
            width,
            height,
            count,
            params.seed
        );

        Ok(Self {
            width,
            height,
            samples: 0,
            image: vec![Vec4::ZERO; count],
            hits: vec![0; count],
            rngs,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Number of completed sampling passes.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Accumulated RGBA radiance, row-major.
    pub fn accumulated(&self) -> &[Vec4] {
        &self.image
    }

    /// Per-pixel hit counts, row-major.
    pub fn hits(&self) -> &[u32] {
        &self.hits
    }

    /// Current per-pixel random streams, row-major.
    pub fn pixel_rngs(&self) -> &[PixelRng] {
        &self.rngs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Camera;
    use rand::RngCore;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_camera(Camera::default().with_aspect(2.0));
        scene
    }

    fn params(resolution: u32, seed: u64) -> RenderParams {
        RenderParams {
            resolution,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = RenderState::new(&scene(), &params(32, 0)).unwrap();
        assert_eq!((state.width(), state.height()), (32, 16));
        assert_eq!(state.pixel_count(), 512);
        assert_eq!(state.samples(), 0);
        assert!(state.accumulated().iter().all(|p| *p == Vec4::ZERO));
        assert!(state.hits().iter().all(|h| *h == 0));
        assert_eq!(state.rngs.len(), 512);
    }

    #[test]
    fn test_streams_are_reproducible() {
        let a = RenderState::new(&scene(), &params(16, 0)).unwrap();
        let b = RenderState::new(&scene(), &params(16, 0)).unwrap();
        for (mut x, mut y) in a.rngs.into_iter().zip(b.rngs) {
            assert_eq!(x.next_u64(), y.next_u64());
        }
    }

    #[test]
    fn test_streams_differ_per_pixel_and_seed() {
        let a = RenderState::new(&scene(), &params(16, 0)).unwrap();
        let b = RenderState::new(&scene(), &params(16, 1)).unwrap();

        let first: Vec<u64> = a.rngs.iter().map(|r| r.clone().next_u64()).collect();
        let mut unique = first.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), first.len());

        let other: Vec<u64> = b.rngs.iter().map(|r| r.clone().next_u64()).collect();
        assert_ne!(first, other);
    }

    #[test]
    fn test_invalid_camera() {
        let params = RenderParams {
            camera: 3,
            ..Default::default()
        };
        assert!(RenderState::new(&scene(), &params).is_err());
    }
}
