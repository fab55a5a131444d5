//! Fast low-resolution preview.

use ember_core::{Intersector, Scene};

use crate::camera::image_size;
use crate::driver::advance_one_sample;
use crate::error::{ConfigurationError, RenderResult};
use crate::image::{get_image, ColorImage};
use crate::params::RenderParams;
use crate::state::RenderState;

/// Fill `image` with a single-sample render at `resolution / pratio`,
/// upsampled with nearest-neighbor lookups.
///
/// `image` must be linear and have the full-resolution size of `params`.
pub fn render_preview(
    image: &mut ColorImage,
    scene: &Scene,
    intersector: &dyn Intersector,
    params: &RenderParams,
) -> RenderResult<()> {
    if params.pratio == 0 {
        return Err(ConfigurationError::InvalidPreviewRatio.into());
    }
    let (width, height) = image_size(params.camera(scene)?, params.resolution);
    image.check(width, height, true)?;

    let pparams = RenderParams {
        resolution: (params.resolution / params.pratio).max(1),
        samples: 1,
        ..params.clone()
    };
    let mut pstate = RenderState::new(scene, &pparams)?;
    advance_one_sample(&mut pstate, scene, intersector, &pparams)?;
    let preview = get_image(&pstate);
    log::debug!(
        "preview {}x{} for {}x{}",
        preview.width,
        preview.height,
        width,
        height
    );

    let ratio = params.pratio as usize;
    for (index, pixel) in image.pixels.iter_mut().enumerate() {
        let (i, j) = (index % width, index / width);
        let pi = (i / ratio).min(preview.width - 1);
        let pj = (j / ratio).min(preview.height - 1);
        *pixel = preview.get(pi, pj);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Camera, Environment, SceneBvh};
    use ember_math::{Vec3, Vec4};

    #[test]
    fn test_preview_fills_full_image() {
        let mut scene = Scene::new();
        scene.add_camera(Camera::default().with_aspect(1.0));
        scene.add_environment(Environment::constant(Vec3::splat(0.5)));
        let bvh = SceneBvh::build(&scene);
        let params = RenderParams {
            resolution: 20,
            pratio: 3,
            ..Default::default()
        };

        let mut image = ColorImage::new(20, 20, true);
        render_preview(&mut image, &scene, &bvh, &params).unwrap();
        assert!(image.pixels.iter().all(|p| *p == Vec4::new(0.5, 0.5, 0.5, 1.0)));
    }

    #[test]
    fn test_preview_checks_size() {
        let mut scene = Scene::new();
        scene.add_camera(Camera::default());
        let bvh = SceneBvh::build(&scene);
        let params = RenderParams {
            resolution: 32,
            ..Default::default()
        };

        let mut image = ColorImage::new(8, 8, true);
        assert!(render_preview(&mut image, &scene, &bvh, &params).is_err());
        assert!(image.pixels.iter().all(|p| *p == Vec4::ZERO));
    }
}
