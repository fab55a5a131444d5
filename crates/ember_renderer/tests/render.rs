//! End-to-end rendering properties.

mod common;

use approx::assert_abs_diff_eq;
use ember_core::Texture;
use ember_math::{Vec2, Vec3, Vec4};
use ember_renderer::{
    advance_one_sample, eval_camera, get_image, get_image_into, ColorImage, RenderError,
    RenderParams, RenderState, Scene, SceneBvh, ShaderKind, ShapeMismatchError,
};
use rand::Rng;

fn params(shader: ShaderKind, resolution: u32, bounces: u32) -> RenderParams {
    RenderParams {
        resolution,
        shader,
        bounces,
        ..Default::default()
    }
}

fn render(scene: &Scene, params: &RenderParams, samples: u32) -> anyhow::Result<RenderState> {
    let bvh = SceneBvh::build(scene);
    let mut state = RenderState::new(scene, params)?;
    for _ in 0..samples {
        advance_one_sample(&mut state, scene, &bvh, params)?;
    }
    Ok(state)
}

fn mean_squared_error(a: &ColorImage, b: &ColorImage) -> f32 {
    let sum: f32 = a
        .pixels
        .iter()
        .zip(&b.pixels)
        .map(|(x, y)| (x.truncate() - y.truncate()).length_squared())
        .sum();
    sum / a.pixels.len() as f32
}

#[test]
fn environment_only_scene_shows_the_environment() -> anyhow::Result<()> {
    common::init_logging();
    let emission = Vec3::new(0.2, 0.4, 0.8);
    let scene = common::sky(emission);

    for shader in ShaderKind::ALL {
        let state = render(&scene, &params(shader, 16, 4), 1)?;
        let image = get_image(&state);
        for pixel in &image.pixels {
            assert_eq!(*pixel, emission.extend(1.0), "shader {shader}");
        }
        assert!(state.hits().iter().all(|h| *h == 1));
    }
    Ok(())
}

#[test]
fn textured_environment_matches_camera_directions() -> anyhow::Result<()> {
    let mut scene = common::sky(Vec3::ONE);
    let sky = Texture::checker(8, 4, Vec4::new(1.0, 0.5, 0.25, 1.0), Vec4::new(0.1, 0.2, 0.3, 1.0));
    let texture = scene.add_texture(sky);
    scene.environments[0] = scene.environments[0].clone().with_texture(texture);

    let params = params(ShaderKind::PathTrace, 8, 4);
    let state = render(&scene, &params, 1)?;
    let image = get_image(&state);

    // Replay the jitter of each pixel stream to recover its camera ray
    let fresh = RenderState::new(&scene, &params)?;
    let camera = &scene.cameras[0];
    for (index, rng) in fresh.pixel_rngs().iter().enumerate() {
        let mut rng = rng.clone();
        let (i, j) = (index % fresh.width(), index / fresh.width());
        let u = (i as f32 + rng.gen::<f32>()) / fresh.width() as f32;
        let v = (j as f32 + rng.gen::<f32>()) / fresh.height() as f32;
        let ray = eval_camera(camera, Vec2::new(u, v));
        let expected = scene.eval_environment(ray.direction);
        assert_abs_diff_eq!(image.pixels[index].x, expected.x, epsilon = 1e-5);
        assert_abs_diff_eq!(image.pixels[index].y, expected.y, epsilon = 1e-5);
        assert_abs_diff_eq!(image.pixels[index].z, expected.z, epsilon = 1e-5);
    }
    Ok(())
}

#[test]
fn empty_scene_is_transparent_black() -> anyhow::Result<()> {
    let mut scene = Scene::new();
    scene.add_camera(common::camera());
    let state = render(&scene, &params(ShaderKind::PathTrace, 8, 4), 2)?;

    assert!(get_image(&state).pixels.iter().all(|p| *p == Vec4::ZERO));
    assert!(state.hits().iter().all(|h| *h == 0));
    Ok(())
}

#[test]
fn emissive_quad_with_zero_bounces_is_pure_emission() -> anyhow::Result<()> {
    let emission = Vec3::new(2.0, 3.0, 4.0);
    let scene = common::emissive_quad(emission);
    let state = render(&scene, &params(ShaderKind::MatteOnly, 16, 0), 4)?;

    for pixel in get_image(&state).pixels {
        assert_eq!(pixel, emission.extend(1.0));
    }
    Ok(())
}

#[test]
fn renders_are_reproducible() -> anyhow::Result<()> {
    let scene = common::sphere_on_floor();
    let serial = RenderParams {
        parallel: false,
        ..params(ShaderKind::PathTrace, 24, 4)
    };
    let parallel = RenderParams {
        parallel: true,
        ..serial.clone()
    };

    let a = render(&scene, &serial, 8)?;
    let b = render(&scene, &serial, 8)?;
    let c = render(&scene, &parallel, 8)?;

    assert_eq!(a.accumulated(), b.accumulated());
    assert_eq!(a.accumulated(), c.accumulated());
    assert_eq!(a.hits(), c.hits());
    Ok(())
}

#[test]
fn different_seeds_give_different_noise() -> anyhow::Result<()> {
    let scene = common::sphere_on_floor();
    let a = render(&scene, &params(ShaderKind::PathTrace, 16, 4), 2)?;
    let b = render(
        &scene,
        &RenderParams {
            seed: 7,
            ..params(ShaderKind::PathTrace, 16, 4)
        },
        2,
    )?;
    assert_ne!(a.accumulated(), b.accumulated());
    Ok(())
}

#[test]
fn more_samples_reduce_error() -> anyhow::Result<()> {
    common::init_logging();
    let scene = common::sphere_on_floor();
    let base = params(ShaderKind::PathTrace, 16, 4);

    let reference = RenderParams {
        seed: 1,
        ..base.clone()
    };
    let reference = get_image(&render(&scene, &reference, 1024)?);

    let bvh = SceneBvh::build(&scene);
    let mut state = RenderState::new(&scene, &base)?;
    for _ in 0..16 {
        advance_one_sample(&mut state, &scene, &bvh, &base)?;
    }
    let error_16 = mean_squared_error(&get_image(&state), &reference);
    for _ in 16..256 {
        advance_one_sample(&mut state, &scene, &bvh, &base)?;
    }
    let error_256 = mean_squared_error(&get_image(&state), &reference);

    assert!(error_16 > 0.0);
    assert!(
        error_256 < error_16 * 0.5,
        "error did not drop: {error_16} -> {error_256}"
    );
    Ok(())
}

#[test]
fn non_finite_samples_are_clamped() -> anyhow::Result<()> {
    let mut scene = common::emissive_quad(Vec3::ONE);
    let texture = scene.add_texture(Texture::solid(Vec4::splat(f32::NAN)));
    scene.materials[0].emission_tex = Some(texture);

    let params = params(ShaderKind::PathTrace, 8, 2);
    let bvh = SceneBvh::build(&scene);
    let mut state = RenderState::new(&scene, &params)?;
    let summary = advance_one_sample(&mut state, &scene, &bvh, &params)?;

    assert_eq!(summary.clamped, state.pixel_count());
    assert_eq!(state.samples(), 1);
    assert!(state.accumulated().iter().all(|p| *p == Vec4::ZERO));
    assert!(state.hits().iter().all(|h| *h == 0));
    Ok(())
}

#[test]
fn extraction_checks_the_destination() -> anyhow::Result<()> {
    let scene = common::sky(Vec3::ONE);
    let state = render(&scene, &params(ShaderKind::PathTrace, 16, 1), 1)?;

    let mut narrow = ColorImage::new(15, 16, true);
    let before = narrow.clone();
    let err = get_image_into(&mut narrow, &state).unwrap_err();
    assert!(matches!(
        err,
        RenderError::ShapeMismatch(ShapeMismatchError::Size { .. })
    ));
    assert_eq!(narrow, before);

    let mut srgb = ColorImage::new(16, 16, false);
    assert!(get_image_into(&mut srgb, &state).is_err());

    let mut image = ColorImage::new(16, 16, true);
    get_image_into(&mut image, &state)?;
    assert_eq!(image, get_image(&state));
    Ok(())
}

#[test]
fn rendering_leaves_inputs_untouched() -> anyhow::Result<()> {
    let scene = common::sphere_on_floor();
    let params = params(ShaderKind::PathTrace, 8, 4);
    let scene_before = format!("{scene:?}");
    let params_before = params.clone();

    render(&scene, &params, 4)?;

    assert_eq!(format!("{scene:?}"), scene_before);
    assert_eq!(params, params_before);
    Ok(())
}

#[test]
fn unknown_shader_is_rejected_before_rendering() {
    let err = serde_json::from_str::<RenderParams>(r#"{ "shader": "toon" }"#).unwrap_err();
    assert!(err.to_string().contains("unknown shader `toon`"));

    let params: RenderParams = serde_json::from_str(r#"{ "shader": "matte", "samples": 8 }"#).unwrap();
    assert_eq!(params.shader, ShaderKind::MatteOnly);
    assert_eq!(params.samples, 8);
    assert_eq!(params.resolution, RenderParams::default().resolution);
}
