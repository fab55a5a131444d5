//! Ember command line renderer.
//!
//! ```text
//! ember [params.json] [out.png]
//! ```
//!
//! Renders the built-in demo scene. Parameters not given in the JSON file
//! keep their defaults. Set `EMBER_PROGRESSIVE=1` to render through the
//! cancelable background loop instead of sequential passes.

mod demo;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ember_renderer::{
    get_image, get_image_into, image_size, render_samples, ColorImage, Intersector, RenderContext,
    RenderParams, RenderState, Scene, SceneBvh,
};
use parking_lot::Mutex;

fn load_params(path: Option<&Path>) -> Result<RenderParams> {
    let Some(path) = path else {
        return Ok(RenderParams::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let params = serde_json::from_str(&text)
        .with_context(|| format!("invalid render parameters in {}", path.display()))?;
    Ok(params)
}

fn save_image(image: &ColorImage, path: &Path) -> Result<()> {
    let buffer = image::RgbaImage::from_raw(
        image.width as u32,
        image.height as u32,
        image.to_rgba8(),
    )
    .context("image buffer has the wrong size")?;
    buffer
        .save(path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    log::info!("saved {}", path.display());
    Ok(())
}

/// Sequential passes on the calling thread.
fn render_batch(scene: &Scene, bvh: &SceneBvh, params: &RenderParams) -> Result<ColorImage> {
    let mut state = RenderState::new(scene, params)?;
    let start = Instant::now();
    while let Some(summary) = render_samples(&mut state, scene, bvh, params)? {
        log::info!(
            "render sample {}/{}: {:.2?}",
            summary.sample,
            params.samples,
            start.elapsed()
        );
    }
    Ok(get_image(&state))
}

/// Preview first, then background passes polled like a display loop.
fn render_progressive(scene: Scene, bvh: SceneBvh, params: &RenderParams) -> Result<ColorImage> {
    let camera = params.camera(&scene)?;
    let (width, height) = image_size(camera, params.resolution);
    let mut image = ColorImage::new(width, height, true);

    let state = Arc::new(Mutex::new(RenderState::new(&scene, params)?));
    let scene = Arc::new(scene);
    let bvh: Arc<dyn Intersector> = Arc::new(bvh);
    let mut context = RenderContext::new();

    context.preview(&mut image, &scene, bvh.as_ref(), params)?;
    log::info!("preview ready");

    let start = Instant::now();
    if !context.start(&state, &scene, &bvh, params)? {
        return Ok(image);
    }
    loop {
        if context.is_done() {
            let samples = {
                let state = state.lock();
                get_image_into(&mut image, &state)?;
                state.samples()
            };
            log::info!(
                "render sample {}/{}: {:.2?}",
                samples,
                params.samples,
                start.elapsed()
            );
            if !context.start(&state, &scene, &bvh, params)? {
                break;
            }
        } else if !context.is_running() && !context.is_done() {
            // The worker exited without finishing its pass
            anyhow::bail!("render pass stopped unexpectedly");
        }
        thread::sleep(Duration::from_millis(10));
    }
    Ok(image)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = env::args_os().skip(1);
    let params_path = args.next().map(PathBuf::from);
    let output = args.next().map_or_else(|| PathBuf::from("out.png"), PathBuf::from);
    let params = load_params(params_path.as_deref())?;
    let progressive = env::var("EMBER_PROGRESSIVE").is_ok_and(|value| value == "1");

    let scene = demo::demo_scene();
    scene.validate().context("demo scene is invalid")?;
    log::info!(
        "scene: {} instances, {} shapes, {} materials",
        scene.instances.len(),
        scene.shapes.len(),
        scene.materials.len()
    );

    let start = Instant::now();
    let bvh = SceneBvh::build(&scene);
    log::info!(
        "build bvh: {} primitives in {:.2?}",
        bvh.primitive_count(),
        start.elapsed()
    );

    log::info!(
        "rendering {} samples with {} ({} bounces)",
        params.samples,
        params.shader,
        params.bounces
    );
    let image = if progressive {
        render_progressive(scene, bvh, &params)?
    } else {
        render_batch(&scene, &bvh, &params)?
    };

    save_image(&image, &output)
}
