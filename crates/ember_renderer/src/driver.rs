//! Full-frame sampling passes.
//!
//! A pass draws one jittered camera sample per pixel from that pixel's own
//! random stream and adds the shaded radiance to the pixel's running sum.
//! Pixels share nothing mutable, so the sequential and the rayon-parallel
//! modes produce bit-identical results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use ember_core::{Camera, Intersector, Scene};
use ember_math::{is_finite4, Vec2, Vec4};
use rayon::prelude::*;

use crate::camera::eval_camera;
use crate::error::RenderResult;
use crate::params::RenderParams;
use crate::sampling::{rand1f, PixelRng};
use crate::shader::{Shader, Tracer};
use crate::state::RenderState;

/// Statistics of one completed sampling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSummary {
    /// Sample count of the state after the pass
    pub sample: u32,
    /// Non-finite samples that were replaced by zero
    pub clamped: usize,
    pub elapsed: Duration,
}

/// Result of one pixel before it is committed.
struct PixelSample {
    radiance: Vec4,
    rng: PixelRng,
    clamped: bool,
}

/// Add one sample to every pixel of `state`.
///
/// Always advances the sample counter by one, even past `params.samples`.
pub fn advance_one_sample(
    state: &mut RenderState,
    scene: &Scene,
    intersector: &dyn Intersector,
    params: &RenderParams,
) -> RenderResult<PassSummary> {
    let camera = params.camera(scene)?;
    let never = AtomicBool::new(false);
    let tracer = Tracer::new(scene, intersector, params);
    let summary = run_pass(state, &tracer, camera, &never);
    // A pass that cannot be stopped always lands
    Ok(summary.unwrap_or(PassSummary {
        sample: state.samples,
        clamped: 0,
        elapsed: Duration::ZERO,
    }))
}

/// Add one sample to every pixel while the state is short of
/// `params.samples`. Returns `None` once the target is reached.
pub fn render_samples(
    state: &mut RenderState,
    scene: &Scene,
    intersector: &dyn Intersector,
    params: &RenderParams,
) -> RenderResult<Option<PassSummary>> {
    if state.samples >= params.samples {
        return Ok(None);
    }
    advance_one_sample(state, scene, intersector, params).map(Some)
}

/// Trace one pass, checking `stop` before every pixel.
///
/// Results are staged and only committed if every pixel finished, so a
/// stopped pass leaves sums, counters and random streams as they were.
pub(crate) fn run_pass(
    state: &mut RenderState,
    tracer: &Tracer<'_>,
    camera: &Camera,
    stop: &AtomicBool,
) -> Option<PassSummary> {
    let start = Instant::now();
    let shader = tracer.params.shader.shader();
    let (width, height) = (state.width, state.height);

    let sample = |index: usize, rng: &PixelRng| -> Option<PixelSample> {
        if stop.load(Ordering::Relaxed) {
            return None;
        }
        let mut rng = rng.clone();
        let (i, j) = (index % width, index / width);
        let (radiance, clamped) = sample_pixel(tracer, camera, shader, i, j, width, height, &mut rng);
        Some(PixelSample {
            radiance,
            rng,
            clamped,
        })
    };

    let staged: Option<Vec<PixelSample>> = if tracer.params.parallel {
        state
            .rngs
            .par_iter()
            .enumerate()
            .map(|(index, rng)| sample(index, rng))
            .collect()
    } else {
        state
            .rngs
            .iter()
            .enumerate()
            .map(|(index, rng)| sample(index, rng))
            .collect()
    };

    let Some(staged) = staged else {
        log::debug!("pass {} stopped", state.samples + 1);
        return None;
    };

    let mut clamped = 0;
    for (index, pixel) in staged.into_iter().enumerate() {
        state.image[index] += pixel.radiance;
        state.hits[index] += u32::from(pixel.radiance.w > 0.0);
        state.rngs[index] = pixel.rng;
        clamped += usize::from(pixel.clamped);
    }
    state.samples += 1;

    let summary = PassSummary {
        sample: state.samples,
        clamped,
        elapsed: start.elapsed(),
    };
    if clamped > 0 {
        log::warn!(
            "sample {}: {} non-finite samples clamped to zero",
            summary.sample,
            clamped
        );
    }
    log::trace!("sample {} took {:?}", summary.sample, summary.elapsed);
    Some(summary)
}

/// One jittered camera sample through pixel (i, j).
#[allow(clippy::too_many_arguments)]
fn sample_pixel(
    tracer: &Tracer<'_>,
    camera: &Camera,
    shader: &dyn Shader,
    i: usize,
    j: usize,
    width: usize,
    height: usize,
    rng: &mut PixelRng,
) -> (Vec4, bool) {
    let u = (i as f32 + rand1f(rng)) / width as f32;
    let v = (j as f32 + rand1f(rng)) / height as f32;
    let ray = eval_camera(camera, Vec2::new(u, v));
    let radiance = shader.shade(tracer, &ray, 0, rng);
    if is_finite4(radiance) {
        (radiance, false)
    } else {
        (Vec4::ZERO, true)
    }
}
