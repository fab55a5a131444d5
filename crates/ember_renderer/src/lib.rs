//! Ember Renderer - progressive CPU path tracing.
//!
//! Estimates per-pixel radiance by averaging independent random walks, one
//! sample per pixel per pass:
//!
//! - **State**: `RenderState` owns the running sums and one random stream
//!   per pixel, seeded deterministically from `RenderParams::seed`
//! - **Driver**: `advance_one_sample` / `render_samples` run a full-frame pass,
//!   sequentially or on the rayon pool, with bit-identical results
//! - **Async**: `RenderContext` runs passes on a cancelable worker thread
//! - **Output**: `get_image` / `get_image_into` divide the sums by the sample
//!   count; `render_preview` produces a quick upsampled estimate
//!
//! Shading is selected by `ShaderKind`: the physical path tracer, a
//! matte-only variant, and single-bounce eyelight/normal/texcoord/color views.

mod camera;
mod context;
mod driver;
mod error;
mod image;
mod params;
mod preview;
mod sampling;
mod shader;
mod state;

pub use camera::{eval_camera, image_size};
pub use context::RenderContext;
pub use driver::{advance_one_sample, render_samples, PassSummary};
pub use error::{ConfigurationError, RenderError, RenderResult, ShapeMismatchError};
pub use image::{get_image, get_image_into, ColorImage};
pub use params::{RenderParams, ShaderKind};
pub use preview::render_preview;
pub use sampling::PixelRng;
pub use shader::{Shader, SurfacePoint, Tracer};
pub use state::RenderState;

/// Re-export scene types the renderer API is expressed in
pub use ember_core::{Intersector, Scene, SceneBvh};
