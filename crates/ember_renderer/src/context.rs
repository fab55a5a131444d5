//! Cancelable background sampling for interactive front ends.
//!
//! A [`RenderContext`] runs at most one sampling pass at a time on a worker
//! thread. Front ends poll [`RenderContext::is_done`] once per frame, read
//! the image, and start the next pass:
//!
//! ```ignore
//! let mut context = RenderContext::new();
//! context.start(&state, &scene, &bvh, &params)?;
//! loop {
//!     if context.is_done() {
//!         get_image_into(&mut image, &state.lock())?;
//!         context.start(&state, &scene, &bvh, &params)?;
//!     }
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use ember_core::{Intersector, Scene};
use parking_lot::Mutex;

use crate::driver::run_pass;
use crate::error::{RenderError, RenderResult};
use crate::image::ColorImage;
use crate::params::RenderParams;
use crate::preview::render_preview;
use crate::shader::Tracer;
use crate::state::RenderState;

/// Handle to at most one in-flight sampling pass.
#[derive(Debug, Default)]
pub struct RenderContext {
    worker: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    done: Arc<AtomicBool>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch one sampling pass in the background.
    ///
    /// Returns `Ok(false)` without starting anything if the state already
    /// holds `params.samples` samples. A previous pass that has finished is
    /// joined first; one that is still running must be canceled, otherwise
    /// this fails with [`RenderError::TaskInFlight`].
    pub fn start(
        &mut self,
        state: &Arc<Mutex<RenderState>>,
        scene: &Arc<Scene>,
        intersector: &Arc<dyn Intersector>,
        params: &RenderParams,
    ) -> RenderResult<bool> {
        // A worker that reported done only has to exit
        if self.is_running() && !self.is_done() {
            return Err(RenderError::TaskInFlight);
        }
        self.join();

        params.camera(scene)?;
        if state.lock().samples >= params.samples {
            return Ok(false);
        }

        self.stop.store(false, Ordering::SeqCst);
        self.done.store(false, Ordering::SeqCst);

        let state = Arc::clone(state);
        let scene = Arc::clone(scene);
        let intersector = Arc::clone(intersector);
        let params = params.clone();
        let stop = Arc::clone(&self.stop);
        let done = Arc::clone(&self.done);

        self.worker = Some(thread::spawn(move || {
            if stop.load(Ordering::SeqCst) {
                return;
            }
            let Ok(camera) = params.camera(&scene) else {
                return;
            };
            let tracer = Tracer::new(&scene, intersector.as_ref(), &params);
            let mut state = state.lock();
            if let Some(summary) = run_pass(&mut state, &tracer, camera, &stop) {
                done.store(true, Ordering::SeqCst);
                log::debug!("render pass done at sample {}", summary.sample);
            }
        }));
        log::debug!("render pass started");
        Ok(true)
    }

    /// Stop the running pass and wait for the worker to exit.
    ///
    /// A pass that is stopped contributes nothing. No-op when idle.
    pub fn cancel(&mut self) {
        if self.worker.is_none() {
            return;
        }
        self.stop.store(true, Ordering::SeqCst);
        self.join();
        log::debug!("render pass canceled");
    }

    /// True if the last pass completed and was added to the state.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    /// True while a worker is still tracing.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Render a low-resolution preview into `image`.
    ///
    /// Runs on the calling thread and does not touch the background pass.
    pub fn preview(
        &self,
        image: &mut ColorImage,
        scene: &Scene,
        intersector: &dyn Intersector,
        params: &RenderParams,
    ) -> RenderResult<()> {
        render_preview(image, scene, intersector, params)
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("render worker panicked");
            }
        }
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        self.cancel();
    }
}
