//! Render scheduling
//!
//! Keeps rendering off the interaction thread with two disciplines:
//! live (drag) updates are coalesced so at most one render is in flight
//! and a newer request supersedes any not-yet-started one, while committed
//! updates block until their frame is complete. The last submitted value
//! always ends up rendered; intermediate drag values may be dropped.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::decoders::DecodedImage;
use crate::models::EditParams;
use crate::noise::NoiseField;
use crate::pipeline::{render, RenderContext, RenderedFrame};

/// One render request: immutable inputs captured at submit time, so a
/// render never observes a half-updated parameter set.
#[derive(Clone)]
pub struct RenderJob {
    pub base: Arc<DecodedImage>,
    pub noise: Arc<NoiseField>,
    pub params: EditParams,
}

struct State {
    pending: Option<RenderJob>,
    busy: bool,
    shutdown: bool,
    latest: Option<Arc<RenderedFrame>>,
    executed: u64,
}

struct Shared {
    state: Mutex<State>,
    work_ready: Condvar,
    idle: Condvar,
}

/// A single-worker render queue with supersession.
pub struct RenderScheduler {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl RenderScheduler {
    pub fn new(ctx: RenderContext) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                pending: None,
                busy: false,
                shutdown: false,
                latest: None,
                executed: 0,
            }),
            work_ready: Condvar::new(),
            idle: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::spawn(move || worker_loop(worker_shared, ctx));

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Queue a live render. Replaces any pending (not yet started) job.
    pub fn submit(&self, job: RenderJob) {
        let mut state = self.shared.state.lock().unwrap();
        state.pending = Some(job);
        self.shared.work_ready.notify_one();
    }

    /// Queue a job and block until the queue drains. Used for committed
    /// edits, which must never be dropped.
    pub fn render_blocking(&self, job: RenderJob) -> Option<Arc<RenderedFrame>> {
        self.submit(job);
        self.wait_idle()
    }

    /// Block until no work is pending or in flight, then return the most
    /// recently completed frame.
    pub fn wait_idle(&self) -> Option<Arc<RenderedFrame>> {
        let mut state = self.shared.state.lock().unwrap();
        while state.busy || state.pending.is_some() {
            state = self.shared.idle.wait(state).unwrap();
        }
        state.latest.clone()
    }

    /// The most recently completed frame, if any.
    pub fn latest_frame(&self) -> Option<Arc<RenderedFrame>> {
        self.shared.state.lock().unwrap().latest.clone()
    }

    /// Number of renders actually executed (superseded jobs never count).
    pub fn renders_executed(&self) -> u64 {
        self.shared.state.lock().unwrap().executed
    }

    /// Drop the completed-frame cache. Called when a new image is loaded.
    pub fn clear(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.pending = None;
        state.latest = None;
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.shutdown = true;
            state.pending = None;
            self.shared.work_ready.notify_one();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(shared: Arc<Shared>, ctx: RenderContext) {
    loop {
        let job = {
            let mut state = shared.state.lock().unwrap();
            loop {
                if state.shutdown {
                    return;
                }
                if let Some(job) = state.pending.take() {
                    state.busy = true;
                    break job;
                }
                state = shared.work_ready.wait(state).unwrap();
            }
        };

        let frame = render(&ctx, &job.base, &job.noise, &job.params);

        let mut state = shared.state.lock().unwrap();
        state.latest = Some(Arc::new(frame));
        state.executed += 1;
        state.busy = false;
        shared.idle.notify_all();
    }
}
