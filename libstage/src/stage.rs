//! The stage runtime.
//!
//! A [`Stage`] owns its inbox queue and its single worker thread. The
//! worker pops one line at a time, applies the stage's
//! [`Transform`](crate::Transform), and hands the result to the next
//! stage through the forward hook. The in-band
//! [`SENTINEL`](crate::SENTINEL) is forwarded verbatim and stops the
//! worker.

use crate::{transform::Transform, StageError, SENTINEL};
use libsync::{BoundedQueue, Signal};
use log::{debug, warn};
use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::{Builder, JoinHandle},
};

/// The capability a stage uses to hand a line to its downstream stage.
///
/// A hook is the downstream stage's enqueue captured as a callable, so
/// each stage instance binds to a distinct target; see
/// [`Stage::forward_hook`].
pub type ForwardHook = Box<dyn Fn(String) -> Result<(), StageError> + Send + Sync>;

/// State shared between a stage handle and its worker.
struct StageCore {
    name: String,
    inbox: BoundedQueue,
    forward: Mutex<Option<ForwardHook>>,
    /// Set when the stage must stop consuming: either the worker saw
    /// the sentinel or `fini` was called.
    stop: Signal,
    /// Raised by the worker as its first action; `spawn` returns only
    /// after observing it.
    ready: Signal,
}

impl StageCore {
    /// Enqueues a line, unless the stage has already stopped.
    fn put(&self, line: String) -> Result<(), StageError> {
        if self.stop.is_signaled() {
            return Err(StageError::Finished(self.name.clone()));
        }
        self.inbox.put(line);
        Ok(())
    }

    /// Hands a line to the downstream stage, if one is attached.
    ///
    /// A hook error is operational, not fatal: it is logged and the
    /// worker moves on. Without a hook the line has reached the end of
    /// the pipeline and is dropped.
    fn forward_line(&self, line: String) {
        if let Some(hook) = self.lock_forward().as_ref() {
            if let Err(e) = hook(line) {
                warn!("stage \"{}\": forward failed: {e}", self.name);
            }
        }
    }

    fn lock_forward(&self) -> MutexGuard<'_, Option<ForwardHook>> {
        self.forward.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The worker loop.
    fn work(&self, mut transform: Box<dyn Transform>) {
        self.ready.signal();

        while !self.stop.is_signaled() {
            let Some(line) = self.inbox.get_or_cancel(|| self.stop.is_signaled()) else {
                // `fini` interrupted an idle worker.
                break;
            };

            if line == SENTINEL {
                // Forwarded verbatim, even if the hook reports failure.
                self.forward_line(line);
                self.stop.signal();
                self.inbox.signal_finished();
                break;
            }

            match transform.apply(&line).into_line(line) {
                Some(output) => self.forward_line(output),
                None => debug!("stage \"{}\": transform dropped a line", self.name),
            }
        }
    }
}

/// One unit of the pipeline: a queue, a worker, a transform, and an
/// optional forward hook.
pub struct Stage {
    core: Arc<StageCore>,
    worker: Option<JoinHandle<()>>,
}

impl Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.core.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl Stage {
    /// Creates a stage and starts its worker.
    ///
    /// The call returns only after the worker has raised its `ready`
    /// latch, so callers may [`place_work`](Stage::place_work)
    /// immediately on return.
    pub fn spawn(
        name: impl Into<String>,
        queue_size: usize,
        transform: Box<dyn Transform>,
    ) -> Result<Self, StageError> {
        let core = Arc::new(StageCore {
            name: name.into(),
            inbox: BoundedQueue::new(queue_size)?,
            forward: Mutex::new(None),
            stop: Signal::new(),
            ready: Signal::new(),
        });

        let worker = {
            let core = core.clone();
            Builder::new()
                .name(core.name.clone())
                .spawn(move || core.work(transform))?
        };

        core.ready.wait();

        Ok(Self {
            core,
            worker: Some(worker),
        })
    }

    /// The stage's display name.
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Copies a line into the stage's inbox, blocking while the inbox
    /// is full.
    ///
    /// Fails once the stage has observed the sentinel or has been
    /// finalized.
    pub fn place_work(&self, line: &str) -> Result<(), StageError> {
        self.core.put(line.to_string())
    }

    /// Sets the downstream hook. May be called at most once, before
    /// input flows.
    pub fn attach(&self, hook: ForwardHook) -> Result<(), StageError> {
        let mut forward = self.core.lock_forward();
        if forward.is_some() {
            return Err(StageError::Attached(self.core.name.clone()));
        }
        *forward = Some(hook);
        Ok(())
    }

    /// The capability to enqueue into this stage, for wiring an
    /// upstream stage's [`attach`](Stage::attach).
    pub fn forward_hook(&self) -> ForwardHook {
        let core = self.core.clone();
        Box::new(move |line| core.put(line))
    }

    /// Blocks until this stage has observed the sentinel (or has been
    /// finalized).
    pub fn wait_finished(&self) {
        self.core.inbox.wait_finished();
    }

    /// Returns whether this stage has observed the sentinel (or has
    /// been finalized).
    pub fn is_finished(&self) -> bool {
        self.core.inbox.is_finished()
    }

    /// Stops the worker and joins it. Idempotent after the first
    /// success.
    ///
    /// An idle worker is woken through the inbox's `not_empty` latch so
    /// the join cannot hang. The inbox's `finished` latch is set on the
    /// way out, releasing any late observer.
    pub fn fini(&mut self) -> Result<(), StageError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        self.core.stop.signal();
        self.core.inbox.wake_consumers();

        let joined = worker
            .join()
            .map_err(|_| StageError::Panicked(self.core.name.clone()));
        self.core.inbox.signal_finished();
        joined
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        let _ = self.fini();
    }
}
