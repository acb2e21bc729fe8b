//! Blocking handoff to the UI-owning execution context.
//!
//! Rasterizing a live view has to happen wherever the UI toolkit runs, so the
//! session never captures directly: it posts the work through a
//! [`UiDispatcher`] and blocks until the result comes back, one synchronous
//! request/response per capture with no fire-and-forget. A stuck UI
//! context therefore shows up as a hung test for the outer runner to time out,
//! which is the intended behavior for a test-infrastructure component.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use tracing::{error, warn};

/// A unit of work posted to the UI-owning execution context.
pub type UiTask = Box<dyn FnOnce() + Send>;

/// Destination for work that must run on the UI-owning execution context.
///
/// Implementations run each posted task exactly once, preserving post order.
/// They are free to run it on the calling thread or elsewhere; blocking
/// request/response semantics are layered on top by [`run_blocking`].
pub trait UiDispatcher {
    /// Posts `task` for execution on the UI-owning context.
    fn post(&self, task: UiTask);
}

/// Posts `task` to `dispatcher` and blocks the calling context until the
/// task's return value comes back.
///
/// # Panics
///
/// Panics if the task never completes, either because the dispatcher dropped
/// it or because the task itself panicked on the UI context. Either way the
/// capture cannot proceed, so the test fails loudly at the call site.
pub fn run_blocking<T, F>(dispatcher: &dyn UiDispatcher, task: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    dispatcher.post(Box::new(move || {
        let _ = tx.send(task());
    }));
    rx.recv()
        .expect("ui task never completed (dispatcher gone or task panicked)")
}

/// Runs every task directly on the calling thread.
///
/// The right dispatcher for headless captures, where the calling thread owns
/// the (software) surface anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatcher;

impl UiDispatcher for InlineDispatcher {
    fn post(&self, task: UiTask) {
        task();
    }
}

/// A dedicated thread standing in for a toolkit's UI thread.
///
/// Tasks are queued over a channel and run one at a time, in post order, on a
/// single named thread. Dropping the dispatcher drains the queue and joins the
/// thread.
pub struct UiThreadDispatcher {
    sender: Option<mpsc::Sender<UiTask>>,
    thread: Option<JoinHandle<()>>,
}

impl UiThreadDispatcher {
    /// Name of the thread that executes dispatched tasks.
    pub const THREAD_NAME: &'static str = "render-gold-ui";

    /// Spawns the UI thread and returns a dispatcher bound to it.
    pub fn spawn() -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<UiTask>();
        let thread = thread::Builder::new()
            .name(Self::THREAD_NAME.to_string())
            .spawn(move || {
                for task in receiver {
                    task();
                }
            })
            .context("Failed to spawn the ui dispatch thread")?;

        Ok(Self {
            sender: Some(sender),
            thread: Some(thread),
        })
    }
}

impl UiDispatcher for UiThreadDispatcher {
    fn post(&self, task: UiTask) {
        let delivered = self
            .sender
            .as_ref()
            .is_some_and(|sender| sender.send(task).is_ok());
        if !delivered {
            // run_blocking callers observe this as a dropped response channel.
            error!("UI dispatch thread is gone; dropping posted task");
        }
    }
}

impl Drop for UiThreadDispatcher {
    fn drop(&mut self) {
        // Closing the channel lets the task loop drain and exit.
        drop(self.sender.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("UI dispatch thread panicked before shutdown");
            }
        }
    }
}
