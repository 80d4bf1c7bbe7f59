//! Dedicated-thread runner for a repeated unit of work.
//!
//! ```text
//!  Idle ──start──► Running ──request_stop──► Stopping ──join──► Stopped
//! ```
//!
//! The loop checks a [`CancellationToken`] before every iteration. Stopping
//! cancels the token, runs the abort hook once so a work function parked in
//! a blocking call returns, then joins the thread.

use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::DaqError;

type AbortHook = Box<dyn FnOnce() + Send>;
type ThreadBody = Box<dyn FnOnce() + Send>;

// ── WorkerState ──────────────────────────────────────────────────

/// Lifecycle of a [`Worker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    /// Constructed, no thread yet.
    #[default]
    Idle,
    /// Thread spawned and looping.
    Running,
    /// Stop requested; abort hook and join in progress.
    Stopping,
    /// Thread joined. Terminal.
    Stopped,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Stopping => write!(f, "Stopping"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

// ── WorkerStats ──────────────────────────────────────────────────

/// Counters updated by the worker thread.
#[derive(Debug, Default)]
pub struct WorkerStats {
    iterations: AtomicU64,
    failures: AtomicU64,
}

impl WorkerStats {
    /// Completed work invocations, failed ones included.
    pub fn iterations(&self) -> u64 {
        self.iterations.load(Ordering::Relaxed)
    }

    /// Invocations that returned an error or panicked.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

// ── Worker ───────────────────────────────────────────────────────

/// Owns one OS thread that calls a work function until stopped.
///
/// Dropping a running worker stops it, so the thread is always joined
/// before the worker goes away.
pub struct Worker {
    name: String,
    state: WorkerState,
    cancel: CancellationToken,
    abort: Option<AbortHook>,
    handle: Option<JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: WorkerState::Idle,
            cancel: CancellationToken::new(),
            abort: None,
            handle: None,
            stats: Arc::new(WorkerStats::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Spawn the thread and start calling `work` in a loop.
    ///
    /// `abort` is kept until [`request_stop`](Self::request_stop) and is
    /// run there exactly once. Errors returned by `work` and panics inside
    /// it are logged; the loop carries on with the next iteration.
    ///
    /// Only valid from [`WorkerState::Idle`]. If the OS refuses to create
    /// the thread the worker stays `Idle`.
    pub fn start<W, A>(&mut self, work: W, abort: A) -> Result<(), DaqError>
    where
        W: FnMut() -> Result<(), DaqError> + Send + 'static,
        A: FnOnce() + Send + 'static,
    {
        self.start_with(work, abort, |builder, body| builder.spawn(body))
    }

    fn start_with<W, A, S>(&mut self, work: W, abort: A, spawn: S) -> Result<(), DaqError>
    where
        W: FnMut() -> Result<(), DaqError> + Send + 'static,
        A: FnOnce() + Send + 'static,
        S: FnOnce(thread::Builder, ThreadBody) -> io::Result<JoinHandle<()>>,
    {
        if self.state != WorkerState::Idle {
            return Err(DaqError::InvalidState {
                name: self.name.clone(),
                state: self.state,
            });
        }

        info!(worker = %self.name, "starting up");
        let name = self.name.clone();
        let cancel = self.cancel.clone();
        let stats = Arc::clone(&self.stats);

        let builder = thread::Builder::new().name(self.name.clone());
        let body: ThreadBody = Box::new(move || run_loop(&name, &cancel, &stats, work));
        let handle = spawn(builder, body).map_err(|source| {
            error!(worker = %self.name, "failed to create thread: {source}");
            DaqError::ThreadSpawn {
                name: self.name.clone(),
                source,
            }
        })?;

        self.handle = Some(handle);
        self.abort = Some(Box::new(abort));
        self.state = WorkerState::Running;
        Ok(())
    }

    /// Stop the loop, unblock the work function and join the thread.
    ///
    /// A no-op unless the worker is `Running`. The iteration in flight is
    /// allowed to finish.
    pub fn request_stop(&mut self) {
        if self.state != WorkerState::Running {
            return;
        }
        self.state = WorkerState::Stopping;
        self.cancel.cancel();

        if let Some(abort) = self.abort.take() {
            abort();
        }
        info!(worker = %self.name, "shutdown");

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!(worker = %self.name, "thread terminated abnormally");
            }
        }
        self.state = WorkerState::Stopped;
    }

    /// Whether the loop is still being driven.
    pub fn is_running(&self) -> bool {
        self.state == WorkerState::Running
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.request_stop();
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

// ── Internal ─────────────────────────────────────────────────────

fn run_loop<W>(name: &str, cancel: &CancellationToken, stats: &WorkerStats, mut work: W)
where
    W: FnMut() -> Result<(), DaqError>,
{
    debug!(worker = %name, "running");
    while !cancel.is_cancelled() {
        match panic::catch_unwind(AssertUnwindSafe(&mut work)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                stats.failures.fetch_add(1, Ordering::Relaxed);
                warn!(worker = %name, "{e}");
            }
            Err(payload) => {
                stats.failures.fetch_add(1, Ordering::Relaxed);
                error!(
                    worker = %name,
                    "something unforeseen happened ({})",
                    panic_message(payload.as_ref())
                );
            }
        }
        stats.iterations.fetch_add(1, Ordering::Relaxed);
    }
    debug!(worker = %name, "loop exited");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

// ── Tests ────────────────────────────────────────────────────────
