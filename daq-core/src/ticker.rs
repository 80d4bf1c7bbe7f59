//! Tick latch between the external clock and the producer thread.
//!
//! The clock calls [`TickHandle::tick`]; the producer parks in
//! [`TickHandle::wait`]. The latch is binary: ticks that arrive while one
//! is already pending coalesce into a single producer iteration.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// Outcome of [`TickHandle::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The clock fired.
    Fired,
    /// The wait was released by [`TickHandle::abort`].
    Aborted,
}

#[derive(Debug, Default)]
struct LatchState {
    pending: bool,
    aborted: bool,
}

#[derive(Debug, Default)]
struct Latch {
    state: Mutex<LatchState>,
    signal: Condvar,
}

/// Cloneable handle to a shared tick latch.
#[derive(Debug, Clone, Default)]
pub struct TickHandle {
    latch: Arc<Latch>,
}

impl TickHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal one tick. Never blocks.
    pub fn tick(&self) {
        self.latch.state.lock().pending = true;
        self.latch.signal.notify_one();
    }

    /// Release the current (or next) `wait` without a tick.
    pub fn abort(&self) {
        self.latch.state.lock().aborted = true;
        self.latch.signal.notify_one();
    }

    /// Block until a tick or an abort. An abort wins over a pending tick
    /// and is consumed by the wait it releases.
    pub fn wait(&self) -> Tick {
        let mut state = self.latch.state.lock();
        while !state.pending && !state.aborted {
            self.latch.signal.wait(&mut state);
        }
        if state.aborted {
            state.aborted = false;
            return Tick::Aborted;
        }
        state.pending = false;
        Tick::Fired
    }
}
