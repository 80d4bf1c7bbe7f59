//! Simulated acquisition hardware.
//!
//! Stands in for a real device: the source fills every buffer with one
//! rotating letter and the sink discards what it receives. Both sides
//! count their calls so a run can be checked at exit.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use daq_core::{Acquire, Sink};

#[derive(Debug, Default)]
struct Counters {
    fills: AtomicU64,
    acquired: AtomicU64,
    sent: AtomicU64,
}

/// Shared handle to the simulated device.
#[derive(Debug, Clone, Default)]
pub struct SimulatedHardware {
    counters: Arc<Counters>,
}

/// Call counts of the simulated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoStatistics {
    pub acquired: u64,
    pub sent: u64,
}

impl SimulatedHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquisition side. Every call fills the whole buffer with the next
    /// letter of `a..=z`, wrapping around.
    pub fn source(&self) -> impl Acquire + 'static {
        let counters = Arc::clone(&self.counters);
        move |output: &mut [u8]| {
            let n = counters.fills.fetch_add(1, Ordering::Relaxed);
            output.fill(b'a' + (n % 26) as u8);
            counters.acquired.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Send side. Data is dropped; only the call is counted.
    pub fn sink(&self) -> impl Sink + 'static {
        let counters = Arc::clone(&self.counters);
        move |_input: &[u8]| {
            counters.sent.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn statistics(&self) -> IoStatistics {
        IoStatistics {
            acquired: self.counters.acquired.load(Ordering::Relaxed),
            sent: self.counters.sent.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Display for IoStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[io] Statistics:")?;
        writeln!(f, "\tget_data: {}", self.acquired)?;
        write!(f, "\tsend_data: {}", self.sent)
    }
}

// ── Tests ────────────────────────────────────────────────────────
