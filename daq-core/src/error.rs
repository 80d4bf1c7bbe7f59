//! Domain-specific error types for the acquisition pipeline.
//!
//! Construction and thread-spawn failures propagate to the caller.
//! Everything raised from inside a worker iteration is reported by the
//! worker loop and never leaves its thread.

use thiserror::Error;

use crate::worker::WorkerState;

/// The canonical error type for the acquisition pipeline.
#[derive(Debug, Error)]
pub enum DaqError {
    // ── Construction Errors ──────────────────────────────────────
    /// Queue depth or watermark boundaries are inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    // ── Per-iteration Errors ─────────────────────────────────────
    /// The producer found every queue slot taken.
    #[error("overload: failed to enqueue, all {depth} slots occupied")]
    Overload { depth: usize },

    /// A frame reached the dispatcher with no handler for its kind.
    #[error("unknown frame kind: {0}")]
    UnknownFrameKind(String),

    // ── Lifecycle Errors ─────────────────────────────────────────
    /// The OS refused to create a worker thread.
    #[error("failed to spawn worker {name}: {source}")]
    ThreadSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A lifecycle call was made from a state that does not allow it.
    #[error("worker {name} cannot start from state {state}")]
    InvalidState { name: String, state: WorkerState },

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for DaqError {
    fn from(s: String) -> Self {
        DaqError::Other(s)
    }
}

impl From<&str> for DaqError {
    fn from(s: &str) -> Self {
        DaqError::Other(s.to_string())
    }
}
