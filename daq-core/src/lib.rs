//! # daq-core
//!
//! Concurrency core of a fixed-rate data-acquisition pipeline.
//!
//! This crate contains:
//! - **Queue**: `BoundedQueue` — fixed-capacity FIFO with non-blocking
//!   enqueue, blocking dequeue, watermark hooks and abort
//! - **Worker**: `Worker` — one OS thread looping a work function until a
//!   `CancellationToken` fires, with an abort hook to unblock it
//! - **Producer / Consumer**: the two iterations the workers run
//! - **Frame**: `Frame` / `FrameKind` — tagged fixed-size payloads
//! - **Dispatch**: `KindDispatcher` — per-kind tagging before send
//! - **Pipeline**: wiring of all of the above for one run
//! - **Error**: `DaqError` — typed, `thiserror`-based error hierarchy

pub mod consumer;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod producer;
pub mod queue;
pub mod ticker;
pub mod worker;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use consumer::Consumer;
pub use dispatch::{Dispatch, KindDispatcher};
pub use error::DaqError;
pub use frame::{FRAME_SIZE, Frame, FrameKind};
pub use io::{Acquire, Sink};
pub use pipeline::{Pipeline, PipelineConfig, WatermarkConfig};
pub use producer::Producer;
pub use queue::{BoundedQueue, Full, QUEUE_DEPTH, Watermark};
pub use ticker::{Tick, TickHandle};
pub use worker::{Worker, WorkerState, WorkerStats};
