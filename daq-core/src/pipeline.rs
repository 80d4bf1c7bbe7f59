//! Producer/consumer wiring around one shared queue.
//!
//! ```text
//!  clock ──tick──► [producer worker] ──enqueue──► BoundedQueue ──dequeue──► [consumer worker] ──► sink
//! ```
//!
//! The pipeline owns both workers. Stopping (or dropping) it stops the
//! producer first, then the consumer, so the queue outlives both threads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::consumer::Consumer;
use crate::dispatch::Dispatch;
use crate::error::DaqError;
use crate::frame::{FRAME_SIZE, Frame, FrameKind};
use crate::io::{Acquire, Sink};
use crate::producer::Producer;
use crate::queue::{BoundedQueue, QUEUE_DEPTH, Watermark};
use crate::ticker::TickHandle;
use crate::worker::{Worker, WorkerStats};

// ── PipelineConfig ───────────────────────────────────────────────

/// Occupancy thresholds that trigger fill-level log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    pub low: usize,
    pub high: usize,
}

/// Static shape of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Domain every produced frame is tagged with.
    pub kind: FrameKind,
    /// Payload size shared by producer and consumer.
    pub frame_size: usize,
    /// Queue capacity.
    pub queue_depth: usize,
    /// Optional fill-level notifications.
    pub watermark: Option<WatermarkConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            kind: FrameKind::Video,
            frame_size: FRAME_SIZE,
            queue_depth: QUEUE_DEPTH,
            watermark: None,
        }
    }
}

// ── Pipeline ─────────────────────────────────────────────────────

/// A running producer/consumer pair.
pub struct Pipeline {
    queue: Arc<BoundedQueue<Frame>>,
    ticks: TickHandle,
    producer: Worker,
    consumer: Worker,
}

impl Pipeline {
    /// Build the queue and start the consumer, then the producer.
    ///
    /// If the producer thread cannot be spawned, the consumer is stopped
    /// again before the error is returned.
    pub fn start<A, D, S>(
        config: PipelineConfig,
        acquire: A,
        dispatch: D,
        sink: S,
    ) -> Result<Self, DaqError>
    where
        A: Acquire + 'static,
        D: Dispatch + 'static,
        S: Sink + 'static,
    {
        let queue = Arc::new(build_queue(&config)?);

        let mut consumer_runnable = Consumer::new(Arc::clone(&queue), dispatch, sink);
        let mut consumer = Worker::new("consumer");
        let consumer_abort = consumer_runnable.aborter();
        consumer.start(move || consumer_runnable.consume(), consumer_abort)?;

        let mut producer_runnable = Producer::new(Arc::clone(&queue), acquire, config.kind)
            .with_frame_size(config.frame_size);
        let ticks = producer_runnable.ticks();
        let mut producer = Worker::new("producer");
        let producer_ticks = ticks.clone();
        // On failure `consumer` is dropped here, which stops and joins it.
        producer.start(move || producer_runnable.produce(), move || producer_ticks.abort())?;

        info!(
            kind = %config.kind,
            frame_size = config.frame_size,
            depth = config.queue_depth,
            "pipeline running"
        );

        Ok(Self {
            queue,
            ticks,
            producer,
            consumer,
        })
    }

    /// Handle the external clock uses to pace the producer.
    pub fn ticks(&self) -> TickHandle {
        self.ticks.clone()
    }

    /// Frames currently buffered.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn producer_stats(&self) -> Arc<WorkerStats> {
        self.producer.stats()
    }

    pub fn consumer_stats(&self) -> Arc<WorkerStats> {
        self.consumer.stats()
    }

    /// Whether both workers are still running.
    pub fn is_running(&self) -> bool {
        self.producer.is_running() && self.consumer.is_running()
    }

    /// Stop the producer, then the consumer. Idempotent.
    pub fn stop(&mut self) {
        self.producer.request_stop();
        self.consumer.request_stop();
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

fn build_queue(config: &PipelineConfig) -> Result<BoundedQueue<Frame>, DaqError> {
    let Some(wm) = config.watermark else {
        return BoundedQueue::new(config.queue_depth);
    };
    let (low, high) = (wm.low, wm.high);
    let watermark = Watermark::new(low, high)
        .on_high(move || warn!(high, "queue filling up: high watermark reached"))
        .on_low(move || info!(low, "queue drained to low watermark"));
    BoundedQueue::with_watermark(config.queue_depth, watermark)
}

// ── Tests ────────────────────────────────────────────────────────
