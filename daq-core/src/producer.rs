//! Tick-driven frame producer.
//!
//! One [`produce`](Producer::produce) call is one worker iteration: wait
//! for a tick, acquire a frame, enqueue it. A full queue is reported as
//! [`DaqError::Overload`] and the frame is dropped; the next tick starts
//! fresh.

use std::sync::Arc;

use tracing::trace;

use crate::error::DaqError;
use crate::frame::{FRAME_SIZE, Frame, FrameKind};
use crate::io::Acquire;
use crate::queue::BoundedQueue;
use crate::ticker::{Tick, TickHandle};

pub struct Producer<A> {
    queue: Arc<BoundedQueue<Frame>>,
    acquire: A,
    kind: FrameKind,
    frame_size: usize,
    ticks: TickHandle,
}

impl<A: Acquire> Producer<A> {
    /// Producer of full-size (`FRAME_SIZE`) frames tagged `kind`.
    pub fn new(queue: Arc<BoundedQueue<Frame>>, acquire: A, kind: FrameKind) -> Self {
        Self {
            queue,
            acquire,
            kind,
            frame_size: FRAME_SIZE,
            ticks: TickHandle::new(),
        }
    }

    /// Override the payload size. Producer and consumer must agree on it.
    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Handle for the external clock. [`TickHandle::abort`] is the
    /// producer's abort hook.
    pub fn ticks(&self) -> TickHandle {
        self.ticks.clone()
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Run one iteration. Returns without producing if the tick wait was
    /// aborted.
    pub fn produce(&mut self) -> Result<(), DaqError> {
        if self.ticks.wait() == Tick::Aborted {
            trace!("tick wait aborted");
            return Ok(());
        }

        let mut frame = Frame::zeroed(self.kind, self.frame_size);
        self.acquire.acquire(frame.payload_mut());

        self.queue.enqueue(frame).map_err(|_| DaqError::Overload {
            depth: self.queue.depth(),
        })
    }
}
