//! Queue-draining frame consumer.
//!
//! One [`consume`](Consumer::consume) call is one worker iteration:
//! dequeue, dispatch, send. An abort sentinel ends the iteration without
//! touching the dispatcher or the sink.

use std::sync::Arc;

use tracing::trace;

use crate::dispatch::Dispatch;
use crate::error::DaqError;
use crate::frame::Frame;
use crate::io::Sink;
use crate::queue::BoundedQueue;

pub struct Consumer<D, S> {
    queue: Arc<BoundedQueue<Frame>>,
    dispatch: D,
    sink: S,
}

impl<D: Dispatch, S: Sink> Consumer<D, S> {
    pub fn new(queue: Arc<BoundedQueue<Frame>>, dispatch: D, sink: S) -> Self {
        Self {
            queue,
            dispatch,
            sink,
        }
    }

    /// Run one iteration, blocking on the queue.
    pub fn consume(&mut self) -> Result<(), DaqError> {
        let Some(frame) = self.queue.dequeue() else {
            trace!("dequeue aborted");
            return Ok(());
        };
        let view = self.dispatch.dispatch(frame)?;
        self.sink.send(&view);
        Ok(())
    }

    /// The consumer's abort hook: release one blocked dequeue.
    pub fn aborter(&self) -> impl FnOnce() + Send + 'static {
        let queue = Arc::clone(&self.queue);
        move || queue.abort()
    }
}
