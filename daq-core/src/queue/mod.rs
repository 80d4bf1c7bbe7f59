//! Fixed-capacity FIFO shared between the producer and consumer threads.
//!
//! ```text
//!  enqueue ──try_acquire(available)──► [ fifo + watermark ] ──release(occupied)──►
//!  dequeue ◄──release(available)────── [   (one mutex)    ] ◄──acquire(occupied)──
//! ```
//!
//! `enqueue` only ever *tries* to claim a slot and fails fast when the
//! queue is full. `dequeue` parks until a slot is occupied or an abort
//! releases it. The two counters are independent: slot claims by the
//! producer never wait on the consumer's slot wait.

mod slots;
mod watermark;

use std::collections::VecDeque;
use std::fmt;
use parking_lot::Mutex;

use crate::error::DaqError;

use self::slots::Slots;
pub use self::watermark::Watermark;

/// Default capacity of the pipeline queue.
pub const QUEUE_DEPTH: usize = 10;

// ── Full ─────────────────────────────────────────────────────────

/// Returned by [`BoundedQueue::enqueue`] when no slot is free.
///
/// Carries the rejected item back to the caller.
#[derive(PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Full(..)")
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("queue is full")
    }
}

impl<T> std::error::Error for Full<T> {}

// ── BoundedQueue ─────────────────────────────────────────────────

struct Inner<T> {
    fifo: VecDeque<T>,
    watermark: Option<Watermark>,
}

/// Thread-safe FIFO holding at most `depth` owned items.
pub struct BoundedQueue<T> {
    depth: usize,
    available: Slots,
    occupied: Slots,
    inner: Mutex<Inner<T>>,
}

impl<T> BoundedQueue<T> {
    /// Create a queue with `depth` slots and no watermark.
    pub fn new(depth: usize) -> Result<Self, DaqError> {
        if depth == 0 {
            return Err(DaqError::Config("queue depth must be at least 1".into()));
        }
        Ok(Self {
            depth,
            available: Slots::new(depth),
            occupied: Slots::new(0),
            inner: Mutex::new(Inner {
                fifo: VecDeque::with_capacity(depth),
                watermark: None,
            }),
        })
    }

    /// Create a queue observed by `watermark`.
    ///
    /// Fails with [`DaqError::Config`] unless `low < high <= depth`.
    pub fn with_watermark(depth: usize, watermark: Watermark) -> Result<Self, DaqError> {
        let queue = Self::new(depth)?;
        watermark.validate(depth)?;
        queue.inner.lock().watermark = Some(watermark);
        Ok(queue)
    }

    /// Append `item` without blocking.
    ///
    /// Returns the item inside [`Full`] if every slot is taken. On success
    /// the watermark is updated and one waiting `dequeue` is woken.
    pub fn enqueue(&self, item: T) -> Result<(), Full<T>> {
        if !self.available.try_acquire() {
            return Err(Full(item));
        }
        {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            inner.fifo.push_back(item);
            let len = inner.fifo.len();
            if let Some(watermark) = inner.watermark.as_mut() {
                watermark.observe(len);
            }
        }
        self.occupied.release();
        Ok(())
    }

    /// Remove the head item, blocking until one arrives.
    ///
    /// Returns `None` when the call was released by [`abort`](Self::abort)
    /// with nothing buffered.
    pub fn dequeue(&self) -> Option<T> {
        self.occupied.acquire();
        let item = self.inner.lock().fifo.pop_front();
        if item.is_some() {
            self.available.release();
        }
        item
    }

    /// Release one blocked (or the next) `dequeue` without an item.
    ///
    /// Each call releases exactly one dequeue; calling it more often than
    /// there are dequeuers leaves the surplus pending.
    pub fn abort(&self) {
        self.occupied.release();
    }

    /// Capacity fixed at construction.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of buffered items.
    pub fn len(&self) -> usize {
        self.inner.lock().fifo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the high watermark has been reached and not yet cleared.
    pub fn is_raised(&self) -> bool {
        self.inner.lock()
            .watermark
            .as_ref()
            .is_some_and(Watermark::is_raised)
    }

    /// Slots an `enqueue` could still claim right now.
    pub fn free_slots(&self) -> usize {
        self.available.get()
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("depth", &self.depth)
            .field("len", &self.len())
            .field("raised", &self.is_raised())
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────
