//! Counting semaphore used for queue slot accounting.

use parking_lot::{Condvar, Mutex};

/// A counter that can be claimed without blocking or waited on.
///
/// `release` wakes at most one blocked [`acquire`](Self::acquire).
#[derive(Debug)]
pub(crate) struct Slots {
    count: Mutex<usize>,
    ready: Condvar,
}

impl Slots {
    pub(crate) fn new(initial: usize) -> Self {
        Self {
            count: Mutex::new(initial),
            ready: Condvar::new(),
        }
    }

    /// Claim one slot if any is free. Never blocks.
    pub(crate) fn try_acquire(&self) -> bool {
        let mut count = self.count.lock();
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Claim one slot, parking the calling thread until one is released.
    pub(crate) fn acquire(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.ready.wait(&mut count);
        }
        *count -= 1;
    }

    pub(crate) fn release(&self) {
        *self.count.lock() += 1;
        self.ready.notify_one();
    }

    pub(crate) fn get(&self) -> usize {
        *self.count.lock()
    }
}
