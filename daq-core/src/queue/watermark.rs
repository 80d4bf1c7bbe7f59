//! Edge-triggered fill-level notification for [`BoundedQueue`](super::BoundedQueue).

use std::fmt;

use crate::error::DaqError;

type Hook = Box<dyn FnMut() + Send>;

/// A `(low, high)` occupancy boundary pair with optional hooks.
///
/// ```text
///          len >= high                 len_before <= low
///  lowered ────────────► raised ──────────────────────────► lowered
///          (on_high)                    (on_low)
/// ```
///
/// Both transitions are evaluated on a successful enqueue: `high` is
/// compared with the occupancy after the push, `low` with the occupancy
/// before it. Hooks run inside the queue's critical section and must not
/// call back into the queue.
pub struct Watermark {
    low: usize,
    high: usize,
    raised: bool,
    on_low: Option<Hook>,
    on_high: Option<Hook>,
}

impl Watermark {
    /// Boundaries without hooks. Attach them with [`on_low`](Self::on_low)
    /// and [`on_high`](Self::on_high).
    pub fn new(low: usize, high: usize) -> Self {
        Self {
            low,
            high,
            raised: false,
            on_low: None,
            on_high: None,
        }
    }

    /// Called once each time the queue drains back to `low` after being raised.
    pub fn on_low<F>(mut self, hook: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_low = Some(Box::new(hook));
        self
    }

    /// Called once each time the queue fills up to `high`.
    pub fn on_high<F>(mut self, hook: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_high = Some(Box::new(hook));
        self
    }

    pub fn is_raised(&self) -> bool {
        self.raised
    }

    /// Check `low < high <= depth`.
    pub(crate) fn validate(&self, depth: usize) -> Result<(), DaqError> {
        if self.low >= self.high {
            return Err(DaqError::Config(format!(
                "low watermark {} must be below high watermark {}",
                self.low, self.high
            )));
        }
        if self.high > depth {
            return Err(DaqError::Config(format!(
                "high watermark {} exceeds queue depth {depth}",
                self.high
            )));
        }
        Ok(())
    }

    /// Feed the occupancy right after a push.
    ///
    /// The low transition is checked first, so a single push can clear
    /// the mark and raise it again.
    pub(crate) fn observe(&mut self, len: usize) {
        if self.raised && len.saturating_sub(1) <= self.low {
            self.raised = false;
            if let Some(hook) = self.on_low.as_mut() {
                hook();
            }
        }
        if !self.raised && len >= self.high {
            self.raised = true;
            if let Some(hook) = self.on_high.as_mut() {
                hook();
            }
        }
    }
}

impl fmt::Debug for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watermark")
            .field("low", &self.low)
            .field("high", &self.high)
            .field("raised", &self.raised)
            .field("on_low", &self.on_low.is_some())
            .field("on_high", &self.on_high.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn validate_boundaries() {
        assert!(Watermark::new(0, 1).validate(3).is_ok());
        assert!(Watermark::new(2, 3).validate(3).is_ok());
        assert!(matches!(
            Watermark::new(0, 4).validate(3),
            Err(DaqError::Config(_))
        ));
        assert!(matches!(
            Watermark::new(1, 0).validate(3),
            Err(DaqError::Config(_))
        ));
        assert!(Watermark::new(1, 1).validate(3).is_err());
    }

    #[test]
    fn high_fires_once_per_crossing() {
        let highs = Arc::new(AtomicUsize::new(0));
        let mut wm = Watermark::new(1, 3).on_high({
            let highs = Arc::clone(&highs);
            move || {
                highs.fetch_add(1, Ordering::SeqCst);
            }
        });

        wm.observe(2);
        assert_eq!(highs.load(Ordering::SeqCst), 0);
        wm.observe(3);
        wm.observe(3);
        assert_eq!(highs.load(Ordering::SeqCst), 1);
        assert!(wm.is_raised());
    }

    #[test]
    fn low_requires_prior_raise() {
        let lows = Arc::new(AtomicUsize::new(0));
        let mut wm = Watermark::new(1, 3).on_low({
            let lows = Arc::clone(&lows);
            move || {
                lows.fetch_add(1, Ordering::SeqCst);
            }
        });

        wm.observe(1);
        wm.observe(2);
        assert_eq!(lows.load(Ordering::SeqCst), 0);

        wm.observe(3);
        wm.observe(2);
        assert_eq!(lows.load(Ordering::SeqCst), 1);
        assert!(!wm.is_raised());
    }

    #[test]
    fn one_push_can_clear_and_raise() {
        let lows = Arc::new(AtomicUsize::new(0));
        let highs = Arc::new(AtomicUsize::new(0));
        let mut wm = Watermark::new(2, 3)
            .on_low({
                let lows = Arc::clone(&lows);
                move || {
                    lows.fetch_add(1, Ordering::SeqCst);
                }
            })
            .on_high({
                let highs = Arc::clone(&highs);
                move || {
                    highs.fetch_add(1, Ordering::SeqCst);
                }
            });

        wm.observe(3);
        // 2 before the push, 3 after it.
        wm.observe(3);

        assert_eq!(lows.load(Ordering::SeqCst), 1);
        assert_eq!(highs.load(Ordering::SeqCst), 2);
        assert!(wm.is_raised());
    }

    #[test]
    fn transitions_happen_without_hooks() {
        let mut wm = Watermark::new(0, 2);
        wm.observe(2);
        assert!(wm.is_raised());
        wm.observe(1);
        assert!(!wm.is_raised());
    }
}
