//! Tick clock and shutdown triggers for a run.
//!
//! [`drive`] calls `on_tick` at a fixed rate until either the run time is
//! over or the shutdown future resolves, whichever comes first.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{info, warn};

/// Why [`drive`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured run time elapsed.
    Deadline,
    /// The shutdown future resolved first.
    Signal,
}

/// Call `on_tick` `rate` times per second for at most `runtime`.
///
/// The first tick comes one period after the call. A tick falling on the
/// deadline itself is not delivered. Late ticks are skipped rather than
/// bunched up.
pub async fn drive<F, S>(mut on_tick: F, rate: u32, runtime: Duration, shutdown: S) -> StopReason
where
    F: FnMut(),
    S: Future<Output = ()>,
{
    let period = Duration::from_secs(1) / rate.max(1);
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let deadline = time::sleep(runtime);
    tokio::pin!(deadline, shutdown);

    loop {
        tokio::select! {
            biased;
            () = &mut deadline => {
                info!("runtime of {}s elapsed", runtime.as_secs());
                return StopReason::Deadline;
            }
            () = &mut shutdown => return StopReason::Signal,
            _ = interval.tick() => on_tick(),
        }
    }
}

/// Resolves on Ctrl-C, or on SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Ctrl-C received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
}

// ── Tests ────────────────────────────────────────────────────────
