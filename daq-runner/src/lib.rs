//! # daq-runner — fixed-rate acquisition runner
//!
//! Drives a `daq-core` pipeline from the command line: the tokio clock
//! ticks the producer at the configured throughput, the consumer forwards
//! every frame to a simulated device, and the run ends on a deadline or a
//! termination signal.
//!
//! ## Modules
//!
//! - **config**: TOML configuration and range checks (`ArgError`)
//! - **clock**: tick pacing, runtime deadline, Ctrl-C / SIGTERM
//! - **io**: simulated acquisition source and sink with call statistics

pub mod clock;
pub mod config;
pub mod io;
