//! daq-runner — entry point.
//!
//! ```text
//! daq-runner                      Run with daq-runner.toml (or defaults)
//! daq-runner --config <path>      Load a custom config TOML
//! daq-runner -d audio -t 100 -r 30
//! daq-runner --gen-config         Write default config to stdout
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use daq_core::{FrameKind, KindDispatcher, Pipeline};
use daq_runner::clock::{self, StopReason};
use daq_runner::config::RunnerConfig;
use daq_runner::io::SimulatedHardware;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "daq-runner", about = "Fixed-rate data acquisition pipeline")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "daq-runner.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Data processing domain: video, audio, hw, network.
    #[arg(short, long)]
    domain: Option<FrameKind>,

    /// Data processing rate, between 10 and 1000 times per second.
    #[arg(short, long)]
    throughput: Option<u32>,

    /// Program runtime in seconds, at least 10.
    #[arg(short, long)]
    runtime: Option<u64>,
}

impl Cli {
    /// Command-line values win over the file.
    fn apply(&self, config: &mut RunnerConfig) {
        if let Some(domain) = self.domain {
            config.acquisition.domain = domain;
        }
        if let Some(throughput) = self.throughput {
            config.acquisition.throughput = throughput;
        }
        if let Some(runtime) = self.runtime {
            config.acquisition.runtime_secs = runtime;
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        println!("{}", RunnerConfig::default_toml()?);
        return Ok(());
    }

    // Load config, then let the command line override it.
    let mut config = RunnerConfig::load(&cli.config);
    cli.apply(&mut config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate()?;
    let acq = &config.acquisition;

    info!("daq-runner v{}", env!("CARGO_PKG_VERSION"));
    info!("[args] Data processing domain was set to {}", acq.domain);
    info!("[args] Data processing rate was set to {} times per second", acq.throughput);
    info!("[args] Program runtime was set to {} seconds", acq.runtime_secs);

    let hardware = SimulatedHardware::new();
    let mut pipeline = Pipeline::start(
        config.to_pipeline_config(),
        hardware.source(),
        KindDispatcher::new(),
        hardware.sink(),
    )?;

    let ticks = pipeline.ticks();
    let reason = clock::drive(
        move || ticks.tick(),
        acq.throughput,
        Duration::from_secs(acq.runtime_secs),
        clock::shutdown_signal(),
    )
    .await;

    if reason == StopReason::Signal {
        info!("stopped before the configured runtime");
    }

    // Joining the worker threads blocks.
    tokio::task::block_in_place(|| pipeline.stop());

    let producer = pipeline.producer_stats();
    let consumer = pipeline.consumer_stats();
    info!(
        producer_iterations = producer.iterations(),
        overloads = producer.failures(),
        consumer_iterations = consumer.iterations(),
        consumer_errors = consumer.failures(),
        "pipeline stopped"
    );

    println!("{}", hardware.statistics());
    Ok(())
}
