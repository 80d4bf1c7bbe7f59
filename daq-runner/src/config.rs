//! Configuration for the acquisition runner.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use daq_core::{FrameKind, PipelineConfig, WatermarkConfig};

/// Shortest accepted run, in seconds.
pub const MIN_RUNTIME_SECS: u64 = 10;
/// Slowest accepted tick rate, in ticks per second.
pub const MIN_THROUGHPUT: u32 = 10;
/// Fastest accepted tick rate, in ticks per second.
pub const MAX_THROUGHPUT: u32 = 1000;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// What to acquire and how fast.
    pub acquisition: AcquisitionConfig,
    /// Queue fill-level notifications.
    pub queue: QueueConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Data processing domain: "video", "audio", "hw", "network".
    pub domain: FrameKind,
    /// Ticks per second (10..=1000).
    pub throughput: u32,
    /// Total run time in seconds (at least 10).
    pub runtime_secs: u64,
}

/// Queue settings. Capacity is fixed; only the watermarks are tunable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Occupancy at which a "drained" line is logged after a high mark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_watermark: Option<usize>,
    /// Occupancy at which a "filling up" warning is logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_watermark: Option<usize>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Errors ───────────────────────────────────────────────────────

/// A configuration value outside its documented range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("--throughput {0} is out of range ({min}..={max})", min = MIN_THROUGHPUT, max = MAX_THROUGHPUT)]
    Throughput(u32),

    #[error("--runtime {0} is out of range (at least {min} seconds)", min = MIN_RUNTIME_SECS)]
    Runtime(u64),

    #[error("--domain generic has no dispatcher; use video, audio, hw or network")]
    Domain,

    #[error("low_watermark and high_watermark must be set together")]
    Watermark,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            domain: FrameKind::Video,
            throughput: MIN_THROUGHPUT,
            runtime_secs: MIN_RUNTIME_SECS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl RunnerConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// The default configuration as TOML text, for `--gen-config`.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }

    /// Check every value against its documented range.
    pub fn validate(&self) -> Result<(), ArgError> {
        let acq = &self.acquisition;
        if acq.domain == FrameKind::Generic {
            return Err(ArgError::Domain);
        }
        if !(MIN_THROUGHPUT..=MAX_THROUGHPUT).contains(&acq.throughput) {
            return Err(ArgError::Throughput(acq.throughput));
        }
        if acq.runtime_secs < MIN_RUNTIME_SECS {
            return Err(ArgError::Runtime(acq.runtime_secs));
        }
        if self.queue.low_watermark.is_some() != self.queue.high_watermark.is_some() {
            return Err(ArgError::Watermark);
        }
        Ok(())
    }

    /// Convert into the core pipeline shape. Queue depth and frame size
    /// stay at their built-in values.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let watermark = match (self.queue.low_watermark, self.queue.high_watermark) {
            (Some(low), Some(high)) => Some(WatermarkConfig { low, high }),
            _ => None,
        };
        PipelineConfig {
            kind: self.acquisition.domain,
            watermark,
            ..PipelineConfig::default()
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
