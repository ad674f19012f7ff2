//! Structured logging for the engagement engine
//!
//! Everything is emitted through `tracing` to stderr so that report output on
//! stdout stays clean. Production runs log JSON lines; every other
//! environment gets the human-readable pretty format.

use std::time::{Duration, Instant};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::error::{Error, Result};

/// Target under which metric-shaped events are logged
pub const METRICS_TARGET: &str = "engagement_engine::metrics";

/// Output format of the log stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn for_environment(environment: &str) -> Self {
        if environment == "production" {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }

    fn layer(self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE);
        match self {
            LogFormat::Json => base.json().with_current_span(true).boxed(),
            LogFormat::Pretty => base.pretty().boxed(),
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `log_level` when set. Fails if a subscriber is
/// already installed.
pub fn init_tracing(log_level: &str, environment: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("engagement_engine={}", log_level)));
    let format = LogFormat::for_environment(environment);

    Registry::default()
        .with(format.layer())
        .with(filter)
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::info!(environment, log_level, ?format, "Tracing ready");
    Ok(())
}

/// Span covering one drain of the ingestion queue
///
/// `queued`, `processed` and `skipped` are recorded as the drain progresses.
#[macro_export]
macro_rules! pipeline_span {
    ($batch_id:expr) => {
        tracing::info_span!(
            "process_queue",
            batch_id = %$batch_id,
            queued = tracing::field::Empty,
            processed = tracing::field::Empty,
            skipped = tracing::field::Empty,
        )
    };
}

/// Log a crate [`Error`](crate::error::Error) together with its category
#[macro_export]
macro_rules! log_error {
    ($error:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::error!(
            error = %$error,
            category = $error.error_type(),
            recoverable = $error.is_recoverable(),
            $($key = tracing::field::display(&$value),)*
            $msg
        )
    };
}

/// Metric-shaped log events
///
/// There is no metrics backend; counters and gauges land in the log stream
/// under [`METRICS_TARGET`] so they can be filtered or scraped from there.
pub struct LogMetrics;

impl LogMetrics {
    pub fn counter(name: &str, value: u64, labels: &[(&str, &str)]) {
        tracing::info!(target: METRICS_TARGET, kind = "counter", name, value, labels = ?labels);
    }

    pub fn gauge(name: &str, value: f64, labels: &[(&str, &str)]) {
        tracing::info!(target: METRICS_TARGET, kind = "gauge", name, value, labels = ?labels);
    }
}

/// Wall-clock timer for a named operation, logged at debug on `stop`
#[derive(Debug)]
pub struct Timer {
    operation: &'static str,
    started: Instant,
}

impl Timer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!(
            operation = self.operation,
            elapsed_us = elapsed.as_micros() as u64,
            "Timed operation finished"
        );
        elapsed
    }
}
