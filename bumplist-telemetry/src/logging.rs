//! ## bumplist-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! Installs the process-wide `tracing` subscriber and provides
//! [`TracingSink`], which turns allocation events into log records.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::events::{AllocEvent, TraceSink};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global fmt subscriber.
    ///
    /// `RUST_LOG` wins when set; otherwise `default_filter` applies.
    pub fn init(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(env) => env,
            Err(_) => EnvFilter::try_new(default_filter)?,
        };
        fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::ENTER)
            .try_init()
    }
}

/// Sink that logs every allocation event at `info` level.
///
/// This is the logging allocator's default output: one record per
/// operation carrying the operation name, element type, and count.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    #[inline]
    fn record(&self, event: &AllocEvent) {
        tracing::info!(
            op = event.op.as_str(),
            type_name = event.type_name,
            count = event.count,
            "{event}"
        );
    }
}
