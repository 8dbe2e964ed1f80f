//! # Bumplist Telemetry
//!
//! Crate for allocation tracing, logging, and metrics.
//!
//! Allocators never write to an output directly. They report every
//! operation as an [`AllocEvent`] to an injected [`TraceSink`]; where that
//! event ends up (a log line, a counter, a test buffer) is decided by the
//! sink the caller picked.

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{AllocEvent, AllocOp, NullSink, RecordingSink, TraceSink};
pub use logging::{EventLogger, TracingSink};
pub use metrics::MetricsRecorder;
