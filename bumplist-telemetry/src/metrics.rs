//! ## bumplist-telemetry::metrics
//! **Prometheus counters for allocator traffic**
//!
//! [`MetricsRecorder`] is a [`TraceSink`]: attach it to any allocator to
//! count operations and elements per operation kind.

use prometheus::{IntCounterVec, Opts, Registry};

use crate::events::{AllocEvent, AllocOp, TraceSink};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub operations: IntCounterVec,
    pub elements: IntCounterVec,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let operations = IntCounterVec::new(
            Opts::new(
                "bumplist_alloc_operations_total",
                "Allocator operations by kind",
            ),
            &["op"],
        )?;
        let elements = IntCounterVec::new(
            Opts::new(
                "bumplist_alloc_elements_total",
                "Elements covered by allocator operations, by kind",
            ),
            &["op"],
        )?;

        registry.register(Box::new(operations.clone()))?;
        registry.register(Box::new(elements.clone()))?;

        Ok(Self {
            registry,
            operations,
            elements,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Operations of the given kind counted so far.
    pub fn operation_count(&self, op: AllocOp) -> u64 {
        self.operations.with_label_values(&[op.as_str()]).get()
    }

    /// Elements covered by operations of the given kind so far.
    pub fn element_count(&self, op: AllocOp) -> u64 {
        self.elements.with_label_values(&[op.as_str()]).get()
    }

    /// Elements granted by `allocate` and not yet deallocated.
    pub fn live_elements(&self) -> u64 {
        self.element_count(AllocOp::Allocate)
            .saturating_sub(self.element_count(AllocOp::Refuse))
            .saturating_sub(self.element_count(AllocOp::Deallocate))
    }
}

impl TraceSink for MetricsRecorder {
    fn record(&self, event: &AllocEvent) {
        let label = [event.op.as_str()];
        self.operations.with_label_values(&label).inc();
        self.elements
            .with_label_values(&label)
            .inc_by(event.count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_operations_and_elements() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record(&AllocEvent::new(AllocOp::Allocate, "u32", 4));
        metrics.record(&AllocEvent::new(AllocOp::Allocate, "u32", 2));
        metrics.record(&AllocEvent::new(AllocOp::Deallocate, "u32", 4));

        assert_eq!(metrics.operation_count(AllocOp::Allocate), 2);
        assert_eq!(metrics.element_count(AllocOp::Allocate), 6);
        assert_eq!(metrics.live_elements(), 2);
    }

    #[test]
    fn refused_requests_are_not_live() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record(&AllocEvent::new(AllocOp::Allocate, "u8", 1));
        metrics.record(&AllocEvent::new(AllocOp::Allocate, "u8", 5));
        metrics.record(&AllocEvent::new(AllocOp::Refuse, "u8", 5));

        assert_eq!(metrics.operation_count(AllocOp::Allocate), 2);
        assert_eq!(metrics.live_elements(), 1);
    }

    #[test]
    fn clones_share_counters() {
        let metrics = MetricsRecorder::new().unwrap();
        let clone = metrics.clone();
        clone.record(&AllocEvent::new(AllocOp::Construct, "u8", 1));
        assert_eq!(metrics.operation_count(AllocOp::Construct), 1);
    }

    #[test]
    fn gather_renders_counter_names() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record(&AllocEvent::new(AllocOp::Destroy, "u8", 1));
        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("bumplist_alloc_operations_total"));
        assert!(text.contains("op=\"destroy\""));
    }
}
