//! ## bumplist-telemetry::events
//! **Allocation events and the sink interface**
//!
//! One [`AllocEvent`] is produced per allocator operation. Sinks receive
//! events by shared reference and must not influence control flow.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The allocator operation an event describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AllocOp {
    Allocate,
    Deallocate,
    Construct,
    Destroy,
    /// An `allocate` that failed; follows the `Allocate` event it refuses.
    Refuse,
}

impl AllocOp {
    /// Stable lowercase name, used as a log field and metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocOp::Allocate => "allocate",
            AllocOp::Deallocate => "deallocate",
            AllocOp::Construct => "construct",
            AllocOp::Destroy => "destroy",
            AllocOp::Refuse => "refuse",
        }
    }
}

impl fmt::Display for AllocOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single traced allocator operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocEvent {
    /// Which operation ran.
    pub op: AllocOp,
    /// Element type the allocator is parameterized over.
    pub type_name: &'static str,
    /// Element count (`n` for allocate/deallocate/refuse, 1 for
    /// construct/destroy).
    pub count: usize,
}

impl AllocEvent {
    pub fn new(op: AllocOp, type_name: &'static str, count: usize) -> Self {
        Self {
            op,
            type_name,
            count,
        }
    }
}

impl fmt::Display for AllocEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>[n = {}]", self.op, self.type_name, self.count)
    }
}

/// Destination for allocation events.
///
/// Sinks are cloned whenever an allocator is rebound to another element
/// type, so clones should report into the same place.
pub trait TraceSink: Clone {
    fn record(&self, event: &AllocEvent);
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    #[inline]
    fn record(&self, _event: &AllocEvent) {}
}

/// An absent sink records nothing.
impl<S: TraceSink> TraceSink for Option<S> {
    #[inline]
    fn record(&self, event: &AllocEvent) {
        if let Some(sink) = self {
            sink.record(event);
        }
    }
}

/// Fans each event out to both sinks, left first.
impl<A: TraceSink, B: TraceSink> TraceSink for (A, B) {
    #[inline]
    fn record(&self, event: &AllocEvent) {
        self.0.record(event);
        self.1.record(event);
    }
}

/// Sink that keeps every event in memory.
///
/// Clones share the same buffer, so a list and all of its rebound
/// allocators record into one ordered log.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<AllocEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far.
    pub fn events(&self) -> Vec<AllocEvent> {
        self.events.borrow().clone()
    }

    /// Recorded operations, without type names or counts.
    pub fn ops(&self) -> Vec<AllocOp> {
        self.events.borrow().iter().map(|e| e.op).collect()
    }

    /// Number of recorded events of the given kind.
    pub fn count(&self, op: AllocOp) -> usize {
        self.events.borrow().iter().filter(|e| e.op == op).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl TraceSink for RecordingSink {
    fn record(&self, event: &AllocEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
