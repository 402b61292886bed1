//! Tracing seam: one span per delivery attempt.

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

/// Identifier of an open span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanId(pub u64);

/// Capability for span lifecycle around a delivery attempt.
///
/// The dispatcher opens a span before invoking the transporter, linked to
/// the command's trace identifier and the caller's current span, and closes
/// it once the attempt completes, on every exit path.
pub trait Tracer: Send + Sync {
    /// Open a span. Returns a handle to pass to [`close_span`](Self::close_span).
    fn start_span(
        &self,
        label: &str,
        command_id: &str,
        trace_id: &str,
        parent: Option<SpanId>,
    ) -> SpanId;

    /// Close a span opened by this tracer.
    fn close_span(&self, span: SpanId);

    /// The span the calling context is currently inside, if any.
    fn current_span(&self) -> Option<SpanId> {
        None
    }
}

/// A tracer that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn start_span(
        &self,
        _label: &str,
        _command_id: &str,
        _trace_id: &str,
        _parent: Option<SpanId>,
    ) -> SpanId {
        SpanId(0)
    }

    fn close_span(&self, _span: SpanId) {}
}

/// A tracer that logs span open/close at debug level.
#[derive(Debug, Default)]
pub struct LogTracer {
    next: AtomicU64,
}

impl LogTracer {
    pub fn new() -> Self {
        LogTracer::default()
    }
}

impl Tracer for LogTracer {
    fn start_span(
        &self,
        label: &str,
        command_id: &str,
        trace_id: &str,
        parent: Option<SpanId>,
    ) -> SpanId {
        let span = SpanId(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        debug!(
            "span {:?} opened: {} (command {}, trace {}, parent {:?})",
            span, label, command_id, trace_id, parent
        );
        span
    }

    fn close_span(&self, span: SpanId) {
        debug!("span {:?} closed", span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_tracer_ids_are_unique() {
        let tracer = LogTracer::new();
        let a = tracer.start_span("first", "cmd-1", "trace-1", None);
        let b = tracer.start_span("second", "cmd-2", "trace-1", Some(a));
        assert_ne!(a, b);
        tracer.close_span(b);
        tracer.close_span(a);
    }
}
