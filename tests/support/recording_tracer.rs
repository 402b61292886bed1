//! Tracer double that records span lifecycles.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use outboxed::{SpanId, Tracer};

#[derive(Clone, Debug)]
pub struct RecordedSpan {
    pub label: String,
    pub command_id: String,
    pub trace_id: String,
    pub parent: Option<SpanId>,
}

/// Records every span opened and closed, for asserting that each delivery
/// attempt gets exactly one span and that it is always closed.
#[derive(Clone, Default)]
pub struct RecordingTracer {
    next: Arc<AtomicU64>,
    opened: Arc<Mutex<Vec<RecordedSpan>>>,
    closed: Arc<Mutex<Vec<SpanId>>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        RecordingTracer::default()
    }

    pub fn opened(&self) -> Vec<RecordedSpan> {
        self.opened.lock().unwrap().clone()
    }

    pub fn opened_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn closed_count(&self) -> usize {
        self.closed.lock().unwrap().len()
    }
}

impl Tracer for RecordingTracer {
    fn start_span(
        &self,
        label: &str,
        command_id: &str,
        trace_id: &str,
        parent: Option<SpanId>,
    ) -> SpanId {
        let span = SpanId(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        self.opened.lock().unwrap().push(RecordedSpan {
            label: label.to_string(),
            command_id: command_id.to_string(),
            trace_id: trace_id.to_string(),
            parent,
        });
        span
    }

    fn close_span(&self, span: SpanId) {
        self.closed.lock().unwrap().push(span);
    }
}
