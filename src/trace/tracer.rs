//! Tracer and scoped spans.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::trace::context::TraceContext;

/// Sampling policy applied when a span is started.
///
/// The fixture runs with `Always` so every chain invocation is recorded;
/// `Never` exists so tests can assert unsampled spans stay out of the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sampler {
    #[default]
    Always,
    Never,
}

impl Sampler {
    fn decide(&self) -> bool {
        matches!(self, Sampler::Always)
    }
}

/// Creates spans. Cheap to clone; clones share the finish counter.
#[derive(Debug, Clone)]
pub struct Tracer {
    sampler: Sampler,
    finished: Arc<AtomicU64>,
}

impl Tracer {
    pub fn new(sampler: Sampler) -> Self {
        Self {
            sampler,
            finished: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start a new root span. The span finishes exactly once: explicitly
    /// via [`Span::finish`] or on drop, whichever comes first.
    pub fn start_span(&self, name: &str) -> Span {
        let context = TraceContext::new_root(self.sampler.decide());
        tracing::debug!(
            span_name = name,
            trace_id = %context.trace_id,
            span_id = %context.span_id,
            sampled = context.sampled,
            "Span started"
        );
        Span {
            name: name.to_string(),
            context,
            started: Instant::now(),
            finished: false,
            finish_counter: self.finished.clone(),
        }
    }

    /// Number of spans finished so far across all clones of this tracer.
    pub fn finished_count(&self) -> u64 {
        self.finished.load(Ordering::SeqCst)
    }
}

/// One named, timed unit of work. Release discipline: finishing is
/// guaranteed on every exit path because Drop finishes an open span.
#[derive(Debug)]
pub struct Span {
    name: String,
    context: TraceContext,
    started: Instant,
    finished: bool,
    finish_counter: Arc<AtomicU64>,
}

impl Span {
    pub fn context(&self) -> &TraceContext {
        &self.context
    }

    pub fn trace_id(&self) -> &str {
        &self.context.trace_id
    }

    /// Mark the span finished. Idempotent; later calls and Drop are no-ops.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.finish_counter.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            span_name = %self.name,
            trace_id = %self.context.trace_id,
            span_id = %self.context.span_id,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Span finished"
        );
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        self.finish();
    }
}
