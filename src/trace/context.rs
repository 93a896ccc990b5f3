//! Immutable trace context shared by all operations of one logical request.

use uuid::Uuid;

/// Identifiers for one unit of work within a distributed trace.
///
/// The trace id is shared by every operation descended from the root span;
/// the span id is unique per operation. Once created a context is never
/// mutated, only cloned into continuations or replaced by a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// 128-bit trace id, 32 lowercase hex characters.
    pub trace_id: String,

    /// 64-bit span id, 16 lowercase hex characters.
    pub span_id: String,

    /// Span id of the parent operation, if any.
    pub parent_id: Option<String>,

    /// Whether this trace is recorded by the log streams.
    pub sampled: bool,
}

impl TraceContext {
    /// Create a root context with fresh trace and span ids.
    pub fn new_root(sampled: bool) -> Self {
        Self {
            trace_id: Uuid::new_v4().simple().to_string(),
            span_id: new_span_id(),
            parent_id: None,
            sampled,
        }
    }

    /// Create a child context: same trace id, fresh span id, parent set.
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: new_span_id(),
            parent_id: Some(self.span_id.clone()),
            sampled: self.sampled,
        }
    }
}

/// Generate a 16-hex-character span id.
fn new_span_id() -> String {
    let full = Uuid::new_v4().simple().to_string();
    full[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_context_ids_are_distinct() {
        let ctx = TraceContext::new_root(true);
        assert_eq!(ctx.trace_id.len(), 32);
        assert_eq!(ctx.span_id.len(), 16);
        assert!(ctx.trace_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(ctx.parent_id.is_none());

        let other = TraceContext::new_root(true);
        assert_ne!(ctx.trace_id, other.trace_id);
    }

    #[test]
    fn test_child_keeps_trace_id() {
        let root = TraceContext::new_root(true);
        let child = root.child();

        assert_eq!(child.trace_id, root.trace_id);
        assert_ne!(child.span_id, root.span_id);
        assert_eq!(child.parent_id.as_deref(), Some(root.span_id.as_str()));
        assert!(child.sampled);
    }
}
