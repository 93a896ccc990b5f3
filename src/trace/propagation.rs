//! B3 header injection and extraction.
//!
//! The chain injects the active context into every outbound request; the
//! serving side extracts it so its log lines carry the caller's trace id.

use axum::http::{HeaderMap, HeaderValue};

use crate::trace::context::TraceContext;

pub const TRACE_ID_HEADER: &str = "x-b3-traceid";
pub const SPAN_ID_HEADER: &str = "x-b3-spanid";
pub const SAMPLED_HEADER: &str = "x-b3-sampled";

/// Write the context into outbound request headers.
pub fn inject(ctx: &TraceContext, headers: &mut HeaderMap) {
    if let Ok(v) = HeaderValue::from_str(&ctx.trace_id) {
        headers.insert(TRACE_ID_HEADER, v);
    }
    if let Ok(v) = HeaderValue::from_str(&ctx.span_id) {
        headers.insert(SPAN_ID_HEADER, v);
    }
    let sampled = if ctx.sampled { "1" } else { "0" };
    headers.insert(SAMPLED_HEADER, HeaderValue::from_static(sampled));
}

/// Read a context back out of request headers.
///
/// Returns `None` when the trace or span id header is absent, empty, or
/// not hex; an unparseable context is treated as no context at all.
pub fn extract(headers: &HeaderMap) -> Option<TraceContext> {
    let trace_id = hex_header(headers, TRACE_ID_HEADER)?;
    let span_id = hex_header(headers, SPAN_ID_HEADER)?;
    let sampled = headers
        .get(SAMPLED_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "1")
        .unwrap_or(true);

    Some(TraceContext {
        trace_id,
        span_id,
        parent_id: None,
        sampled,
    })
}

fn hex_header(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(value.to_lowercase())
}
