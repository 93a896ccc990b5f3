//! Trace context creation and propagation.
//!
//! # Data Flow
//! ```text
//! Tracer::start_span
//!     → Span (owns TraceContext, finish-on-drop)
//!     → context cloned into each chain step
//!     → propagation::inject (B3 headers on outbound request)
//!     → propagation::extract (serving side reads headers back)
//! ```
//!
//! # Design Decisions
//! - Context travels by value through async continuations, never via
//!   thread-local storage; a continuation resumed on another worker
//!   observes the same trace id
//! - Sampling is a fixed policy decided at span start (always-on default)
//! - Span finish is idempotent and guaranteed on every exit path via Drop

pub mod context;
pub mod propagation;
pub mod tracer;

pub use context::TraceContext;
pub use tracer::{Sampler, Span, Tracer};
