//! Trace propagation fixture library

pub mod chain;
pub mod client;
pub mod config;
pub mod logging;
pub mod server;
pub mod trace;
pub mod verify;

pub use chain::{CallChain, ChainOutcome};
pub use client::UserClient;
pub use config::ChainConfig;
pub use logging::TraceLog;
pub use server::StubServer;
pub use trace::{Sampler, TraceContext, Tracer};
