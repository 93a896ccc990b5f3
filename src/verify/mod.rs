//! Log-correlation verification harness.
//!
//! # Responsibilities
//! - Extract trace ids from marker-tagged lines in each log stream
//! - Assert exactly one distinct id exists across all streams and that it
//!   equals the id the chain's span ran under
//! - Bridge the flush/read race with a bounded poll before the first read
//!
//! # Design Decisions
//! - Chain completion does not guarantee log durability on its own, so
//!   readers poll for the marker with a timeout instead of reading blind
//! - Any extra distinct id, or zero marker lines, is a hard failure that
//!   reports the observed id set

use std::fs;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};

/// Errors surfaced by the verification harness.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// A log stream could not be read.
    #[error("failed to read log stream: {0}")]
    Io(#[from] std::io::Error),

    /// No marker-tagged lines were found in any stream.
    #[error("no marker lines found in any log stream")]
    Empty,

    /// The deduplicated id set was not exactly the expected id.
    #[error("expected single trace id {expected}, found {found:?}")]
    Mismatch { expected: String, found: Vec<String> },

    /// The marker never appeared within the poll window.
    #[error("timed out waiting for marker lines in {0}")]
    Timeout(String),
}

/// Extract trace ids from marker-tagged lines of one log stream.
///
/// A relevant line contains the marker and has the trace id as its second
/// comma field, trimmed. Marker lines without a second field are skipped.
pub fn trace_ids_in(content: &str, marker: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| line.contains(marker))
        .filter_map(|line| line.split(',').nth(1))
        .map(|id| id.trim().to_string())
        .collect()
}

/// Read one log stream and extract its marker-tagged trace ids.
pub fn read_trace_ids(path: &Path, marker: &str) -> Result<Vec<String>, VerifyError> {
    let content = fs::read_to_string(path)?;
    Ok(trace_ids_in(&content, marker))
}

/// Assert all streams agree on exactly one trace id, equal to `expected`.
pub fn verify_streams(expected: &str, paths: &[&Path], marker: &str) -> Result<(), VerifyError> {
    let mut combined = Vec::new();
    for path in paths {
        combined.extend(read_trace_ids(path, marker)?);
    }
    if combined.is_empty() {
        return Err(VerifyError::Empty);
    }

    let mut distinct: Vec<String> = Vec::new();
    for id in combined {
        if !distinct.contains(&id) {
            distinct.push(id);
        }
    }

    if distinct.len() != 1 || distinct[0] != expected {
        return Err(VerifyError::Mismatch {
            expected: expected.to_string(),
            found: distinct,
        });
    }

    tracing::debug!(trace_id = expected, "Log streams agree on one trace id");
    Ok(())
}

/// Poll until at least one marker line is readable, or time out.
pub async fn wait_for_marker(path: &Path, marker: &str, timeout: Duration) -> Result<(), VerifyError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(content) = fs::read_to_string(path) {
            if content.lines().any(|line| line.contains(marker)) {
                return Ok(());
            }
        }
        if Instant::now() >= deadline {
            return Err(VerifyError::Timeout(path.display().to_string()));
        }
        sleep(Duration::from_millis(25)).await;
    }
}
