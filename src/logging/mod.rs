//! Trace log streams consumed by the verification harness.
//!
//! # Responsibilities
//! - Append marker-tagged, comma-delimited lines to a log file
//! - Keep the trace id as the second comma field of every line
//! - Flush on every write so the harness reads a durable artifact
//!
//! # Design Decisions
//! - Flush-on-write rather than buffered: the harness reads the file right
//!   after the chain completes, so lines must already be on disk
//! - Unsampled contexts are not recorded
//! - Write failures are logged and swallowed; the harness reports the
//!   missing lines as a verification failure

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::trace::TraceContext;

/// Handle to one append-only trace log stream. Cheap to clone; clones
/// share the underlying file and serialize writes through a mutex.
#[derive(Debug, Clone)]
pub struct TraceLog {
    marker: String,
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl TraceLog {
    /// Create (truncating) the log file, making parent directories as needed.
    pub fn create(path: impl Into<PathBuf>, marker: &str) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            marker: marker.to_string(),
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Append one marker line for the given context.
    ///
    /// Line shape: `<unix ts>,<trace_id>,<span_id>,<marker> <message>`.
    /// The trace id sits in the second comma field, which is the contract
    /// the verification harness parses against.
    pub fn record(&self, ctx: &TraceContext, message: &str) {
        if !ctx.sampled {
            return;
        }
        let line = format!(
            "{},{},{},{} {}\n",
            unix_timestamp(),
            ctx.trace_id,
            ctx.span_id,
            self.marker,
            message
        );

        let mut file = match self.file.lock() {
            Ok(f) => f,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
            tracing::error!(path = %self.path.display(), error = %e, "Trace log write failed");
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

fn unix_timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => format!("{}.{:03}", d.as_secs(), d.subsec_millis()),
        Err(_) => "0.000".to_string(),
    }
}
