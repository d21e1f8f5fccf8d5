//! Webhook Log Adapters
//!
//! Durable, append-only record of accepted webhook events: one JSON object
//! per line in an active file, rotated into timestamped gzip archives once
//! it reaches a size threshold.
//!
//! ## Components
//!
//! - **directory** - Creates the log directory on demand
//! - **rotation** - Size-based rotation with gzip compression
//! - **appender** - Ensure, rotate, then append one line
//! - **writer** - Single task that owns every log file mutation
//!
//! ## Usage
//!
//! ```ignore
//! let (handle, writer) = WebhookLogWriter::spawn(WebhookLogOptions::new("logs"));
//! handle.submit(entry); // returns immediately
//!
//! drop(handle);
//! writer.await?; // drains queued entries
//! ```

mod appender;
mod directory;
mod rotation;
mod writer;

pub use appender::append_log;
pub use directory::ensure_log_directory;
pub use rotation::{rotate_if_needed, timestamp_label, RotationOutcome};
pub use writer::{WebhookLogHandle, WebhookLogWriter};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default active log file name.
pub const DEFAULT_FILE_NAME: &str = "webhooks.log";

/// Default rotation threshold (5 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Failures inside the log pipeline.
///
/// These are logged where they happen and never reach the HTTP response.
#[derive(Debug, Error)]
pub enum LogPipelineError {
    #[error("failed to create log directory {}: {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to rotate {}: {source}", .path.display())]
    Rotation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to append to {}: {source}", .path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize log entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where the webhook log lives and when it rotates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookLogOptions {
    directory: PathBuf,
    file_name: String,
    max_bytes: u64,
}

impl WebhookLogOptions {
    /// Options for `directory` with the default file name and threshold.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Path of the active, uncompressed log file.
    pub fn active_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_layout() {
        let options = WebhookLogOptions::new("logs");
        assert_eq!(options.active_path(), PathBuf::from("logs/webhooks.log"));
        assert_eq!(options.max_bytes(), 5_242_880);
    }

    #[test]
    fn builder_overrides() {
        let options = WebhookLogOptions::new("/var/log/relay")
            .with_file_name("events.log")
            .with_max_bytes(1024);
        assert_eq!(options.active_path(), PathBuf::from("/var/log/relay/events.log"));
        assert_eq!(options.max_bytes(), 1024);
    }

    #[test]
    fn errors_display_path() {
        let err = LogPipelineError::Append {
            path: PathBuf::from("logs/webhooks.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to append to logs/webhooks.log: denied");
    }
}
