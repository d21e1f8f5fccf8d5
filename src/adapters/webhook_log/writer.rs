//! Single-writer task for the webhook log.
//!
//! Every mutation of the log directory (create, rotate, append) happens on
//! one task, fed through an unbounded channel. Producers never wait on the
//! filesystem, and rotation can never race an append.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::webhook::LogEntry;
use crate::ports::WebhookLogSink;

use super::appender::append_log;
use super::directory::ensure_log_directory;
use super::WebhookLogOptions;

/// Cloneable producer side of the log writer.
#[derive(Debug, Clone)]
pub struct WebhookLogHandle {
    tx: mpsc::UnboundedSender<LogEntry>,
}

impl WebhookLogSink for WebhookLogHandle {
    fn submit(&self, entry: LogEntry) {
        if let Err(mpsc::error::SendError(entry)) = self.tx.send(entry) {
            tracing::warn!(
                event_id = entry.id.as_deref().unwrap_or("-"),
                "Webhook log writer has stopped; entry dropped"
            );
        }
    }
}

/// Background task that owns the webhook log files.
pub struct WebhookLogWriter {
    options: WebhookLogOptions,
    rx: mpsc::UnboundedReceiver<LogEntry>,
}

impl WebhookLogWriter {
    /// Spawns the writer on the current tokio runtime.
    ///
    /// The task runs until every [`WebhookLogHandle`] has been dropped and
    /// the queue is drained, so awaiting the returned `JoinHandle` after
    /// dropping the handles flushes all submitted entries.
    pub fn spawn(options: WebhookLogOptions) -> (WebhookLogHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = Self { options, rx };
        let join = tokio::spawn(writer.run());
        (WebhookLogHandle { tx }, join)
    }

    async fn run(mut self) {
        if let Err(e) = ensure_log_directory(self.options.directory()).await {
            // Each append retries creation, so keep going.
            tracing::error!(error = %e, "Webhook log directory unavailable");
        }

        tracing::debug!(
            path = %self.options.active_path().display(),
            max_bytes = self.options.max_bytes(),
            "Webhook log writer started"
        );

        let mut written: u64 = 0;
        let mut failed: u64 = 0;
        while let Some(entry) = self.rx.recv().await {
            match append_log(&self.options, &entry).await {
                Ok(()) => written += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        event_id = entry.id.as_deref().unwrap_or("-"),
                        error = %e,
                        "Failed to append webhook log entry"
                    );
                }
            }
        }

        tracing::debug!(written, failed, "Webhook log writer stopped");
    }
}
