//! Appends one log entry to the active webhook log.

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::domain::webhook::LogEntry;

use super::directory::ensure_log_directory;
use super::rotation::rotate_if_needed;
use super::{LogPipelineError, WebhookLogOptions};

/// Ensures the directory, rotates if needed, then appends `entry` as a
/// single newline-terminated JSON line.
///
/// Each call appends at most one line; on error nothing is appended.
pub async fn append_log(
    options: &WebhookLogOptions,
    entry: &LogEntry,
) -> Result<(), LogPipelineError> {
    ensure_log_directory(options.directory()).await?;

    let path = options.active_path();
    rotate_if_needed(&path, options.max_bytes()).await?;

    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let append_error = |source| LogPipelineError::Append {
        path: path.clone(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .map_err(append_error)?;
    file.write_all(line.as_bytes()).await.map_err(append_error)?;
    file.flush().await.map_err(append_error)?;

    Ok(())
}
