//! Log directory creation.

use std::path::Path;

use tokio::fs;

use super::LogPipelineError;

/// Creates `dir` and any missing parents. A no-op when it already exists.
pub async fn ensure_log_directory(dir: &Path) -> Result<(), LogPipelineError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| LogPipelineError::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        })
}
