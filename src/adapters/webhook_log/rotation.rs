//! Size-based log rotation.
//!
//! Rotation renames the active file to `<stem>-<timestamp>.<ext>`, streams
//! it through gzip into `<renamed>.gz`, then deletes the renamed copy. The
//! three steps are not transactional: if compression fails the renamed file
//! is left in place and the partial archive is not cleaned up.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::fs;

use super::LogPipelineError;

/// What `rotate_if_needed` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// No active file yet.
    Missing,
    /// Active file is smaller than the threshold.
    BelowThreshold { size: u64 },
    /// Active file was archived to `archive`.
    Rotated { archive: PathBuf },
}

/// Filesystem-safe ISO-8601 label, e.g. `2026-10-16T09-30-12-345Z`.
pub fn timestamp_label(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Archives `path` if it is at least `threshold` bytes.
///
/// # Errors
///
/// Returns `LogPipelineError::Rotation` if the file cannot be inspected,
/// renamed, or compressed. Failing to delete the uncompressed copy after a
/// successful compression is logged, not returned.
pub async fn rotate_if_needed(
    path: &Path,
    threshold: u64,
) -> Result<RotationOutcome, LogPipelineError> {
    let rotation_error = |source: io::Error| LogPipelineError::Rotation {
        path: path.to_path_buf(),
        source,
    };

    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RotationOutcome::Missing),
        Err(e) => return Err(rotation_error(e)),
    };

    let size = metadata.len();
    if size < threshold {
        return Ok(RotationOutcome::BelowThreshold { size });
    }

    let renamed = {
        let path = path.to_path_buf();
        let label = timestamp_label(Utc::now());
        tokio::task::spawn_blocking(move || archive_base_path(&path, &label))
            .await
            .map_err(|e| rotation_error(io::Error::new(io::ErrorKind::Other, e)))?
    };
    fs::rename(path, &renamed).await.map_err(rotation_error)?;

    let archive = gz_path(&renamed);
    let source = renamed.clone();
    let target = archive.clone();
    tokio::task::spawn_blocking(move || gzip_file(&source, &target))
        .await
        .map_err(|e| rotation_error(io::Error::new(io::ErrorKind::Other, e)))?
        .map_err(rotation_error)?;

    if let Err(e) = fs::remove_file(&renamed).await {
        tracing::warn!(
            path = %renamed.display(),
            error = %e,
            "Failed to remove uncompressed log after rotation"
        );
    }

    tracing::info!(
        archive = %archive.display(),
        size_bytes = size,
        "Rotated webhook log"
    );

    Ok(RotationOutcome::Rotated { archive })
}

/// `<dir>/<stem>-<label>.<ext>`, suffixed with `-N` if that name (or its
/// archive) is already taken.
fn archive_base_path(path: &Path, label: &str) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("webhooks");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("log");

    let mut candidate = dir.join(format!("{stem}-{label}.{ext}"));
    let mut attempt = 1;
    while candidate.exists() || gz_path(&candidate).exists() {
        candidate = dir.join(format!("{stem}-{label}-{attempt}.{ext}"));
        attempt += 1;
    }
    candidate
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

fn gzip_file(source: &Path, target: &Path) -> io::Result<()> {
    let mut reader = BufReader::new(File::open(source)?);
    let mut encoder = GzEncoder::new(BufWriter::new(File::create(target)?), Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    let mut writer = encoder.finish()?;
    io::Write::flush(&mut writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn gz_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().map(|e| e == "gz").unwrap_or(false))
            .collect();
        files.sort();
        files
    }

    fn decompress(path: &Path) -> Vec<u8> {
        let mut out = Vec::new();
        GzDecoder::new(File::open(path).unwrap())
            .read_to_end(&mut out)
            .unwrap();
        out
    }

    // ══════════════════════════════════════════════════════════════
    // Label Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn label_replaces_colons_and_periods() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 12).unwrap()
            + chrono::Duration::milliseconds(345);
        assert_eq!(timestamp_label(now), "2026-10-16T09-30-12-345Z");
    }

    #[test]
    fn archive_name_uses_stem_label_and_extension() {
        let path = Path::new("/tmp/logs/webhooks.log");
        assert_eq!(
            archive_base_path(path, "2026-10-16T09-30-12-345Z"),
            PathBuf::from("/tmp/logs/webhooks-2026-10-16T09-30-12-345Z.log")
        );
        assert_eq!(
            gz_path(Path::new("/tmp/logs/webhooks-x.log")),
            PathBuf::from("/tmp/logs/webhooks-x.log.gz")
        );
    }

    #[test]
    fn archive_name_avoids_collisions() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("webhooks.log");
        std::fs::write(temp.path().join("webhooks-L.log.gz"), b"").unwrap();

        assert_eq!(
            archive_base_path(&path, "L"),
            temp.path().join("webhooks-L-1.log")
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Rotation Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_file_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("webhooks.log");

        let outcome = rotate_if_needed(&path, 10).await.unwrap();

        assert_eq!(outcome, RotationOutcome::Missing);
        assert!(gz_files(temp.path()).is_empty());
    }

    #[tokio::test]
    async fn small_file_is_left_alone() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("webhooks.log");
        std::fs::write(&path, b"{\"a\":1}\n").unwrap();

        let outcome = rotate_if_needed(&path, 1024).await.unwrap();

        assert_eq!(outcome, RotationOutcome::BelowThreshold { size: 8 });
        assert!(path.exists());
        assert!(gz_files(temp.path()).is_empty());
    }

    #[tokio::test]
    async fn file_at_threshold_is_archived() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("webhooks.log");
        let content = b"{\"id\":\"evt_1\"}\n{\"id\":\"evt_2\"}\n".to_vec();
        std::fs::write(&path, &content).unwrap();

        let outcome = rotate_if_needed(&path, content.len() as u64).await.unwrap();

        let archives = gz_files(temp.path());
        assert_eq!(archives.len(), 1);
        assert_eq!(outcome, RotationOutcome::Rotated { archive: archives[0].clone() });
        assert!(!path.exists());
        assert_eq!(decompress(&archives[0]), content);

        let name = archives[0].file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("webhooks-"));
        assert!(name.ends_with(".log.gz"));
    }

    #[tokio::test]
    async fn uncompressed_copy_is_removed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("webhooks.log");
        std::fs::write(&path, b"0123456789").unwrap();

        rotate_if_needed(&path, 5).await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().map(|e| e == "log").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn compression_failure_keeps_renamed_log() {
        let temp = TempDir::new().unwrap();
        // `<stem>-<label>.log` fills NAME_MAX exactly, so the rename succeeds
        // and creating the `.gz` beside it fails with ENAMETOOLONG.
        let stem = "w".repeat(255 - 1 - timestamp_label(Utc::now()).len() - ".log".len());
        let path = temp.path().join(format!("{stem}.log"));
        let content = b"{\"id\":\"evt_1\"}\n".to_vec();
        std::fs::write(&path, &content).unwrap();

        let result = rotate_if_needed(&path, 1).await;

        assert!(matches!(result, Err(LogPipelineError::Rotation { .. })));
        assert!(!path.exists());
        assert!(gz_files(temp.path()).is_empty());
        let renamed: Vec<PathBuf> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(renamed.len(), 1);
        assert_eq!(std::fs::read(&renamed[0]).unwrap(), content);
    }

    #[tokio::test]
    async fn consecutive_rotations_produce_distinct_archives() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("webhooks.log");

        std::fs::write(&path, b"first\n").unwrap();
        rotate_if_needed(&path, 1).await.unwrap();
        std::fs::write(&path, b"second\n").unwrap();
        rotate_if_needed(&path, 1).await.unwrap();

        let archives = gz_files(temp.path());
        assert_eq!(archives.len(), 2);
        let mut contents: Vec<Vec<u8>> = archives.iter().map(|p| decompress(p)).collect();
        contents.sort();
        assert_eq!(contents, vec![b"first\n".to_vec(), b"second\n".to_vec()]);
    }
}
