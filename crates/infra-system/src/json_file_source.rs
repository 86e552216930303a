// JSON snapshot-file notification source
//
// Stand-in adapter for the platform notification API: every fetch reads the
// full current notification set from a JSON file, e.g.
//
//   [
//     { "id": 1, "text": ["Build finished", "all targets ok"] },
//     { "id": 2, "text": ["Alert"] }
//   ]
//
// Whatever writes the file owns the ids; this adapter only reports presence.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use noticed_core::domain::RawNotification;
use noticed_core::port::notification_source::{NotificationSource, SourceError};

#[derive(Debug, Deserialize)]
struct SnapshotEntry {
    id: u32,
    #[serde(default)]
    text: Vec<String>,
}

/// File-backed notification source
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl NotificationSource for JsonFileSource {
    async fn request_access(&self) -> Result<(), SourceError> {
        // The snapshot directory standing in for the platform capability:
        // a missing directory means nothing will ever produce snapshots here.
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        match tokio::fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(SourceError::Unsupported),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(SourceError::AccessDenied)
            }
            Err(_) => Err(SourceError::Unsupported),
        }
    }

    async fn fetch_current(&self) -> Result<Vec<RawNotification>, SourceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // No file yet: nothing is currently notified
                debug!(path = %self.path.display(), "Snapshot file absent, empty snapshot");
                return Ok(Vec::new());
            }
            Err(e) => return Err(SourceError::Transient(e.to_string())),
        };

        let entries: Vec<SnapshotEntry> = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::Transient(format!("snapshot parse: {e}")))?;

        Ok(entries
            .into_iter()
            .map(|e| RawNotification {
                id: e.id,
                text_elements: e.text,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("notices.json"));

        source.request_access().await.unwrap();
        let snapshot = source.fetch_current().await.unwrap();

        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_reads_entries_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notices.json");
        tokio::fs::write(
            &path,
            r#"[{"id":2,"text":["B"]},{"id":1,"text":["A","body"]}]"#,
        )
        .await
        .unwrap();

        let source = JsonFileSource::new(&path);
        let snapshot = source.fetch_current().await.unwrap();

        let ids: Vec<_> = snapshot.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(snapshot[1].text_elements, vec!["A", "body"]);
    }

    #[tokio::test]
    async fn test_garbage_file_is_transient() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notices.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let source = JsonFileSource::new(&path);
        let result = source.fetch_current().await;

        assert!(matches!(result, Err(SourceError::Transient(_))));
    }

    #[tokio::test]
    async fn test_access_check_fails_without_parent_directory() {
        let source = JsonFileSource::new("/definitely/not/a/real/dir/notices.json");

        let result = source.request_access().await;

        assert!(matches!(result, Err(SourceError::Unsupported)));
    }
}
