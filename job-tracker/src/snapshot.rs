use async_trait::async_trait;
use serde::Deserialize;
use shared_types::{JobDraft, JobRecord};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, TrackerError};
use crate::validation::{validate_draft, ValidationMode};

/// Where the initial, read-only job document comes from
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the raw `{ "jobs": [...] }` document
    async fn fetch(&self) -> Result<String>;

    /// Human readable origin, for logs
    fn describe(&self) -> String;
}

/// Snapshot stored as a JSON file on disk
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            TrackerError::DataUnavailable(format!("Failed to read {:?}: {e}", self.path))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Snapshot held in memory, e.g. bundled with the binary
pub struct StaticSnapshotSource {
    body: String,
}

impl StaticSnapshotSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshotSource {
    async fn fetch(&self) -> Result<String> {
        Ok(self.body.clone())
    }

    fn describe(&self) -> String {
        "inline snapshot".to_string()
    }
}

/// Liveness of the view that asked for a load.
///
/// Clones share the flag. A load that resolves after `unmount` is discarded.
#[derive(Debug, Clone)]
pub struct ViewMount {
    mounted: Arc<AtomicBool>,
}

impl ViewMount {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

impl Default for ViewMount {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a load that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection now holds this many records
    Loaded(usize),
    /// The requesting view went away first; nothing was applied
    Discarded,
}

#[derive(Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    jobs: Vec<serde_json::Value>,
}

/// Fetch and parse a snapshot, giving up after `timeout`
pub async fn fetch_snapshot(
    source: &dyn SnapshotSource,
    timeout: Duration,
) -> Result<Vec<JobRecord>> {
    tracing::info!("Loading job snapshot from {}", source.describe());

    let body = tokio::time::timeout(timeout, source.fetch())
        .await
        .map_err(|_| {
            TrackerError::DataUnavailable(format!(
                "Timed out after {}s loading {}",
                timeout.as_secs_f32(),
                source.describe()
            ))
        })??;

    parse_snapshot(&body)
}

/// Parse a snapshot document, dropping entries that are not usable records.
///
/// An entry is dropped when it has no id, fails the record schema, or repeats
/// an id seen earlier in the document.
pub fn parse_snapshot(body: &str) -> Result<Vec<JobRecord>> {
    let document: SnapshotDocument = serde_json::from_str(body)
        .map_err(|e| TrackerError::DataUnavailable(format!("Malformed snapshot: {e}")))?;

    let total = document.jobs.len();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(total);

    for (index, entry) in document.jobs.into_iter().enumerate() {
        let draft = match entry_to_draft(entry) {
            Some(draft) => draft,
            None => {
                tracing::warn!("Skipping snapshot entry {}: not a job object", index);
                continue;
            }
        };

        if draft.id.as_ref().map_or(true, |id| id.is_blank()) {
            tracing::warn!("Skipping snapshot entry {}: missing id", index);
            continue;
        }

        let record = match validate_draft(&draft, ValidationMode::Snapshot) {
            Ok(record) => record,
            Err(errors) => {
                tracing::warn!("Skipping snapshot entry {}: {}", index, errors);
                continue;
            }
        };

        if !seen.insert(record.id.clone()) {
            tracing::warn!("Skipping snapshot entry {}: duplicate id {}", index, record.id);
            continue;
        }

        records.push(record);
    }

    tracing::info!("Loaded {} of {} snapshot entries", records.len(), total);
    Ok(records)
}

fn entry_to_draft(entry: serde_json::Value) -> Option<JobDraft> {
    let serde_json::Value::Object(mut fields) = entry else {
        return None;
    };

    // Hand-edited snapshots carry numbers where text is expected (salary: 90000)
    for (key, value) in fields.iter_mut() {
        if key == "id" {
            continue;
        }
        match value {
            serde_json::Value::Number(n) => *value = serde_json::Value::String(n.to_string()),
            serde_json::Value::Bool(b) => *value = serde_json::Value::String(b.to_string()),
            _ => {}
        }
    }

    serde_json::from_value(serde_json::Value::Object(fields)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::JobStatus;

    const SNAPSHOT: &str = r#"{
        "jobs": [
            { "id": "1", "company": "TechNova", "position": "Engineer", "location": "Remote",
              "status": "interview", "appliedDate": "2025-01-05", "salary": 95000 },
            { "company": "NoId Corp", "position": "Analyst", "location": "Oslo",
              "appliedDate": "2025-01-06" },
            { "id": "", "company": "Blank", "position": "Analyst", "location": "Oslo",
              "appliedDate": "2025-01-06" },
            { "id": 2, "company": "Acme", "position": "Designer", "location": "Lisbon",
              "status": "ghosted", "appliedDate": "2025-02-01", "deadline": "" },
            { "id": "3", "company": "Broken", "position": "Dev", "location": "Rome",
              "appliedDate": "not a date" },
            { "id": "1", "company": "Duplicate", "position": "Dev", "location": "Rome",
              "appliedDate": "2025-01-01" },
            null
        ]
    }"#;

    #[test]
    fn test_malformed_entries_are_dropped() {
        let records = parse_snapshot(SNAPSHOT).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        assert_eq!(records[0].company, "TechNova");
        assert_eq!(records[0].salary.as_deref(), Some("95000"));
        assert_eq!(records[1].status, JobStatus::Unrecognized("ghosted".to_string()));
        assert!(records[1].deadline.is_none());
    }

    #[test]
    fn test_missing_jobs_key_is_empty() {
        assert!(parse_snapshot("{}").unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_document_is_unavailable() {
        let err = parse_snapshot("<html>404</html>").unwrap_err();
        assert!(matches!(err, TrackerError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let source = FileSnapshotSource::new("/definitely/not/here/data.json");
        let err = fetch_snapshot(&source, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, TrackerError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_file_source_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let records = fetch_snapshot(&FileSnapshotSource::new(&path), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    struct StalledSource;

    #[async_trait]
    impl SnapshotSource for StalledSource {
        async fn fetch(&self) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("{}".to_string())
        }

        fn describe(&self) -> String {
            "stalled".to_string()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_fetch_times_out() {
        let err = fetch_snapshot(&StalledSource, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::DataUnavailable(ref m) if m.contains("Timed out")));
    }

    #[test]
    fn test_view_mount_clones_share_state() {
        let mount = ViewMount::new();
        let handle = mount.clone();
        assert!(handle.is_mounted());
        mount.unmount();
        assert!(!handle.is_mounted());
    }
}
