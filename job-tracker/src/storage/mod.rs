pub mod file_blob;
pub mod memory_blob;

pub use file_blob::FileBlobStore;
pub use memory_blob::MemoryBlobStore;

use crate::error::{Result, TrackerError};
use shared_types::JobRecord;

/// Blob key of the saved-for-later collection
pub const WISHLIST_KEY: &str = "job-tracker/wishlist";

/// Blob key of the locally simulated primary collection
pub const JOBS_KEY: &str = "job-tracker/jobs";

/// Local key-value storage. Each value is a whole serialized collection and
/// is overwritten in full on every write.
pub trait BlobStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Read a JSON array of records stored under `key`.
///
/// A missing key is an empty collection. A blob that no longer parses is
/// logged and treated as empty so a corrupt file cannot block startup.
pub fn read_records(blob: &dyn BlobStore, key: &str) -> Result<Vec<JobRecord>> {
    let Some(raw) = blob.read(key)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<JobRecord>>(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            tracing::warn!("Discarding unreadable blob {}: {}", key, e);
            Ok(Vec::new())
        }
    }
}

pub fn write_records(blob: &dyn BlobStore, key: &str, records: &[JobRecord]) -> Result<()> {
    let raw = serde_json::to_string(records)
        .map_err(|e| TrackerError::Storage(format!("Failed to serialize {key}: {e}")))?;
    blob.write(key, &raw)?;
    tracing::debug!("Persisted {} records under {}", records.len(), key);
    Ok(())
}
