use shared_types::JobRecord;
use std::sync::Arc;

use crate::error::Result;
use crate::storage::{read_records, write_records, BlobStore, WISHLIST_KEY};

/// Jobs saved for later.
///
/// Entries are value copies keyed by id. They are not tied to the
/// [`JobStore`](crate::JobStore): removing a job there leaves its saved copy
/// here untouched.
pub struct WishlistStore {
    entries: Vec<JobRecord>,
    blob: Arc<dyn BlobStore>,
}

impl WishlistStore {
    pub fn open(blob: Arc<dyn BlobStore>) -> Result<Self> {
        let entries = read_records(blob.as_ref(), WISHLIST_KEY)?;
        tracing::debug!("Restored {} wishlist entries", entries.len());
        Ok(Self { entries, blob })
    }

    /// Save a copy of `record`. Returns `false` when its id is already saved.
    pub fn save(&mut self, record: &JobRecord) -> Result<bool> {
        if self.contains(record.id.as_str()) {
            tracing::debug!("Job {} already in wishlist", record.id);
            return Ok(false);
        }

        let mut next = self.entries.clone();
        next.push(record.clone());
        write_records(self.blob.as_ref(), WISHLIST_KEY, &next)?;
        self.entries = next;

        tracing::info!("Saved {} at {} to wishlist", record.position, record.company);
        Ok(true)
    }

    /// Drop the entry with `id`. Returns `false` when there was none.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let next: Vec<JobRecord> = self
            .entries
            .iter()
            .filter(|entry| entry.id != *id)
            .cloned()
            .collect();

        if next.len() == self.entries.len() {
            return Ok(false);
        }

        write_records(self.blob.as_ref(), WISHLIST_KEY, &next)?;
        self.entries = next;

        tracing::info!("Removed job {} from wishlist", id);
        Ok(true)
    }

    pub fn list(&self) -> &[JobRecord] {
        &self.entries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
