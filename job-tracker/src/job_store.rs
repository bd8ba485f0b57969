use shared_types::{JobDraft, JobId, JobPatch, JobRecord, ValidationErrors};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, TrackerError};
use crate::snapshot::{fetch_snapshot, LoadOutcome, SnapshotSource, ViewMount};
use crate::storage::{read_records, write_records, BlobStore, JOBS_KEY};
use crate::validation::{validate_draft, ValidationMode};

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Owner of the canonical job collection.
///
/// Consumers get read-only slices or clones. Changes go through
/// `add`/`update`/`remove`, each of which writes the local blob before the
/// in-memory collection is replaced, so a failed write changes nothing.
pub struct JobStore {
    jobs: Vec<JobRecord>,
    blob: Arc<dyn BlobStore>,
    load_timeout: Duration,
}

impl JobStore {
    /// Restore the locally simulated collection from `blob`
    pub fn open(blob: Arc<dyn BlobStore>) -> Result<Self> {
        let jobs = read_records(blob.as_ref(), JOBS_KEY)?;
        tracing::debug!("Restored {} jobs from local storage", jobs.len());

        Ok(Self {
            jobs,
            blob,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        })
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Replace the collection with the records of the initial snapshot.
    ///
    /// On failure the collection keeps what it held before and
    /// `DataUnavailable` is returned for the caller to report. If `mount`
    /// was unmounted while the fetch was in flight the result is dropped.
    pub async fn load(
        &mut self,
        source: &dyn SnapshotSource,
        mount: &ViewMount,
    ) -> Result<LoadOutcome> {
        let fetched = fetch_snapshot(source, self.load_timeout).await;

        if !mount.is_mounted() {
            tracing::debug!("View unmounted before snapshot resolved, discarding result");
            return Ok(LoadOutcome::Discarded);
        }

        let records = fetched.map_err(|e| {
            tracing::error!("Error loading jobs: {}", e);
            e
        })?;

        let count = records.len();
        self.commit(records)?;
        Ok(LoadOutcome::Loaded(count))
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn get(&self, id: &str) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| job.id == *id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Validate and append a new record, generating an id when none is given
    pub fn add(&mut self, mut draft: JobDraft) -> Result<JobRecord> {
        if draft.id.as_ref().map_or(true, |id| id.is_blank()) {
            draft.id = Some(generate_id());
        }

        let record = validate_draft(&draft, ValidationMode::Form)?;

        if self.get(record.id.as_str()).is_some() {
            let mut errors = ValidationErrors::default();
            errors.push("id", format!("A job with id {} already exists", record.id));
            return Err(errors.into());
        }

        let mut next = self.jobs.clone();
        next.push(record.clone());
        self.commit(next)?;

        tracing::info!("Added job {} ({} at {})", record.id, record.position, record.company);
        Ok(record)
    }

    /// Merge `patch` into the record with `id` and replace it whole.
    ///
    /// The status is only checked when the patch sets one, so a record
    /// carrying an unrecognized status from the snapshot stays editable.
    pub fn update(&mut self, id: &str, patch: &JobPatch) -> Result<JobRecord> {
        let index = self
            .jobs
            .iter()
            .position(|job| job.id == *id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;

        if patch.status.as_deref().is_some_and(|status| status.trim().is_empty()) {
            let mut errors = ValidationErrors::default();
            errors.push("status", "Status is required");
            return Err(errors.into());
        }

        let current = &self.jobs[index];
        let mut draft = JobDraft::from(current);
        draft.apply_patch(patch);
        if patch.status.is_none() {
            draft.status = None;
        }

        let mut record = validate_draft(&draft, ValidationMode::Form)?;
        if patch.status.is_none() {
            record.status = current.status.clone();
        }

        let mut next = self.jobs.clone();
        next[index] = record.clone();
        self.commit(next)?;

        tracing::info!("Updated job {}", record.id);
        Ok(record)
    }

    /// Remove the record with `id`. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Result<Option<JobRecord>> {
        if id.trim().is_empty() {
            return Err(TrackerError::InvalidArgument(
                "Cannot delete a job without an id".to_string(),
            ));
        }

        let Some(index) = self.jobs.iter().position(|job| job.id == *id) else {
            tracing::debug!("Remove of unknown job {} ignored", id);
            return Ok(None);
        };

        let mut next = self.jobs.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        tracing::info!("Removed job {}", removed.id);
        Ok(Some(removed))
    }

    fn commit(&mut self, next: Vec<JobRecord>) -> Result<()> {
        write_records(self.blob.as_ref(), JOBS_KEY, &next)?;
        self.jobs = next;
        Ok(())
    }
}

fn generate_id() -> JobId {
    JobId::new(uuid::Uuid::new_v4().to_string())
}
