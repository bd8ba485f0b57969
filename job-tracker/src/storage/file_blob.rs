use super::BlobStore;
use crate::error::{Result, TrackerError};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each key as a JSON file inside one directory
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            TrackerError::Storage(format!("Failed to create data directory {:?}: {e}", dir))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '.' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| TrackerError::Storage(format!("Failed to read {:?}: {e}", path)))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        // Write then rename, a blob is either the old or the new value
        fs::write(&tmp_path, value)
            .map_err(|e| TrackerError::Storage(format!("Failed to write {:?}: {e}", tmp_path)))?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| TrackerError::Storage(format!("Failed to replace {:?}: {e}", path)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path()).unwrap();
        assert!(store.read("job-tracker/wishlist").unwrap().is_none());
    }

    #[test]
    fn test_write_overwrites_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path().join("nested")).unwrap();

        store.write("job-tracker/jobs", "[1,2,3]").unwrap();
        store.write("job-tracker/jobs", "[]").unwrap();

        assert_eq!(store.read("job-tracker/jobs").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("nested/job-tracker.jobs.json").exists());
        assert!(!dir.path().join("nested/job-tracker.jobs.json.tmp").exists());
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path()).unwrap();

        store.write("job-tracker/jobs", "[\"a\"]").unwrap();
        store.write("job-tracker/wishlist", "[\"b\"]").unwrap();

        assert_eq!(store.read("job-tracker/jobs").unwrap().as_deref(), Some("[\"a\"]"));
        assert_eq!(store.read("job-tracker/wishlist").unwrap().as_deref(), Some("[\"b\"]"));
    }
}
