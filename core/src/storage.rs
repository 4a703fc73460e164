//! Object-storage abstraction the orchestrator drives the pipeline
//! against: two named buckets, list/download/upload by key. The real
//! backend (S3 or equivalent) lives outside this crate; callers supply
//! an implementation of [`BlobStore`].

use std::fs;
use std::path::{Path, PathBuf};

use common::err::{CResult, ReError};

/// List/download/upload by key, scoped to one bucket.
pub trait BlobStore: Send + Sync {
    /// Lists keys under `prefix`, in implementation-defined but stable
    /// order (schema/set processing order is derived from this).
    fn list(&self, prefix: &str) -> CResult<Vec<String>>;

    /// Downloads `key` to `local_path`. A missing key is reported as
    /// `ReError::StorageErr`, which callers may treat as "no data"
    /// where the contract allows it.
    fn download(&self, key: &str, local_path: &Path) -> CResult<()>;

    /// Uploads the file at `local_path` to `key`.
    fn upload(&self, local_path: &Path, key: &str) -> CResult<()>;
}

/// A [`BlobStore`] backed by a directory on the local filesystem, keyed
/// by the same `/`-separated paths used for the real bucket. Used in
/// tests and for local/offline runs.
pub struct LocalFsBlobStore {
    root: PathBuf,
}

impl LocalFsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalFsBlobStore { root: root.into() }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl BlobStore for LocalFsBlobStore {
    fn list(&self, prefix: &str) -> CResult<Vec<String>> {
        let dir = self.resolve(prefix);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys: Vec<String> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| format!("{}/{}", prefix.trim_end_matches('/'), entry.file_name().to_string_lossy()))
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn download(&self, key: &str, local_path: &Path) -> CResult<()> {
        let src = self.resolve(key);
        if !src.exists() {
            return Err(ReError::StorageErr(format!("key not found: {}", key)));
        }
        if let Some(parent) = local_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&src, local_path)?;
        Ok(())
    }

    fn upload(&self, local_path: &Path, key: &str) -> CResult<()> {
        let dest = self.resolve(key);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local_path, &dest)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_upload_then_download_round_trips() {
        let bucket_dir = tempdir().unwrap();
        let store = LocalFsBlobStore::new(bucket_dir.path());

        let src_dir = tempdir().unwrap();
        let src_path = src_dir.path().join("source.txt");
        fs::write(&src_path, b"hello").unwrap();

        store.upload(&src_path, "outputs/batch1/out.txt").unwrap();

        let dest_dir = tempdir().unwrap();
        let dest_path = dest_dir.path().join("out.txt");
        store.download("outputs/batch1/out.txt", &dest_path).unwrap();

        assert_eq!(fs::read(&dest_path).unwrap(), b"hello");
    }

    #[test]
    fn test_download_missing_key_errors() {
        let bucket_dir = tempdir().unwrap();
        let store = LocalFsBlobStore::new(bucket_dir.path());
        let dest = bucket_dir.path().join("nope.txt");
        assert!(store.download("inputs/batch1/schemas/missing.txt", &dest).is_err());
    }

    #[test]
    fn test_list_returns_sorted_keys() {
        let bucket_dir = tempdir().unwrap();
        let store = LocalFsBlobStore::new(bucket_dir.path());
        fs::create_dir_all(bucket_dir.path().join("inputs/batch1/schemas")).unwrap();
        fs::write(bucket_dir.path().join("inputs/batch1/schemas/B_SCHEMA.txt"), b"b").unwrap();
        fs::write(bucket_dir.path().join("inputs/batch1/schemas/A_SCHEMA.txt"), b"a").unwrap();

        let keys = store.list("inputs/batch1/schemas").unwrap();
        assert_eq!(
            keys,
            vec![
                "inputs/batch1/schemas/A_SCHEMA.txt".to_string(),
                "inputs/batch1/schemas/B_SCHEMA.txt".to_string(),
            ]
        );
    }

    #[test]
    fn test_list_missing_prefix_returns_empty() {
        let bucket_dir = tempdir().unwrap();
        let store = LocalFsBlobStore::new(bucket_dir.path());
        assert_eq!(store.list("inputs/batch1/schemas").unwrap(), Vec::<String>::new());
    }
}
