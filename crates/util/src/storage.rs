//! File storage collaborators used by the upload list.
//!
//! Two backends are provided: a local directory (the default, useful for
//! development and tests) and a plain HTTP object endpoint that accepts
//! `PUT`/`DELETE` on `<endpoint>/<key>`.

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use civiclab_types::FileUploadData;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::path_processing::display_file_name;

/// Prefix under which uploaded objects are keyed.
const UPLOAD_PREFIX: &str = "uploads";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no stored file with key '{0}'")]
    NotFound(String),
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("invalid storage endpoint '{0}'")]
    InvalidEndpoint(String),
}

/// Upload and delete operations on the project file store.
#[async_trait::async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores the file at `path` and returns its descriptor.
    async fn upload(&self, path: &Path) -> Result<FileUploadData, StorageError>;

    /// Removes the object stored under `key`.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

static UPLOAD_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Unique-enough object id: upload time in milliseconds plus a process-local counter.
fn next_upload_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let sequence = UPLOAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{millis}-{sequence}")
}

fn object_key(id: &str, file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    format!("{UPLOAD_PREFIX}/{id}-{sanitized}")
}

/// Rejects keys that could escape the storage root.
fn validate_key(key: &str) -> Result<&Path, StorageError> {
    let path = Path::new(key);
    let is_relative_and_contained = !key.is_empty() && path.components().all(|component| matches!(component, Component::Normal(_)));
    if is_relative_and_contained {
        Ok(path)
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Stores uploads under a local directory and hands out `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalDirectoryStorage {
    root: PathBuf,
}

impl LocalDirectoryStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl FileStorage for LocalDirectoryStorage {
    async fn upload(&self, path: &Path) -> Result<FileUploadData, StorageError> {
        let file_name = display_file_name(path);
        let id = next_upload_id();
        let key = object_key(&id, &file_name);
        let destination = self.root.join(validate_key(&key)?);
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(path, &destination).await?;
        debug!(source = %path.display(), destination = %destination.display(), "stored upload locally");

        let absolute = std::path::absolute(&destination)?;
        let public_url = Url::from_file_path(&absolute)
            .map(String::from)
            .unwrap_or_else(|_| absolute.display().to_string());
        Ok(FileUploadData {
            id,
            key,
            public_url,
            file_name,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let target = self.root.join(validate_key(key)?);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(error) => Err(StorageError::Io(error)),
        }
    }
}

/// Object store reachable over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFileStorage {
    endpoint: Url,
    http: Client,
}

impl HttpFileStorage {
    pub fn new(endpoint: &str) -> Result<Self, StorageError> {
        let mut endpoint = Url::parse(endpoint.trim()).map_err(|_| StorageError::InvalidEndpoint(endpoint.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(StorageError::InvalidEndpoint(endpoint.to_string()));
        }
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let http = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { endpoint, http })
    }

    fn object_url(&self, key: &str) -> Result<Url, StorageError> {
        validate_key(key)?;
        self.endpoint.join(key).map_err(|_| StorageError::InvalidKey(key.to_string()))
    }
}

#[async_trait::async_trait]
impl FileStorage for HttpFileStorage {
    async fn upload(&self, path: &Path) -> Result<FileUploadData, StorageError> {
        let file_name = display_file_name(path);
        let id = next_upload_id();
        let key = object_key(&id, &file_name);
        let url = self.object_url(&key)?;
        let bytes = tokio::fs::read(path).await?;
        debug!(%url, size = bytes.len(), "uploading file");
        self.http.put(url.clone()).body(bytes).send().await?.error_for_status()?;
        Ok(FileUploadData {
            id,
            key,
            public_url: url.into(),
            file_name,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let url = self.object_url(key)?;
        debug!(%url, "deleting stored file");
        let response = self.http.delete(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.to_string()));
        }
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_upload_then_delete() {
        let source_dir = tempfile::tempdir().expect("source dir");
        let source = source_dir.path().join("Budget 2024.csv");
        std::fs::write(&source, b"line,amount\n").expect("write source");

        let store_dir = tempfile::tempdir().expect("store dir");
        let storage = LocalDirectoryStorage::new(store_dir.path());

        let upload = storage.upload(&source).await.expect("upload");
        assert_eq!(upload.file_name, "Budget 2024.csv");
        assert!(upload.key.starts_with("uploads/"));
        assert!(upload.key.ends_with("-Budget_2024.csv"));
        assert!(upload.public_url.starts_with("file://"));
        assert!(store_dir.path().join(&upload.key).exists());

        storage.delete(&upload.key).await.expect("delete");
        assert!(!store_dir.path().join(&upload.key).exists());
    }

    #[tokio::test]
    async fn deleting_missing_object_reports_not_found() {
        let store_dir = tempfile::tempdir().expect("store dir");
        let storage = LocalDirectoryStorage::new(store_dir.path());

        let error = storage.delete("uploads/nothing-here.txt").await.expect_err("missing file");
        assert!(matches!(error, StorageError::NotFound(key) if key == "uploads/nothing-here.txt"));
    }

    #[tokio::test]
    async fn keys_cannot_escape_the_root() {
        let store_dir = tempfile::tempdir().expect("store dir");
        let storage = LocalDirectoryStorage::new(store_dir.path());

        for key in ["../outside.txt", "/etc/passwd", ""] {
            let error = storage.delete(key).await.expect_err("rejected key");
            assert!(matches!(error, StorageError::InvalidKey(_)), "key {key:?}");
        }
    }

    #[test]
    fn upload_ids_are_distinct() {
        assert_ne!(next_upload_id(), next_upload_id());
    }

    #[test]
    fn http_endpoint_joins_keys_below_its_path() {
        let storage = HttpFileStorage::new("https://files.example.org/bucket").expect("endpoint");
        let url = storage.object_url("uploads/1-a.txt").expect("object url");
        assert_eq!(url.as_str(), "https://files.example.org/bucket/uploads/1-a.txt");
        assert!(HttpFileStorage::new("not a url").is_err());
    }
}
