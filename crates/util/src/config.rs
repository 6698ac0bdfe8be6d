//! Application configuration for the civiclab TUI.
//!
//! A small JSON file describes the session, the site the links point to, the
//! collaborators to use for storage and contact delivery, and the project the
//! contact and upload components are bound to. The file lives in the standard
//! configuration directory (`~/.config/civiclab/config.json` on most
//! platforms) unless `CIVICLAB_CONFIG_PATH` or an explicit path says otherwise.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use civiclab_types::{FileInfo, ProjectDetails};
use dirs_next::{config_dir, data_dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::contact::{ContactError, ContactMessenger, HttpContactMessenger, LoggingContactMessenger};
use crate::expand_tilde;
use crate::session::SessionSnapshot;
use crate::storage::{FileStorage, HttpFileStorage, LocalDirectoryStorage, StorageError};
use crate::tag_catalog::{CatalogError, TagCatalog};

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "CIVICLAB_CONFIG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Hidden form field id used when the config does not name one.
pub const DEFAULT_FILE_FIELD_ID: &str = "project_files";

/// Error surfaced when reading the configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure other than a missing file.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file exists but is not valid configuration JSON.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where uploaded files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    Local { directory: PathBuf },
    Http { endpoint: String },
}

impl Default for StorageConfig {
    fn default() -> Self {
        let directory = data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("civiclab")
            .join("storage");
        StorageConfig::Local { directory }
    }
}

/// Persisted configuration values. Every field has a default so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the public site, used to build navigation links.
    pub site_base_url: String,
    pub session: SessionSnapshot,
    pub storage: StorageConfig,
    /// Base endpoint for contact messages; messages are only logged when unset.
    pub contact_endpoint: Option<String>,
    /// Project the contact button and file list are bound to.
    pub project: Option<ProjectDetails>,
    /// Files already attached to the project.
    pub files: Vec<FileInfo>,
    /// Id of the hidden form field holding the serialized file list.
    pub file_field_id: String,
    /// Alternate tag catalog; the embedded catalog is used when unset.
    pub tags_path: Option<PathBuf>,
    /// Preferred theme id.
    pub theme: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_base_url: "http://localhost:8000".to_string(),
            session: SessionSnapshot::default(),
            storage: StorageConfig::default(),
            contact_endpoint: None,
            project: None,
            files: Vec::new(),
            file_field_id: DEFAULT_FILE_FIELD_ID.to_string(),
            tags_path: None,
            theme: None,
        }
    }
}

impl AppConfig {
    pub fn build_storage(&self) -> Result<Arc<dyn FileStorage>, StorageError> {
        Ok(match &self.storage {
            StorageConfig::Local { directory } => Arc::new(LocalDirectoryStorage::new(directory.clone())),
            StorageConfig::Http { endpoint } => Arc::new(HttpFileStorage::new(endpoint)?),
        })
    }

    pub fn build_contact_messenger(&self) -> Result<Arc<dyn ContactMessenger>, ContactError> {
        Ok(match self.contact_endpoint.as_deref() {
            Some(endpoint) => Arc::new(HttpContactMessenger::new(endpoint)?),
            None => Arc::new(LoggingContactMessenger),
        })
    }

    pub fn load_tags(&self) -> Result<TagCatalog, CatalogError> {
        match self.tags_path.as_deref() {
            Some(path) => TagCatalog::from_path(&expand_tilde(&path.to_string_lossy())),
            None => TagCatalog::embedded(),
        }
    }
}

/// Configuration plus the path it was resolved from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: AppConfig,
    /// `false` when no file existed and defaults were used.
    pub from_file: bool,
}

/// Resolve the config path: explicit override, then the environment, then the config dir.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return expand_tilde(&path.to_string_lossy());
    }
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("civiclab")
        .join(CONFIG_FILE_NAME)
}

/// Load configuration. A missing file yields defaults; anything else that goes wrong is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let path = resolve_config_path(explicit);
    match fs::read_to_string(&path) {
        Ok(data) => {
            let config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "loaded configuration");
            Ok(LoadedConfig {
                path,
                config,
                from_file: true,
            })
        }
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no configuration file; using defaults");
            Ok(LoadedConfig {
                path,
                config: AppConfig::default(),
                from_file: false,
            })
        }
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CurrentUser;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");

        let loaded = load_config(Some(&path)).expect("defaults");
        assert!(!loaded.from_file);
        assert_eq!(loaded.config, AppConfig::default());
        assert_eq!(loaded.config.file_field_id, DEFAULT_FILE_FIELD_ID);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "session": { "logged_in": true, "email_verified": true, "user_id": 8 },
                "project": { "project_id": 2, "project_creator": 1, "project_claimed": true },
                "storage": { "kind": "http", "endpoint": "https://files.example.org/bucket" }
            }"#,
        )
        .expect("write config");

        let loaded = load_config(Some(&path)).expect("config parses");
        assert!(loaded.from_file);
        assert!(loaded.config.session.is_email_verified());
        assert_eq!(loaded.config.project.as_ref().map(|p| p.project_id), Some(2));
        assert_eq!(
            loaded.config.storage,
            StorageConfig::Http {
                endpoint: "https://files.example.org/bucket".to_string()
            }
        );
        assert!(loaded.config.files.is_empty());
        assert!(loaded.config.build_storage().is_ok());
    }

    #[test]
    fn malformed_file_is_an_error_naming_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"session\": ").expect("write config");

        let error = load_config(Some(&path)).expect_err("malformed config");
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert!(error.to_string().contains("config.json"));
    }

    #[test]
    fn environment_override_is_used_without_explicit_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("from-env.json");
        fs::write(&path, r#"{ "file_field_id": "attachments" }"#).expect("write config");

        temp_env::with_var(CONFIG_PATH_ENV, Some(path.to_string_lossy().as_ref()), || {
            assert_eq!(resolve_config_path(None), path);
            let loaded = load_config(None).expect("config parses");
            assert_eq!(loaded.config.file_field_id, "attachments");
        });
    }

    #[test]
    fn explicit_path_beats_environment() {
        let explicit = PathBuf::from("/tmp/explicit-civiclab.json");
        temp_env::with_var(CONFIG_PATH_ENV, Some("/tmp/env-civiclab.json"), || {
            assert_eq!(resolve_config_path(Some(&explicit)), explicit);
        });
    }
}
