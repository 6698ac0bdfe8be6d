//! Collaborators for the civiclab components: session access, navigation
//! links, analytics, file storage, contact delivery, the tag catalog, and
//! configuration loading.

pub mod analytics;
pub mod config;
pub mod contact;
pub mod links;
pub mod path_processing;
pub mod session;
pub mod storage;
pub mod tag_catalog;

pub use analytics::{AnalyticsSink, MemoryAnalyticsSink, Metrics, TracingAnalyticsSink};
pub use config::{AppConfig, ConfigError, LoadedConfig, StorageConfig, load_config};
pub use contact::{ContactError, ContactMessenger};
pub use links::{SiteLinks, UrlError};
pub use path_processing::{display_file_name, expand_tilde};
pub use session::{CurrentUser, SessionSnapshot};
pub use storage::{FileStorage, StorageError};
pub use tag_catalog::{CatalogError, TagCatalog};
