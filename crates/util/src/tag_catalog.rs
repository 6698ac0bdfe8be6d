//! Tag catalog backing the filter selectors.

use std::fs;
use std::path::{Path, PathBuf};

use civiclab_types::{TagCategory, TagDefinition};
use thiserror::Error;

const EMBEDDED_TAGS: &str = include_str!("../assets/tags.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read tag catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tag catalog {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCatalog {
    tags: Vec<TagDefinition>,
}

impl TagCatalog {
    pub fn new(tags: Vec<TagDefinition>) -> Self {
        Self { tags }
    }

    /// Catalog compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::parse(EMBEDDED_TAGS, "<embedded>")
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data, &path.display().to_string())
    }

    fn parse(data: &str, origin: &str) -> Result<Self, CatalogError> {
        let tags = serde_json::from_str(data).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        Ok(Self { tags })
    }

    pub fn tags(&self) -> &[TagDefinition] {
        &self.tags
    }

    /// Tags of one category, in catalog order.
    pub fn by_category(&self, category: TagCategory) -> Vec<TagDefinition> {
        self.tags.iter().filter(|tag| tag.category == category).cloned().collect()
    }
}
