//! Project and file records exchanged with the project API and file storage.

use serde::{Deserialize, Serialize};

/// Project detail record as returned by the project API.
///
/// Only the fields the contact flow needs are modeled; unknown fields in the
/// API payload are ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub project_id: u64,
    #[serde(default)]
    pub project_name: String,
    /// User id of the contributor who created the project.
    pub project_creator: u64,
    /// Whether the owner has claimed the project listing.
    #[serde(default)]
    pub project_claimed: bool,
}

/// Visibility of an uploaded file on the project page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    #[serde(rename = "PUBLIC")]
    Public,
    #[serde(rename = "PRIVATE")]
    Private,
}

/// Descriptor returned by the file storage once an upload completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadData {
    pub id: String,
    /// Storage key used to delete the object later.
    pub key: String,
    pub public_url: String,
    pub file_name: String,
}

/// A file attached to a project form.
///
/// Serialized with camelCase keys since the list is submitted as a JSON blob
/// inside a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub id: String,
    pub key: String,
    pub public_url: String,
    pub file_name: String,
    #[serde(default)]
    pub visibility: Visibility,
}

impl FileInfo {
    /// Builds the descriptor for a freshly uploaded file. New uploads are public.
    pub fn from_upload(upload: FileUploadData) -> Self {
        let FileUploadData {
            id,
            key,
            public_url,
            file_name,
        } = upload;
        Self {
            id,
            key,
            public_url,
            file_name,
            visibility: Visibility::Public,
        }
    }

    /// Identity used to match list entries: the public URL followed by the id.
    pub fn identity(&self) -> String {
        format!("{}{}", self.public_url, self.id)
    }
}
