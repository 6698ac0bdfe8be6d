//! Shared type definitions for the civiclab workspace.
//!
//! Domain records live in [`project`] and [`tags`]; this module also holds the
//! message/effect vocabulary the TUI components use to talk to the runtime.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod project;
pub mod tags;

pub use project::{FileInfo, FileUploadData, ProjectDetails, Visibility};
pub use tags::{ParseTagCategoryError, TagCategory, TagDefinition};

/// Front-end sections addressable through the `section` query parameter.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Section {
    FindProjects,
    AboutProject,
    CreateProject,
    EditProject,
    MyProjects,
    SignUp,
    LogIn,
    ChangePassword,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FindProjects => "FindProjects",
            Self::AboutProject => "AboutProject",
            Self::CreateProject => "CreateProject",
            Self::EditProject => "EditProject",
            Self::MyProjects => "MyProjects",
            Self::SignUp => "SignUp",
            Self::LogIn => "LogIn",
            Self::ChangePassword => "ChangePassword",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual severity for modal borders and status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Messages that can be sent to update the application state.
///
/// Input events are routed separately; these cover periodic ticks and the
/// outcomes of collaborator calls that ran off the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Periodic UI tick
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// The confirmation modal was answered (`true` = confirmed)
    ConfirmationAnswered(bool),
    /// Storage finished uploading a file
    FileUploaded(FileUploadData),
    /// Storage upload failed
    FileUploadFailed { path: PathBuf, error: String },
    /// Storage removed a file that was already dropped from the list
    FileDeleted(FileInfo),
    /// Storage delete failed; the file goes back to its former position
    FileDeleteFailed { file: FileInfo, error: String },
    /// Contact message delivered to the project owner
    ContactMessageSent { project_id: u64 },
    /// Contact message delivery failed
    ContactMessageFailed { project_id: u64, error: String },
}

/// Side effects that can be triggered by state changes.
///
/// Components return these from their handlers; the runtime performs them so
/// component state never touches collaborators directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Display a modal view
    ShowModal(Modal),
    /// Hide any open modal
    CloseModal,
    /// Follow a link produced by the URL builder
    Navigate(String),
    /// A tag was picked in a filter selector; adds or removes it from the active filters
    TagFilterToggled(TagDefinition),
    /// Upload the file at the given local path
    UploadFile(PathBuf),
    /// Delete a file that was already removed from the local list
    DeleteStoredFile(FileInfo),
    /// Deliver a message to the owner of a project
    SendContactMessage { project_id: u64, message: String },
    /// Feed a message back through the component tree
    SendMsg(Msg),
}

/// Modal overlays that can be displayed atop the main view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Yes/No gate in front of a destructive action
    Confirmation,
    /// Message composer for the project owner
    ContactProject,
}
