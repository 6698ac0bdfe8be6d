//! State for the list of files attached to a project form.

use std::collections::HashSet;
use std::path::PathBuf;

use civiclab_types::{Effect, FileInfo, FileUploadData, Modal, Severity};
use civiclab_util::expand_tilde;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};
use tracing::{debug, warn};

use crate::ui::components::common::{ConfirmationModalOpts, ConfirmationModalState, TextInputState};

pub const DELETE_CONFIRMATION_MESSAGE: &str = "Do you want to delete this file?";

#[derive(Debug, Clone)]
pub struct FileUploadListState {
    element_id: String,
    files: Vec<FileInfo>,
    /// JSON of `files`, refreshed after every mutation.
    hidden_field: String,
    pending_delete: Option<FileInfo>,
    /// Identities of listed files and of files whose storage delete has not
    /// reported back, in list order.
    order: Vec<String>,
    /// Uploads handed to storage that have not reported back yet.
    in_flight: usize,
    list_state: ListState,

    pub upload_input: TextInputState,
    pub error: Option<String>,

    pub f_upload: FocusFlag,
    pub f_list: FocusFlag,
    container_focus: FocusFlag,
}

impl FileUploadListState {
    pub fn new(element_id: impl Into<String>, files: Vec<FileInfo>) -> Self {
        let mut state = Self {
            element_id: element_id.into(),
            files: Vec::new(),
            hidden_field: String::new(),
            pending_delete: None,
            order: Vec::new(),
            in_flight: 0,
            list_state: ListState::default(),
            upload_input: TextInputState::new(),
            error: None,
            f_upload: FocusFlag::new().with_name("files.upload"),
            f_list: FocusFlag::new().with_name("files.list"),
            container_focus: FocusFlag::new().with_name("files"),
        };
        state.set_files(files);
        state
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    /// Value of the hidden form field: the current list as JSON.
    pub fn hidden_field(&self) -> &str {
        &self.hidden_field
    }

    pub fn pending_delete(&self) -> Option<&FileInfo> {
        self.pending_delete.as_ref()
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    pub fn list_offset(&self) -> usize {
        self.list_state.offset()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Replace the list from outside (the project record was reloaded).
    pub fn set_files(&mut self, files: Vec<FileInfo>) {
        self.order = files.iter().map(FileInfo::identity).collect();
        self.files = files;
        self.clamp_selection();
        self.update_hidden_field();
    }

    fn update_hidden_field(&mut self) {
        match serde_json::to_string(&self.files) {
            Ok(json) => self.hidden_field = json,
            Err(error) => warn!(%error, field = %self.element_id, "could not serialize file list"),
        }
    }

    fn clamp_selection(&mut self) {
        let selected = match self.list_state.selected() {
            _ if self.files.is_empty() => None,
            Some(index) => Some(index.min(self.files.len() - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    /// Hand the path typed into the upload input to storage.
    pub fn request_upload(&mut self) -> Vec<Effect> {
        if self.upload_input.is_blank() {
            self.error = Some("Enter the path of a file to upload".to_string());
            return Vec::new();
        }
        let path: PathBuf = expand_tilde(self.upload_input.take().trim());
        self.error = None;
        self.in_flight += 1;
        debug!(path = %path.display(), "upload requested");
        vec![Effect::UploadFile(path)]
    }

    /// Append a finished upload. New files are public.
    pub fn append_upload(&mut self, upload: FileUploadData) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let file = FileInfo::from_upload(upload);
        self.order.push(file.identity());
        self.files.push(file);
        self.clamp_selection();
        self.update_hidden_field();
    }

    pub fn upload_failed(&mut self, error: String) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.error = Some(error);
    }

    /// Remember `file` and put the delete question into the confirmation modal.
    pub fn ask_for_delete_confirmation(&mut self, file: FileInfo, modal: &mut ConfirmationModalState) -> Vec<Effect> {
        modal.update_opts(ConfirmationModalOpts::yes_no(
            format!("Delete {}", file.file_name),
            DELETE_CONFIRMATION_MESSAGE,
            Severity::Warning,
        ));
        self.pending_delete = Some(file);
        vec![Effect::ShowModal(Modal::Confirmation)]
    }

    pub fn ask_to_delete_selected(&mut self, modal: &mut ConfirmationModalState) -> Vec<Effect> {
        match self.selected_index().and_then(|index| self.files.get(index)).cloned() {
            Some(file) => self.ask_for_delete_confirmation(file, modal),
            None => Vec::new(),
        }
    }

    /// Answer to the delete question.
    ///
    /// On confirmation the file is removed locally right away and a storage
    /// delete is requested. Its slot in `order` stays until storage answers.
    pub fn confirm_delete(&mut self, confirmed: bool) -> Vec<Effect> {
        let Some(target) = self.pending_delete.take() else {
            return Vec::new();
        };
        let mut effects = Vec::new();
        if confirmed {
            let identity = target.identity();
            if let Some(index) = self.files.iter().position(|file| file.identity() == identity) {
                let file = self.files.remove(index);
                effects.push(Effect::DeleteStoredFile(file));
            }
        }
        self.clamp_selection();
        self.update_hidden_field();
        effects
    }

    /// Storage removed the file for good.
    pub fn finish_delete(&mut self, file: &FileInfo) {
        let identity = file.identity();
        if !self.files.iter().any(|listed| listed.identity() == identity) {
            self.order.retain(|slot| *slot != identity);
        }
    }

    /// Storage refused the delete; reinstate the file after whichever of its
    /// former predecessors are still listed.
    pub fn restore_failed_delete(&mut self, file: FileInfo, error: String) {
        let identity = file.identity();
        let index = match self.order.iter().position(|slot| *slot == identity) {
            Some(slot) => {
                let predecessors: HashSet<&str> = self.order[..slot].iter().map(String::as_str).collect();
                self.files
                    .iter()
                    .filter(|listed| predecessors.contains(listed.identity().as_str()))
                    .count()
            }
            None => {
                self.order.push(identity);
                self.files.len()
            }
        };
        self.error = Some(format!("Could not delete {}: {error}", file.file_name));
        self.files.insert(index, file);
        self.clamp_selection();
        self.update_hidden_field();
    }

    pub fn select_next(&mut self) {
        if !self.files.is_empty() {
            let next = self.selected_index().map_or(0, |i| (i + 1).min(self.files.len() - 1));
            self.list_state.select(Some(next));
        }
    }

    pub fn select_previous(&mut self) {
        if !self.files.is_empty() {
            let previous = self.selected_index().map_or(0, |i| i.saturating_sub(1));
            self.list_state.select(Some(previous));
        }
    }
}

impl HasFocus for FileUploadListState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        builder.leaf_widget(&self.f_upload);
        builder.leaf_widget(&self.f_list);
        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use civiclab_types::Visibility;

    use super::*;

    fn upload(id: &str) -> FileUploadData {
        FileUploadData {
            id: id.to_string(),
            key: format!("uploads/{id}-plan.pdf"),
            public_url: format!("https://files.example.org/uploads/{id}-plan.pdf"),
            file_name: "plan.pdf".to_string(),
        }
    }

    #[test]
    fn append_then_confirmed_delete_empties_the_hidden_field() {
        let mut list = FileUploadListState::new("project_files", Vec::new());
        let mut modal = ConfirmationModalState::default();
        assert_eq!(list.hidden_field(), "[]");

        list.append_upload(upload("1"));
        assert_eq!(list.files()[0].visibility, Visibility::Public);
        assert!(list.hidden_field().contains("\"publicUrl\""));
        assert!(list.hidden_field().contains("\"visibility\":\"PUBLIC\""));

        let file = list.files()[0].clone();
        let effects = list.ask_for_delete_confirmation(file.clone(), &mut modal);
        assert_eq!(effects, vec![Effect::ShowModal(Modal::Confirmation)]);
        assert_eq!(modal.message(), Some(DELETE_CONFIRMATION_MESSAGE));

        let effects = list.confirm_delete(true);
        assert_eq!(effects, vec![Effect::DeleteStoredFile(file)]);
        assert_eq!(list.hidden_field(), "[]");
        assert!(list.pending_delete().is_none());
    }

    #[test]
    fn declined_delete_leaves_the_list_alone() {
        let mut list = FileUploadListState::new("project_files", Vec::new());
        let mut modal = ConfirmationModalState::default();
        list.append_upload(upload("1"));
        let before = list.hidden_field().to_string();

        list.ask_to_delete_selected(&mut modal);
        assert!(list.confirm_delete(false).is_empty());
        assert_eq!(list.files().len(), 1);
        assert_eq!(list.hidden_field(), before);
        assert!(list.pending_delete().is_none());
    }

    #[test]
    fn files_are_matched_by_url_and_id() {
        let mut list = FileUploadListState::new("project_files", Vec::new());
        let mut modal = ConfirmationModalState::default();
        list.append_upload(upload("1"));
        list.append_upload(upload("2"));

        let mut stale = list.files()[1].clone();
        stale.file_name = "renamed.pdf".to_string();
        stale.visibility = Visibility::Private;
        list.ask_for_delete_confirmation(stale, &mut modal);

        let effects = list.confirm_delete(true);
        assert!(matches!(&effects[..], [Effect::DeleteStoredFile(file)] if file.id == "2"));
        assert_eq!(list.files().len(), 1);
        assert_eq!(list.files()[0].id, "1");
    }

    #[test]
    fn failed_delete_restores_the_file_in_place() {
        let mut list = FileUploadListState::new("project_files", Vec::new());
        let mut modal = ConfirmationModalState::default();
        for id in ["1", "2", "3"] {
            list.append_upload(upload(id));
        }
        let original = list.hidden_field().to_string();

        let middle = list.files()[1].clone();
        list.ask_for_delete_confirmation(middle, &mut modal);
        let Some(Effect::DeleteStoredFile(file)) = list.confirm_delete(true).pop() else {
            panic!("expected a delete request");
        };

        list.restore_failed_delete(file, "access denied".to_string());
        assert_eq!(list.hidden_field(), original);
        assert!(list.error.as_deref().is_some_and(|e| e.contains("access denied")));
    }

    fn delete(list: &mut FileUploadListState, modal: &mut ConfirmationModalState, index: usize) -> FileInfo {
        let file = list.files()[index].clone();
        list.ask_for_delete_confirmation(file, modal);
        match list.confirm_delete(true).pop() {
            Some(Effect::DeleteStoredFile(file)) => file,
            other => panic!("expected a delete request, got {other:?}"),
        }
    }

    #[test]
    fn overlapping_failed_deletes_restore_the_original_order() {
        for failures_in_request_order in [true, false] {
            let mut list = FileUploadListState::new("project_files", Vec::new());
            let mut modal = ConfirmationModalState::default();
            for id in ["1", "2", "3"] {
                list.append_upload(upload(id));
            }
            let original = list.hidden_field().to_string();

            let second = delete(&mut list, &mut modal, 1);
            let first = delete(&mut list, &mut modal, 0);
            assert_eq!(list.files().len(), 1);

            let mut failures = vec![second, first];
            if !failures_in_request_order {
                failures.reverse();
            }
            for file in failures {
                list.restore_failed_delete(file, "timeout".to_string());
            }
            assert_eq!(list.hidden_field(), original);
        }
    }

    #[test]
    fn finished_delete_no_longer_anchors_restores() {
        let mut list = FileUploadListState::new("project_files", Vec::new());
        let mut modal = ConfirmationModalState::default();
        for id in ["1", "2", "3"] {
            list.append_upload(upload(id));
        }

        let first = delete(&mut list, &mut modal, 0);
        let second = delete(&mut list, &mut modal, 0);
        list.finish_delete(&first);
        list.restore_failed_delete(second, "timeout".to_string());

        let ids: Vec<&str> = list.files().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["2", "3"]);
    }

    #[test]
    fn prop_updates_reserialize() {
        let mut list = FileUploadListState::new("project_files", vec![FileInfo::from_upload(upload("9"))]);
        assert!(list.hidden_field().contains("\"id\":\"9\""));
        assert_eq!(list.selected_index(), Some(0));

        list.set_files(Vec::new());
        assert_eq!(list.hidden_field(), "[]");
        assert_eq!(list.selected_index(), None);
    }

    #[test]
    fn upload_requests_use_the_typed_path() {
        let mut list = FileUploadListState::new("project_files", Vec::new());
        assert!(list.request_upload().is_empty());
        assert!(list.error.is_some());

        list.upload_input.set_input(" /tmp/plan.pdf ");
        assert_eq!(list.request_upload(), vec![Effect::UploadFile(PathBuf::from("/tmp/plan.pdf"))]);
        assert_eq!(list.uploads_in_flight(), 1);
        assert!(list.upload_input.input().is_empty());

        list.upload_failed("disk full".to_string());
        assert_eq!(list.uploads_in_flight(), 0);
    }
}
