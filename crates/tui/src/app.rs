//! Application state shared by every component.
//!
//! Component state lives here rather than on the component values so the
//! focus tree, the runtime, and message handling can all reach it.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use civiclab_types::{Effect, FileInfo, Modal, Msg, ProjectDetails, Severity, TagCategory, TagDefinition};
use civiclab_util::{ContactMessenger, CurrentUser, FileStorage, Metrics, SiteLinks, TagCatalog, display_file_name};
use indexmap::IndexMap;
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::ui::components::common::ConfirmationModalState;
use crate::ui::components::contact::{ContactButtonState, ContactModalState};
use crate::ui::components::file_upload::FileUploadListState;
use crate::ui::components::selector::{CollapsibleSelectorState, SelectorProps};
use crate::ui::theme::Theme;

/// Categories offered as filter selectors, in display order.
pub const FILTER_CATEGORIES: [TagCategory; 3] = [TagCategory::Issues, TagCategory::TechnologiesUsed, TagCategory::Role];

/// Active tag filters keyed by tag name, in the order they were added.
pub type ActiveFilters = Rc<RefCell<IndexMap<String, TagDefinition>>>;

/// Cross-cutting context: theme and the collaborators behind their traits.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub session: Arc<dyn CurrentUser>,
    pub links: SiteLinks,
    pub metrics: Metrics,
    pub storage: Arc<dyn FileStorage>,
    pub contact: Arc<dyn ContactMessenger>,
}

impl std::fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCtx")
            .field("theme", &self.theme)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

/// Initial data the application is bound to.
#[derive(Debug, Clone, Default)]
pub struct AppData {
    pub catalog: TagCatalog,
    pub project: Option<ProjectDetails>,
    pub files: Vec<FileInfo>,
    pub file_field_id: String,
}

pub struct App {
    pub ctx: SharedCtx,
    /// One selector per filter category that has tags.
    pub selectors: Vec<CollapsibleSelectorState<TagDefinition>>,
    pub active_filters: ActiveFilters,
    pub project: Option<ProjectDetails>,
    pub contact_button: ContactButtonState,
    pub contact_modal: ContactModalState,
    pub file_list: FileUploadListState,
    pub confirmation_modal_state: ConfirmationModalState,
    pub open_modal_kind: Option<Modal>,
    /// Latest user-facing outcome, shown in the status line.
    pub status: Option<(Severity, String)>,
    /// Last link followed; the terminal cannot open it, so it is shown instead.
    pub last_navigation: Option<String>,
    pub focus: Focus,
    container_focus: FocusFlag,
}

impl App {
    pub fn new(ctx: SharedCtx, data: AppData) -> Self {
        let active_filters: ActiveFilters = Rc::default();
        let selectors = FILTER_CATEGORIES
            .iter()
            .map(|&category| tag_selector(category, data.catalog.by_category(category), &active_filters))
            .filter(|selector| selector.is_ready())
            .collect();

        let mut app = Self {
            ctx,
            selectors,
            active_filters,
            project: None,
            contact_button: ContactButtonState::new(),
            contact_modal: ContactModalState::default(),
            file_list: FileUploadListState::new(data.file_field_id, data.files),
            confirmation_modal_state: ConfirmationModalState::default(),
            open_modal_kind: None,
            status: None,
            last_navigation: None,
            focus: Focus::default(),
            container_focus: FocusFlag::new().with_name("app"),
        };
        app.set_project(data.project);
        app.focus = FocusBuilder::build_for(&app);
        app.focus.first();
        app
    }

    /// Bind a different project; the contact button is re-evaluated.
    pub fn set_project(&mut self, project: Option<ProjectDetails>) {
        self.project = project;
        self.refresh_contact_button();
    }

    pub fn refresh_contact_button(&mut self) {
        self.contact_button
            .refresh(self.ctx.session.as_ref(), self.project.as_ref(), &self.ctx.links);
    }

    /// Add `tag` to the active filters, or remove it if it is already active.
    /// Returns `true` when the tag was added. Only additions are reported to analytics.
    pub fn toggle_tag_filter(&mut self, tag: &TagDefinition) -> bool {
        let added = {
            let mut filters = self.active_filters.borrow_mut();
            if filters.shift_remove(&tag.tag_name).is_some() {
                false
            } else {
                filters.insert(tag.tag_name.clone(), tag.clone());
                true
            }
        };
        info!(tag = %tag.tag_name, category = %tag.category, added, "tag filter toggled");
        if added {
            self.ctx.metrics.add_tag_filter_event(tag);
        }
        added
    }

    pub fn active_filter_tags(&self) -> Vec<TagDefinition> {
        self.active_filters.borrow().values().cloned().collect()
    }

    /// Follow a link. There is no browser to hand it to, so it is logged and shown.
    pub fn navigate(&mut self, url: String) {
        info!(%url, "navigation requested");
        self.status = Some((Severity::Info, format!("Open {url}")));
        self.last_navigation = Some(url);
    }

    /// Close every selector except the one at `keep`.
    pub fn close_selectors_except(&mut self, keep: Option<usize>) {
        for (index, selector) in self.selectors.iter_mut().enumerate() {
            if Some(index) != keep && selector.is_open() {
                selector.close();
            }
        }
    }

    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick | Msg::Resize(..) => Vec::new(),
            Msg::ConfirmationAnswered(confirmed) => self.file_list.confirm_delete(*confirmed),
            Msg::FileUploaded(upload) => {
                self.status = Some((Severity::Success, format!("Uploaded {}", upload.file_name)));
                self.file_list.append_upload(upload.clone());
                Vec::new()
            }
            Msg::FileUploadFailed { path, error } => {
                let message = format!("Could not upload {}: {error}", display_file_name(path));
                warn!(path = %path.display(), %error, "upload failed");
                self.status = Some((Severity::Error, message.clone()));
                self.file_list.upload_failed(message);
                Vec::new()
            }
            Msg::FileDeleted(file) => {
                self.file_list.finish_delete(file);
                Vec::new()
            }
            Msg::FileDeleteFailed { file, error } => {
                warn!(key = %file.key, %error, "delete failed; restoring file");
                self.status = Some((Severity::Error, format!("Could not delete {}", file.file_name)));
                self.file_list.restore_failed_delete(file.clone(), error.clone());
                Vec::new()
            }
            Msg::ContactMessageSent { project_id } => {
                match self.ctx.session.user_id() {
                    Some(user_id) => self.ctx.metrics.log_user_contacted_project_owner(user_id, *project_id),
                    None => warn!(project_id, "contact message sent without a signed-in user"),
                }
                self.contact_modal.reset();
                self.status = Some((Severity::Success, "Message sent to the project owner".to_string()));
                if self.open_modal_kind == Some(Modal::ContactProject) {
                    vec![Effect::CloseModal]
                } else {
                    Vec::new()
                }
            }
            Msg::ContactMessageFailed { project_id, error } => {
                warn!(project_id, %error, "contact message failed");
                self.status = Some((Severity::Error, format!("Message not sent: {error}")));
                self.contact_modal.delivery_failed(error.clone());
                Vec::new()
            }
        }
    }
}

/// Build the selector for one tag category. Role tags carry subcategories and
/// therefore render as a two-level selector.
fn tag_selector(category: TagCategory, tags: Vec<TagDefinition>, active: &ActiveFilters) -> CollapsibleSelectorState<TagDefinition> {
    let active = Rc::clone(active);
    let props = SelectorProps::new(
        category.as_str(),
        |tag: &TagDefinition| tag.display_name.clone(),
        |tag: &TagDefinition| vec![Effect::TagFilterToggled(tag.clone())],
    )
    .with_category(|tag: &TagDefinition| tag.subcategory.clone())
    .with_enabled(move |tag: &TagDefinition| active.borrow().contains_key(&tag.tag_name));
    CollapsibleSelectorState::new(props, tags)
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        match self.open_modal_kind {
            Some(Modal::Confirmation) => {
                builder.widget(&self.confirmation_modal_state);
            }
            Some(Modal::ContactProject) => {
                builder.widget(&self.contact_modal);
            }
            None => {
                for selector in &self.selectors {
                    builder.widget(selector);
                }
                if self.contact_button.is_visible() {
                    builder.widget(&self.contact_button);
                }
                builder.widget(&self.file_list);
            }
        }
        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
