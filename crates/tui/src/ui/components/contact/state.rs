//! Contact button policy and the contact modal's editing state.

use civiclab_types::{Effect, Modal, ProjectDetails, Section};
use civiclab_util::{CurrentUser, SiteLinks};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::debug;

use crate::ui::components::common::TextInputState;

pub const SIGN_IN_TITLE: &str = "Please sign up or log in to contact project owner";
pub const VERIFY_EMAIL_TITLE: &str = "Please verify your email address before contacting project owner";
pub const UNCLAIMED_TITLE: &str = "This project has not yet been claimed by its owner";

/// What the contact button renders for the current session and project.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContactButtonView {
    /// No project bound.
    #[default]
    Hidden,
    /// Anonymous visitors get a link to the login page.
    SignIn { href: String, title: &'static str },
    /// Owners edit instead of contacting themselves.
    EditProject {
        href: String,
        disabled: bool,
        title: Option<&'static str>,
    },
    ContactProject { disabled: bool, title: Option<&'static str> },
}

impl ContactButtonView {
    /// Evaluate the policy table.
    ///
    /// Email verification is checked before the claimed flag, and both apply
    /// to owners and visitors alike; the owner check only picks the control.
    pub fn evaluate(session: &dyn CurrentUser, project: Option<&ProjectDetails>, links: &SiteLinks) -> Self {
        let Some(project) = project else {
            return Self::Hidden;
        };
        if !session.is_logged_in() {
            return Self::SignIn {
                href: links.login(),
                title: SIGN_IN_TITLE,
            };
        }

        let blocked_by = if !session.is_email_verified() {
            Some(VERIFY_EMAIL_TITLE)
        } else if !project.project_claimed {
            Some(UNCLAIMED_TITLE)
        } else {
            None
        };

        if session.user_id() == Some(project.project_creator) {
            let id = project.project_id.to_string();
            Self::EditProject {
                href: links.section(Section::EditProject, &[("id", &id)]),
                disabled: blocked_by.is_some(),
                title: blocked_by,
            }
        } else {
            Self::ContactProject {
                disabled: blocked_by.is_some(),
                title: blocked_by,
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hidden => "",
            Self::SignIn { .. } => "Sign in to Contact Project",
            Self::EditProject { .. } => "Edit Project",
            Self::ContactProject { .. } => "Contact Project",
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            Self::Hidden => None,
            Self::SignIn { title, .. } => Some(*title),
            Self::EditProject { title, .. } | Self::ContactProject { title, .. } => *title,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Hidden => false,
            Self::SignIn { .. } => true,
            Self::EditProject { disabled, .. } | Self::ContactProject { disabled, .. } => !disabled,
        }
    }

    /// Only the contact variant owns a message modal.
    pub fn has_contact_modal(&self) -> bool {
        matches!(self, Self::ContactProject { .. })
    }
}

#[derive(Debug, Default, Clone)]
pub struct ContactButtonState {
    view: ContactButtonView,
    project_id: Option<u64>,
    pub focus: FocusFlag,
    area: Rect,
}

impl ContactButtonState {
    pub fn new() -> Self {
        Self {
            focus: FocusFlag::new().with_name("contact.button"),
            ..Self::default()
        }
    }

    /// Recompute the view; called whenever the project record or the session changes.
    pub fn refresh(&mut self, session: &dyn CurrentUser, project: Option<&ProjectDetails>, links: &SiteLinks) {
        self.view = ContactButtonView::evaluate(session, project, links);
        self.project_id = project.map(|p| p.project_id);
        debug!(view = ?self.view, "contact button refreshed");
    }

    pub fn view(&self) -> &ContactButtonView {
        &self.view
    }

    pub fn project_id(&self) -> Option<u64> {
        self.project_id
    }

    pub fn is_visible(&self) -> bool {
        self.view != ContactButtonView::Hidden
    }

    /// Press the button. Disabled buttons do nothing.
    pub fn activate(&self) -> Vec<Effect> {
        if !self.view.is_enabled() {
            return Vec::new();
        }
        match &self.view {
            ContactButtonView::SignIn { href, .. } | ContactButtonView::EditProject { href, .. } => vec![Effect::Navigate(href.clone())],
            ContactButtonView::ContactProject { .. } => vec![Effect::ShowModal(Modal::ContactProject)],
            ContactButtonView::Hidden => Vec::new(),
        }
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }
}

impl HasFocus for ContactButtonState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.area
    }
}

/// Editing state for the contact modal.
#[derive(Debug, Clone)]
pub struct ContactModalState {
    pub message: TextInputState,
    pub error: Option<String>,
    /// Set while a message is being delivered.
    pub sending: bool,
    pub f_message: FocusFlag,
    pub f_send: FocusFlag,
    pub f_cancel: FocusFlag,
    container_focus: FocusFlag,
}

impl Default for ContactModalState {
    fn default() -> Self {
        Self {
            message: TextInputState::new(),
            error: None,
            sending: false,
            f_message: FocusFlag::new().with_name("contact.message"),
            f_send: FocusFlag::new().with_name("contact.send"),
            f_cancel: FocusFlag::new().with_name("contact.cancel"),
            container_focus: FocusFlag::new().with_name("contact.modal"),
        }
    }
}

impl ContactModalState {
    pub fn reset(&mut self) {
        self.message.clear();
        self.error = None;
        self.sending = false;
    }

    /// Called when the modal opens. A delivery still in flight keeps its draft
    /// and its guard against a second submit.
    pub fn open(&mut self) {
        if !self.sending {
            self.reset();
        }
    }

    /// Validate and hand the message to the runtime for delivery.
    pub fn submit(&mut self, project_id: u64) -> Vec<Effect> {
        if self.sending {
            return Vec::new();
        }
        if self.message.is_blank() {
            self.error = Some("Please enter a message".to_string());
            return Vec::new();
        }
        self.error = None;
        self.sending = true;
        vec![Effect::SendContactMessage {
            project_id,
            message: self.message.input().trim().to_string(),
        }]
    }

    pub fn delivery_failed(&mut self, error: String) {
        self.sending = false;
        self.error = Some(error);
    }
}

impl HasFocus for ContactModalState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        builder.leaf_widget(&self.f_message);
        builder.leaf_widget(&self.f_send);
        builder.leaf_widget(&self.f_cancel);
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
    use civiclab_util::SessionSnapshot;

    use super::*;

    const OWNER: u64 = 11;
    const VISITOR: u64 = 42;

    fn links() -> SiteLinks {
        SiteLinks::new("https://civic.example.org").expect("valid base")
    }

    fn project(claimed: bool) -> ProjectDetails {
        ProjectDetails {
            project_id: 7,
            project_name: "Food Rescue".to_string(),
            project_creator: OWNER,
            project_claimed: claimed,
        }
    }

    fn view(session: SessionSnapshot, claimed: bool) -> ContactButtonView {
        ContactButtonView::evaluate(&session, Some(&project(claimed)), &links())
    }

    #[test]
    fn anonymous_visitors_get_an_enabled_sign_in_link() {
        let view = view(SessionSnapshot::anonymous(), true);
        assert_eq!(
            view,
            ContactButtonView::SignIn {
                href: "https://civic.example.org/login".to_string(),
                title: SIGN_IN_TITLE,
            }
        );
        assert!(view.is_enabled());
        assert!(!view.has_contact_modal());
        assert_eq!(view.label(), "Sign in to Contact Project");
    }

    #[test]
    fn unverified_email_disables_contact() {
        let view = view(SessionSnapshot::signed_in(VISITOR, false), true);
        assert_eq!(
            view,
            ContactButtonView::ContactProject {
                disabled: true,
                title: Some(VERIFY_EMAIL_TITLE)
            }
        );
    }

    #[test]
    fn unclaimed_project_disables_contact() {
        let view = view(SessionSnapshot::signed_in(VISITOR, true), false);
        assert_eq!(
            view,
            ContactButtonView::ContactProject {
                disabled: true,
                title: Some(UNCLAIMED_TITLE)
            }
        );
    }

    #[test]
    fn verified_visitor_on_claimed_project_can_contact() {
        let view = view(SessionSnapshot::signed_in(VISITOR, true), true);
        assert_eq!(view, ContactButtonView::ContactProject { disabled: false, title: None });
        assert!(view.is_enabled());
        assert!(view.has_contact_modal());
    }

    #[test]
    fn owners_get_an_edit_link_gated_by_the_same_rules() {
        let open = view(SessionSnapshot::signed_in(OWNER, true), true);
        assert_eq!(
            open,
            ContactButtonView::EditProject {
                href: "https://civic.example.org/index/?section=EditProject&id=7".to_string(),
                disabled: false,
                title: None,
            }
        );

        let unverified = view(SessionSnapshot::signed_in(OWNER, false), true);
        assert!(!unverified.is_enabled());
        assert_eq!(unverified.title(), Some(VERIFY_EMAIL_TITLE));
    }

    #[test]
    fn missing_project_hides_the_button() {
        let view = ContactButtonView::evaluate(&SessionSnapshot::signed_in(VISITOR, true), None, &links());
        assert_eq!(view, ContactButtonView::Hidden);
    }

    #[test]
    fn activation_follows_the_view() {
        let mut button = ContactButtonState::new();
        button.refresh(&SessionSnapshot::signed_in(VISITOR, true), Some(&project(true)), &links());
        assert_eq!(button.activate(), vec![Effect::ShowModal(Modal::ContactProject)]);

        button.refresh(&SessionSnapshot::signed_in(VISITOR, true), Some(&project(false)), &links());
        assert!(button.activate().is_empty());

        button.refresh(&SessionSnapshot::anonymous(), Some(&project(true)), &links());
        assert_eq!(button.activate(), vec![Effect::Navigate("https://civic.example.org/login".to_string())]);
    }

    #[test]
    fn blank_messages_are_not_submitted() {
        let mut modal = ContactModalState::default();
        modal.message.set_input("   ");
        assert!(modal.submit(7).is_empty());
        assert!(modal.error.is_some());

        modal.message.set_input(" Count me in \n");
        assert_eq!(
            modal.submit(7),
            vec![Effect::SendContactMessage {
                project_id: 7,
                message: "Count me in".to_string()
            }]
        );
        assert!(modal.sending);
        assert!(modal.submit(7).is_empty(), "no double submit while sending");

        modal.delivery_failed("timeout".to_string());
        assert!(!modal.sending);
        assert_eq!(modal.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn reopening_keeps_an_undelivered_message() {
        let mut modal = ContactModalState::default();
        modal.message.set_input("Count me in");
        assert_eq!(modal.submit(7).len(), 1);

        modal.open();
        assert!(modal.sending);
        assert_eq!(modal.message.input(), "Count me in");
        assert!(modal.submit(7).is_empty());

        modal.delivery_failed("timeout".to_string());
        modal.open();
        assert!(modal.message.input().is_empty());
        assert!(modal.error.is_none());
    }
}
