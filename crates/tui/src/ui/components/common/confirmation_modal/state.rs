use civiclab_types::Severity;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

/// A button in the confirmation modal and the answer it stands for.
#[derive(Debug, Clone)]
pub struct ModalButton {
    pub label: String,
    pub answer: bool,
    pub focus: FocusFlag,
}

impl ModalButton {
    pub fn new(label: impl Into<String>, answer: bool) -> Self {
        let label = label.into();
        let focus = FocusFlag::new().with_name(&format!("confirmation.{label}"));
        Self { label, answer, focus }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfirmationModalOpts {
    pub title: Option<String>,
    pub message: Option<String>,
    pub severity: Option<Severity>,
    pub buttons: Vec<ModalButton>,
}

impl ConfirmationModalOpts {
    /// Yes/No question; "No" comes first so an accidental Enter does not confirm.
    pub fn yes_no(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: Some(title.into()),
            message: Some(message.into()),
            severity: Some(severity),
            buttons: vec![ModalButton::new("No", false), ModalButton::new("Yes", true)],
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfirmationModalState {
    title: Option<String>,
    message: Option<String>,
    buttons: Vec<ModalButton>,
    severity: Option<Severity>,

    container_focus: FocusFlag,
}

impl ConfirmationModalState {
    pub fn update_opts(&mut self, opts: ConfirmationModalOpts) {
        self.title = opts.title;
        self.message = opts.message;
        self.severity = opts.severity;
        self.buttons = opts.buttons;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity.unwrap_or_default()
    }

    pub fn buttons(&self) -> &[ModalButton] {
        &self.buttons
    }

    pub fn focused_button(&self) -> Option<&ModalButton> {
        self.buttons.iter().find(|button| button.focus.get())
    }

    pub fn is_button_focused(&self, idx: usize) -> bool {
        self.buttons.get(idx).is_some_and(|b| b.focus.get())
    }
}

impl HasFocus for ConfirmationModalState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        for button in &self.buttons {
            builder.leaf_widget(&button.focus);
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
