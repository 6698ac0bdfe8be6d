use civiclab_types::{Effect, Modal, Msg, Severity};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    prelude::*,
    widgets::{Block, Clear, Paragraph, Wrap},
};

use super::components::Component;
use super::components::common::ConfirmationModal;
use super::components::contact::{ContactButtonComponent, ContactModalComponent};
use super::components::file_upload::FileUploadComponent;
use super::components::selector::SelectorComponent;
use super::theme::theme_helpers as th;
use super::utils::centered_min_max;
use crate::app::App;

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

impl std::fmt::Debug for ModalLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModalLayout")
    }
}

type ModalView = (Box<dyn Component>, ModalLayout);

const SELECTOR_GAP: u16 = 2;

/// Root component: lays out the filter bar, the project panel and the file
/// list, routes input to whichever part has focus, and hosts modals.
pub struct MainView {
    selector_views: Vec<SelectorComponent>,
    contact_view: ContactButtonComponent,
    file_view: FileUploadComponent,
    /// Currently open modal component
    pub modal_view: Option<ModalView>,
    /// the widget_id of the focus just before a modal is opened
    transient_focus_id: Option<usize>,
}

impl MainView {
    pub fn new(app: &App) -> Self {
        Self {
            selector_views: (0..app.selectors.len()).map(SelectorComponent::new).collect(),
            contact_view: ContactButtonComponent::default(),
            file_view: FileUploadComponent::default(),
            modal_view: None,
            transient_focus_id: None,
        }
    }

    /// Update the open modal kind (use None to clear).
    /// Not meant to be called directly; return `Effect::ShowModal`/`Effect::CloseModal` instead.
    pub fn set_open_modal_kind(&mut self, app: &mut App, modal: Option<Modal>) {
        if let Some(modal_kind) = modal.as_ref() {
            let modal_view: ModalView = match modal_kind {
                Modal::Confirmation => (
                    Box::new(ConfirmationModal::default()),
                    ModalLayout(Box::new(|rect| {
                        centered_min_max(45, 35, Rect::new(0, 0, 50, 10), Rect::new(0, 0, 80, 12), rect)
                    })),
                ),
                Modal::ContactProject => {
                    app.contact_modal.open();
                    (
                        Box::new(ContactModalComponent::default()),
                        ModalLayout(Box::new(|rect| {
                            centered_min_max(60, 60, Rect::new(0, 0, 50, 14), Rect::new(0, 0, 100, 24), rect)
                        })),
                    )
                }
            };
            app.close_selectors_except(None);
            self.modal_view = Some(modal_view);
            // save the current focus to restore when the modal is closed
            if app.open_modal_kind.is_none() {
                self.transient_focus_id = app.focus.focused().map(|focus| focus.widget_id());
            }
        } else {
            self.modal_view = None;
        }
        app.open_modal_kind = modal;
    }

    pub fn restore_focus(&mut self, app: &mut App) {
        if let Some(id) = self.transient_focus_id
            && app.open_modal_kind.is_none()
        {
            app.focus.by_widget_id(id);
            self.transient_focus_id = None;
        } else {
            app.focus.first();
        }
    }

    fn focused_selector(&self, app: &App) -> Option<usize> {
        app.selectors.iter().position(|selector| selector.focus.get())
    }

    fn render_filter_bar(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let mut x = area.x;
        for view in &mut self.selector_views {
            let Some(state) = app.selectors.get(view.index()) else {
                continue;
            };
            let width = state.title().chars().count() as u16 + 4;
            let header = Rect::new(x, area.y, width, 1).intersection(area);
            view.render(frame, header, app);
            x = x.saturating_add(width + SELECTOR_GAP);
        }
    }

    fn render_active_filters(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let tags = app.active_filter_tags();
        let line = if tags.is_empty() {
            Line::from(Span::styled("No filters selected", theme.text_muted_style()))
        } else {
            let mut spans = vec![Span::styled("Filters: ", theme.text_secondary_style())];
            for tag in tags {
                spans.push(Span::styled(format!(" {} ", tag.display_name), th::badge_style(theme)));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_project_panel(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let focused = app.contact_button.focus.get();
        let outer = th::block(&*app.ctx.theme, Some("Project"), focused);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let [details_rect, button_rect] = Layout::vertical([Constraint::Min(1), Constraint::Length(5)]).areas(inner);
        let theme = &*app.ctx.theme;
        let session = &app.ctx.session;
        let mut lines = match &app.project {
            Some(project) => vec![
                Line::from(Span::styled(project.project_name.clone(), theme.accent_bold_style())),
                Line::from(Span::styled(format!("Project #{}", project.project_id), theme.text_secondary_style())),
                Line::from(if project.project_claimed {
                    Span::styled("Claimed by its owner", theme.status_style(Severity::Success))
                } else {
                    Span::styled("Not claimed yet", theme.status_style(Severity::Warning))
                }),
            ],
            None => vec![Line::from(Span::styled("No project selected", theme.text_muted_style()))],
        };
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            match (session.is_logged_in(), session.user_id(), session.is_email_verified()) {
                (false, ..) => "Not signed in".to_string(),
                (true, Some(id), true) => format!("Signed in as user {id}"),
                (true, Some(id), false) => format!("Signed in as user {id} (email not verified)"),
                (true, None, _) => "Signed in".to_string(),
            },
            theme.text_muted_style(),
        )));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), details_rect);

        self.contact_view.render(frame, button_rect, app);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        if let Some((severity, message)) = &app.status {
            frame.render_widget(
                Paragraph::new(Span::styled(message.as_str(), th::severity_style(theme, *severity))),
                area,
            );
        }
    }

    /// Route a left click to an open selector flyout, or close flyouts the click missed.
    fn route_selector_click(&mut self, app: &mut App, mouse: MouseEvent) -> Option<Vec<Effect>> {
        let position = Position::new(mouse.column, mouse.row);
        let hit = app.selectors.iter().position(|selector| selector.hit_test(position).is_some());
        match hit {
            Some(index) => {
                let effects = self.selector_views[index].handle_mouse_events(app, mouse);
                app.close_selectors_except(Some(index));
                Some(effects)
            }
            None => {
                app.close_selectors_except(None);
                None
            }
        }
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(&msg)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if let Some(target) = self.modal_view.as_mut() {
            return target.0.handle_key_events(app, key);
        }

        match key.code {
            KeyCode::Tab => {
                app.close_selectors_except(None);
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.close_selectors_except(None);
                app.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        if let Some(index) = self.focused_selector(app) {
            let effects = self.selector_views[index].handle_key_events(app, key);
            if app.selectors[index].is_open() {
                app.close_selectors_except(Some(index));
            }
            return effects;
        }

        if app.contact_button.focus.get() {
            return self.contact_view.handle_key_events(app, key);
        }

        if app.file_list.f_upload.get() || app.file_list.f_list.get() {
            return self.file_view.handle_key_events(app, key);
        }

        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if let Some(target) = self.modal_view.as_mut() {
            return target.0.handle_mouse_events(app, mouse);
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        if let Some(effects) = self.route_selector_click(app, mouse) {
            return effects;
        }

        let mut effects = self.contact_view.handle_mouse_events(app, mouse);
        effects.extend(self.file_view.handle_mouse_events(app, mouse));
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        let [title, filter_bar, active_filters, project, files, status, hints, ..] = layout[..] else {
            return;
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("civiclab", app.ctx.theme.accent_bold_style()),
                Span::styled("  find a project, get in touch", app.ctx.theme.text_muted_style()),
            ])),
            title,
        );
        self.render_filter_bar(frame, filter_bar, app);
        self.render_active_filters(frame, active_filters, app);
        self.render_project_panel(frame, project, app);
        self.file_view.render(frame, files, app);
        self.render_status(frame, status, app);

        let hint_spans: Vec<Span> = self.get_hint_spans(app);
        frame.render_widget(Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style()), hints);

        // Flyouts float over everything but modals.
        let flyout_bounds = Rect {
            height: hints.y.saturating_sub(area.y),
            ..area
        };
        for view in &mut self.selector_views {
            view.render_flyout(frame, flyout_bounds, app);
        }

        if let Some((modal, position)) = self.modal_view.as_mut() {
            render_overlay(frame, app);
            let modal_area = position.0(area);
            frame.render_widget(Clear, modal_area);

            let modal_hints = modal.get_hint_spans(app);
            if !modal_hints.is_empty() {
                let splits = Layout::vertical([
                    Constraint::Percentage(100), // Modal
                    Constraint::Length(1),       // Modal hints bar
                ])
                .split(modal_area);
                let hints_widget = Paragraph::new(Line::from(modal_hints))
                    .style(app.ctx.theme.text_muted_style())
                    .bg(app.ctx.theme.roles().background);
                frame.render_widget(hints_widget, splits[1]);
                modal.render(frame, splits[0], app);
            } else {
                modal.render(frame, modal_area, app);
            }
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];

        if let Some(index) = self.focused_selector(app) {
            hint_spans.extend(self.selector_views[index].get_hint_spans(app));
        } else if app.contact_button.focus.get() {
            hint_spans.extend(self.contact_view.get_hint_spans(app));
        } else if app.file_list.f_upload.get() || app.file_list.f_list.get() {
            hint_spans.extend(self.file_view.get_hint_spans(app));
        }

        hint_spans.extend(th::build_hint_spans(
            &*app.ctx.theme,
            &[(" Tab/Shift+Tab", " Focus "), ("Ctrl+C", " Quit ")],
        ));
        hint_spans
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let rows = Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Filter bar
            Constraint::Length(1), // Active filters
            Constraint::Min(8),    // Body
            Constraint::Length(1), // Status
            Constraint::Length(1), // Hints
        ])
        .split(area);
        let body = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).split(rows[3]);

        vec![
            rows[0], // Title
            rows[1], // Filter bar
            rows[2], // Active filters
            body[0], // Project + contact button
            body[1], // Files
            rows[4], // Status
            rows[5], // Hints
        ]
    }
}

/// Dims everything behind an open modal.
fn render_overlay(frame: &mut Frame, app: &App) {
    frame.render_widget(Block::default().style(app.ctx.theme.overlay_style()).dim(), frame.area());
}
