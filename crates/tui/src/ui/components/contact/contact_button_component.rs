use civiclab_types::Effect;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::Span,
    widgets::{Borders, Paragraph, Wrap},
};

use super::state::ContactButtonView;
use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, build_hint_spans, render_button};

/// The contact/sign-in/edit button with its explanatory title underneath.
#[derive(Debug, Default, Clone)]
pub struct ContactButtonComponent {
    button_area: Rect,
}

impl Component for ContactButtonComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => app.contact_button.activate(),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !self.button_area.contains(Position::new(mouse.column, mouse.row)) {
            return Vec::new();
        }
        app.focus.focus(&app.contact_button.focus);
        app.contact_button.activate()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let view = app.contact_button.view();
        if matches!(view, ContactButtonView::Hidden) {
            self.button_area = Rect::default();
            return;
        }
        let theme = &*app.ctx.theme;
        let [button_rect, title_rect, ..] = self.get_preferred_layout(app, rect)[..] else {
            return;
        };

        render_button(
            frame,
            button_rect,
            view.label(),
            theme,
            ButtonRenderOptions::new(view.is_enabled(), app.contact_button.focus.get(), false, Borders::ALL),
        );
        if let Some(title) = view.title() {
            frame.render_widget(Paragraph::new(title).style(theme.text_muted_style()).wrap(Wrap { trim: true }), title_rect);
        }

        self.button_area = button_rect;
        app.contact_button.set_area(button_rect);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let action = match app.contact_button.view() {
            ContactButtonView::SignIn { .. } => " Sign in ",
            ContactButtonView::EditProject { .. } => " Edit project ",
            ContactButtonView::ContactProject { .. } => " Write to owner ",
            ContactButtonView::Hidden => return Vec::new(),
        };
        build_hint_spans(&*app.ctx.theme, &[("Enter", action)])
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let width = (app.contact_button.view().label().len() as u16 + 6).min(area.width);
        let rows = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).split(area);
        vec![Rect { width, ..rows[0] }, rows[1]]
    }
}
