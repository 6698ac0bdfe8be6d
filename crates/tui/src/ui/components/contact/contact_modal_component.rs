use civiclab_types::{Effect, Severity};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use rat_focus::FocusFlag;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, block, block_with_severity, build_hint_spans, input_style, render_button};

const BUTTON_WIDTH: u16 = 12;

/// Message composer for the project owner.
#[derive(Debug, Default, Clone)]
pub struct ContactModalComponent {
    message_area: Rect,
    send_area: Rect,
    cancel_area: Rect,
}

impl ContactModalComponent {
    fn send(app: &mut App) -> Vec<Effect> {
        match app.contact_button.project_id() {
            Some(project_id) => app.contact_modal.submit(project_id),
            None => Vec::new(),
        }
    }

    fn edit_message(app: &mut App, key: KeyEvent) {
        let input = &mut app.contact_modal.message;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert_char(c),
            KeyCode::Enter => input.insert_char('\n'),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        }
    }
}

impl Component for ContactModalComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Self::send(app);
        }
        match key.code {
            KeyCode::Esc => return vec![Effect::CloseModal],
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        let modal = &app.contact_modal;
        if modal.f_message.get() {
            // The draft is frozen until delivery reports back.
            if !modal.sending {
                Self::edit_message(app, key);
            }
            Vec::new()
        } else if modal.f_send.get() && matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            Self::send(app)
        } else if modal.f_cancel.get() && matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            vec![Effect::CloseModal]
        } else {
            Vec::new()
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(mouse.column, mouse.row);
        if self.send_area.contains(position) {
            Self::send(app)
        } else if self.cancel_area.contains(position) {
            vec![Effect::CloseModal]
        } else {
            if self.message_area.contains(position) {
                app.focus.focus(&app.contact_modal.f_message);
            }
            Vec::new()
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let modal = &app.contact_modal;
        let outer = block_with_severity(theme, Severity::Info, Some("Contact Project"));
        let inner = outer.inner(rect);
        frame.render_widget(&outer, rect);

        let [intro_rect, message_rect, status_rect, button_rect, ..] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };

        frame.render_widget(
            Paragraph::new("Send a message to the project owner. Enter adds a new line.").style(theme.text_secondary_style()),
            intro_rect,
        );

        let message_focused = modal.f_message.get();
        let message_block = block(theme, Some("Message"), message_focused);
        let message_inner = message_block.inner(message_rect);
        let lines: Vec<Line> = modal.message.input().split('\n').map(|line| Line::from(line.to_string())).collect();
        let (cursor_line, cursor_col) = modal.message.cursor_line_col();
        let scroll = (cursor_line as u16 + 1).saturating_sub(message_inner.height);
        frame.render_widget(
            Paragraph::new(lines)
                .style(input_style(theme, modal.error.is_none(), message_focused))
                .scroll((scroll, 0))
                .block(message_block),
            message_rect,
        );
        if message_focused {
            let x = message_inner.x + (cursor_col as u16).min(message_inner.width.saturating_sub(1));
            let y = message_inner.y + cursor_line as u16 - scroll;
            frame.set_cursor_position(Position::new(x, y));
        }

        let status = match (&modal.error, modal.sending) {
            (Some(error), _) => Some(Span::styled(error.as_str(), theme.status_style(Severity::Error))),
            (None, true) => Some(Span::styled("Sending\u{2026}", theme.status_style(Severity::Info))),
            (None, false) => None,
        };
        if let Some(status) = status {
            frame.render_widget(Paragraph::new(Line::from(status)).wrap(Wrap { trim: true }), status_rect);
        }

        let send_area = Rect::new(button_rect.x, button_rect.y, BUTTON_WIDTH, button_rect.height).intersection(button_rect);
        let cancel_area = Rect::new(button_rect.x + BUTTON_WIDTH + 2, button_rect.y, BUTTON_WIDTH, button_rect.height).intersection(button_rect);
        let button = |frame: &mut Frame, area: Rect, label: &str, flag: &FocusFlag, enabled: bool| {
            render_button(frame, area, label, theme, ButtonRenderOptions::new(enabled, flag.get(), false, Borders::ALL));
        };
        button(frame, send_area, "Send", &modal.f_send, !modal.sending);
        button(frame, cancel_area, "Cancel", &modal.f_cancel, true);

        self.message_area = message_rect;
        self.send_area = send_area;
        self.cancel_area = cancel_area;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(
            &*app.ctx.theme,
            &[("Tab/Shift+Tab", " Focus "), ("Ctrl+S", " Send "), ("Esc", " Cancel")],
        )
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Length(1), // Intro
            Constraint::Min(3),    // Message editor
            Constraint::Length(1), // Error / sending
            Constraint::Length(3), // Buttons
        ])
        .split(area)
        .to_vec()
    }
}
