use civiclab_types::{Effect, Msg};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Borders, Paragraph, Wrap};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, block_with_severity, build_hint_spans, render_button};

const BUTTON_WIDTH: u16 = 12;
const BUTTON_SPACER: u16 = 2;

fn answer(value: bool) -> Vec<Effect> {
    vec![Effect::CloseModal, Effect::SendMsg(Msg::ConfirmationAnswered(value))]
}

#[derive(Default, Debug, Clone)]
pub struct ConfirmationModal {
    button_areas: Vec<Rect>,
}

impl Component for ConfirmationModal {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab | KeyCode::Right => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Left => {
                app.focus.prev();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char(' ') => match app.confirmation_modal_state.focused_button() {
                Some(button) => answer(button.answer),
                None => Vec::new(),
            },
            KeyCode::Char('y') | KeyCode::Char('Y') => answer(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => answer(false),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(column, row);
        self.button_areas
            .iter()
            .position(|area| area.contains(position))
            .and_then(|index| app.confirmation_modal_state.buttons().get(index))
            .map(|button| answer(button.answer))
            .unwrap_or_default()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let state = &app.confirmation_modal_state;
        let block = block_with_severity(theme, state.severity(), state.title());
        let inner = block.inner(rect);
        frame.render_widget(&block, rect);

        let [message_rect, _, button_rect, ..] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };

        if let Some(message) = state.message() {
            let lines: Vec<Line> = message.lines().map(|line| Line::from(Span::raw(line.to_string()))).collect();
            frame.render_widget(
                Paragraph::new(lines).style(theme.text_primary_style()).wrap(Wrap { trim: false }),
                message_rect,
            );
        }

        let mut button_areas = Vec::with_capacity(state.buttons().len());
        for (i, button) in state.buttons().iter().enumerate() {
            let offset = i as u16 * (BUTTON_WIDTH + BUTTON_SPACER);
            let area = Rect::new(button_rect.x + offset, button_rect.y, BUTTON_WIDTH, button_rect.height).intersection(button_rect);
            render_button(
                frame,
                area,
                &button.label,
                theme,
                ButtonRenderOptions::new(true, state.is_button_focused(i), false, Borders::ALL),
            );
            button_areas.push(area);
        }
        self.button_areas = button_areas;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(
            &*app.ctx.theme,
            &[("Tab/Shift+Tab", " Focus "), ("Enter", " Choose "), ("Y/N", " Answer "), ("Esc", " Cancel")],
        )
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let has_message = app.confirmation_modal_state.message().is_some();
        Layout::vertical([
            Constraint::Min(if has_message { 1 } else { 0 }), // Message
            Constraint::Length(1),                            // Spacer
            Constraint::Length(3),                            // Buttons
        ])
        .split(area)
        .to_vec()
    }
}
