use civiclab_types::{Effect, Severity};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{block, build_hint_spans, input_style};

const DELETE_LABEL: &str = "[delete]";

/// Upload input, the attached files, and the hidden form value.
#[derive(Debug, Default, Clone)]
pub struct FileUploadComponent {
    upload_area: Rect,
    /// (row, delete marker) per visible file, in list order.
    row_areas: Vec<(Rect, Rect, usize)>,
}

impl Component for FileUploadComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let App {
            file_list,
            confirmation_modal_state,
            ..
        } = app;

        if file_list.f_upload.get() {
            let input = &mut file_list.upload_input;
            match key.code {
                KeyCode::Enter => return file_list.request_upload(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert_char(c),
                KeyCode::Backspace => input.backspace(),
                KeyCode::Delete => input.delete(),
                KeyCode::Left => input.move_left(),
                KeyCode::Right => input.move_right(),
                KeyCode::Home => input.move_home(),
                KeyCode::End => input.move_end(),
                KeyCode::Esc => input.clear(),
                _ => {}
            }
            return Vec::new();
        }

        if file_list.f_list.get() {
            match key.code {
                KeyCode::Down => file_list.select_next(),
                KeyCode::Up => file_list.select_previous(),
                KeyCode::Delete | KeyCode::Char('d') => return file_list.ask_to_delete_selected(confirmation_modal_state),
                KeyCode::Enter => {
                    if let Some(file) = file_list.selected_index().and_then(|i| file_list.files().get(i)) {
                        return vec![Effect::Navigate(file.public_url.clone())];
                    }
                }
                _ => {}
            }
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(mouse.column, mouse.row);
        if self.upload_area.contains(position) {
            app.focus.focus(&app.file_list.f_upload);
            return Vec::new();
        }
        let Some(&(_, delete_area, index)) = self.row_areas.iter().find(|(row, ..)| row.contains(position)) else {
            return Vec::new();
        };
        app.focus.focus(&app.file_list.f_list);
        app.file_list.list_state_mut().select(Some(index));
        if delete_area.contains(position) {
            let App {
                file_list,
                confirmation_modal_state,
                ..
            } = app;
            return file_list.ask_to_delete_selected(confirmation_modal_state);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let layout = self.get_preferred_layout(app, rect);
        let App { file_list, ctx, .. } = app;
        let theme = &*ctx.theme;
        let focused = file_list.f_upload.get() || file_list.f_list.get();
        let outer = block(theme, Some("Project Files"), focused);
        frame.render_widget(outer, rect);

        let [upload_rect, status_rect, list_rect, hidden_rect, ..] = layout[..] else {
            return;
        };

        // Upload input
        let upload_focused = file_list.f_upload.get();
        let upload_block = block(theme, Some("Add file (path)"), upload_focused);
        let upload_inner = upload_block.inner(upload_rect);
        frame.render_widget(
            Paragraph::new(file_list.upload_input.input()).style(input_style(theme, true, upload_focused)).block(upload_block),
            upload_rect,
        );
        if upload_focused {
            let (_, col) = file_list.upload_input.cursor_line_col();
            frame.set_cursor_position(Position::new(
                upload_inner.x + (col as u16).min(upload_inner.width.saturating_sub(1)),
                upload_inner.y,
            ));
        }
        self.upload_area = upload_rect;

        // Status: error or uploads in progress
        let status = match (&file_list.error, file_list.uploads_in_flight()) {
            (Some(error), _) => Some(Span::styled(error.clone(), theme.status_style(Severity::Error))),
            (None, 0) => None,
            (None, n) => Some(Span::styled(format!("Uploading {n} file(s)\u{2026}"), theme.status_style(Severity::Info))),
        };
        if let Some(status) = status {
            frame.render_widget(Paragraph::new(Line::from(status)), status_rect);
        }

        // Files
        let list_focused = file_list.f_list.get();
        let items: Vec<ListItem> = if file_list.files().is_empty() {
            vec![ListItem::new(Span::styled("No files attached", theme.text_muted_style()))]
        } else {
            file_list
                .files()
                .iter()
                .map(|file| {
                    ListItem::new(Line::from(vec![
                        Span::styled(DELETE_LABEL, theme.status_style(Severity::Error)),
                        Span::raw(" "),
                        Span::styled(file.file_name.clone(), theme.accent_style()),
                        Span::raw("  "),
                        Span::styled(file.public_url.clone(), theme.text_muted_style()),
                    ]))
                })
                .collect()
        };
        let list_block = block(theme, Some("Attached"), list_focused);
        let list_inner = list_block.inner(list_rect);
        let list = List::new(items)
            .block(list_block)
            .highlight_style(if list_focused { theme.selection_style() } else { theme.text_primary_style() });
        frame.render_stateful_widget(list, list_rect, file_list.list_state_mut());

        let offset = file_list.list_offset();
        self.row_areas = (offset..file_list.files().len())
            .take(list_inner.height as usize)
            .enumerate()
            .map(|(line, index)| {
                let row = Rect::new(list_inner.x, list_inner.y + line as u16, list_inner.width, 1);
                let delete = Rect { width: DELETE_LABEL.len() as u16, ..row };
                (row, delete.intersection(row), index)
            })
            .collect();

        // Hidden form value
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{} = ", file_list.element_id()), theme.text_secondary_style()),
                Span::styled(file_list.hidden_field().to_string(), theme.text_muted_style()),
            ])),
            hidden_rect,
        );
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let hints: &[(&str, &str)] = if app.file_list.f_upload.get() {
            &[("Enter", " Upload "), ("Esc", " Clear ")]
        } else {
            &[("\u{2191}/\u{2193}", " Select "), ("Enter", " Open "), ("Del/d", " Delete ")]
        };
        build_hint_spans(&*app.ctx.theme, hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };
        Layout::vertical([
            Constraint::Length(3), // Upload input
            Constraint::Length(1), // Status
            Constraint::Min(3),    // Files
            Constraint::Length(1), // Hidden field
        ])
        .split(inner)
        .to_vec()
    }
}
