use civiclab_types::{Effect, TagDefinition};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::state::{CHEVRON_DOWN, CHEVRON_RIGHT, CollapsibleSelectorState, SELECTOR_WIDTH, SelectorMode, SelectorRow};
use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{block, build_hint_spans, flyout_style};

/// Renders and drives one of the tag selectors on [`App`].
///
/// The header is drawn in the filter bar by [`Component::render`]; the open
/// flyout is drawn afterwards by [`SelectorComponent::render_flyout`] so it
/// floats above the rest of the view.
#[derive(Debug, Clone)]
pub struct SelectorComponent {
    index: usize,
}

impl SelectorComponent {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn state_mut<'a>(&self, app: &'a mut App) -> Option<&'a mut CollapsibleSelectorState<TagDefinition>> {
        app.selectors.get_mut(self.index)
    }

    /// Draw the open flyout (and the expanded category's panel) inside `bounds`.
    pub fn render_flyout(&mut self, frame: &mut Frame, bounds: Rect, app: &mut App) {
        let App { selectors, ctx, .. } = app;
        let Some(state) = selectors.get_mut(self.index) else {
            return;
        };
        if !state.is_open() {
            state.set_row_areas(Vec::new());
            return;
        }
        let Some(origin) = state.flyout_origin(bounds) else {
            return;
        };
        let theme = &*ctx.theme;
        let focused = state.focus.get();
        let cursor = if focused { state.cursor_row() } else { None };

        let top_rows: Vec<SelectorRow> = match state.mode() {
            SelectorMode::NotReady => Vec::new(),
            SelectorMode::Flat(indices) => indices.iter().copied().map(SelectorRow::Option).collect(),
            SelectorMode::Categorized(groups) => groups.iter().map(|g| SelectorRow::Category(g.name.clone())).collect(),
        };

        // Keep the expanded header on screen while the cursor is inside its panel.
        let anchor = cursor
            .clone()
            .filter(|row| top_rows.contains(row))
            .or_else(|| state.expanded_category().map(|name| SelectorRow::Category(name.to_string())));

        let mut row_areas = Vec::new();
        let top_areas = render_panel(frame, bounds, origin, state, &top_rows, cursor.as_ref(), anchor.as_ref(), theme);
        state.forget_category_positions();
        for (area, row) in &top_areas {
            if let SelectorRow::Category(name) = row {
                state.record_category_position(name, *area);
            }
        }
        row_areas.extend(top_areas);

        if let Some(expanded) = state.expanded_category().map(str::to_string)
            && let Some(group) = state.category_groups().iter().find(|g| g.name == expanded)
            && let Some(mut sub_origin) = state.category_flyout_origin(&expanded, bounds)
        {
            let sub_rows: Vec<SelectorRow> = group.options.iter().copied().map(SelectorRow::Option).collect();
            sub_origin.y = sub_origin
                .y
                .min(bounds.bottom().saturating_sub(sub_rows.len() as u16 + 2))
                .max(bounds.y);
            row_areas.extend(render_panel(
                frame,
                bounds,
                sub_origin,
                state,
                &sub_rows,
                cursor.as_ref(),
                cursor.as_ref(),
                theme,
            ));
        }

        state.set_row_areas(row_areas);
    }
}

/// Draw one bordered panel of rows at `origin`, scrolled so `anchor` stays
/// visible. Returns the rectangle of every drawn row.
#[allow(clippy::too_many_arguments)]
fn render_panel(
    frame: &mut Frame,
    bounds: Rect,
    origin: Position,
    state: &CollapsibleSelectorState<TagDefinition>,
    rows: &[SelectorRow],
    cursor: Option<&SelectorRow>,
    anchor: Option<&SelectorRow>,
    theme: &dyn Theme,
) -> Vec<(Rect, SelectorRow)> {
    let height = (rows.len() as u16 + 2).min(bounds.bottom().saturating_sub(origin.y));
    let width = SELECTOR_WIDTH.min(bounds.right().saturating_sub(origin.x));
    let area = Rect::new(origin.x, origin.y, width, height);
    if area.height < 3 || area.width < 4 {
        return Vec::new();
    }

    frame.render_widget(Clear, area);
    let panel = block(theme, None, state.focus.get()).style(flyout_style(theme));
    let inner = panel.inner(area);
    frame.render_widget(panel, area);

    let capacity = inner.height as usize;
    let anchor_position = anchor.and_then(|a| rows.iter().position(|row| row == a));
    let offset = anchor_position.map_or(0, |pos| (pos + 1).saturating_sub(capacity));

    let expanded = state.expanded_category();
    let mut areas = Vec::with_capacity(capacity);
    for (line, row) in rows.iter().skip(offset).take(capacity).enumerate() {
        let row_area = Rect::new(inner.x, inner.y + line as u16, inner.width, 1);
        let spans = match row {
            SelectorRow::Category(name) => {
                let chevron = if expanded == Some(name.as_str()) { CHEVRON_DOWN } else { CHEVRON_RIGHT };
                let label = truncate_to_width(name, (inner.width as usize).saturating_sub(2));
                vec![Span::styled(label, theme.text_secondary_style()), Span::raw(" "), Span::styled(chevron, theme.accent_style())]
            }
            SelectorRow::Option(index) => {
                let checked = state.is_checked(*index);
                let mark = if checked { "[x] " } else { "[ ] " };
                let label = truncate_to_width(&state.display(*index), (inner.width as usize).saturating_sub(4));
                vec![Span::styled(mark, theme.checkbox_style(checked)), Span::styled(label, theme.text_primary_style())]
            }
        };
        let style = if cursor == Some(row) { theme.selection_style() } else { Style::default() };
        frame.render_widget(Paragraph::new(Line::from(spans)).style(style), row_area);
        areas.push((row_area, row.clone()));
    }
    areas
}

/// Cut `text` to at most `max` display columns, marking the cut with an ellipsis.
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

impl Component for SelectorComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(state) = self.state_mut(app) else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') if !state.is_open() => {
                state.toggle_open();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char(' ') => state.activate_cursor(),
            KeyCode::Down if !state.is_open() => {
                state.toggle_open();
                Vec::new()
            }
            KeyCode::Down => {
                state.move_cursor(1);
                Vec::new()
            }
            KeyCode::Up => {
                state.move_cursor(-1);
                Vec::new()
            }
            KeyCode::Right => {
                state.expand_at_cursor();
                Vec::new()
            }
            KeyCode::Left => {
                state.collapse_expanded();
                Vec::new()
            }
            KeyCode::Esc => {
                state.close();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(mouse.column, mouse.row);
        let Some(state) = self.state_mut(app) else {
            return Vec::new();
        };
        let Some(effects) = state.click(position) else {
            return Vec::new();
        };
        app.focus.focus(&app.selectors[self.index].focus);
        effects
    }

    /// Draws the header: the title followed by the chevron.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let App { selectors, ctx, .. } = app;
        let Some(state) = selectors.get_mut(self.index) else {
            return;
        };
        let theme = &*ctx.theme;
        let focused = state.focus.get();

        let title_style = match (state.is_ready(), focused || state.is_open()) {
            (false, _) => theme.text_muted_style(),
            (true, true) => theme.accent_bold_style(),
            (true, false) => theme.text_primary_style(),
        };
        let label = format!(" {} ", state.title());
        let label_width = label.width() as u16;
        let header = Rect::new(rect.x, rect.y, (label_width + 2).min(rect.width), rect.height.min(1));
        let chevron = Rect::new(
            (header.x + label_width).min(header.right().saturating_sub(1)),
            header.y,
            1,
            header.height,
        );

        let line = Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(CHEVRON_DOWN, if state.is_ready() { theme.accent_style() } else { theme.text_muted_style() }),
        ]);
        let style = if focused { theme.selection_style() } else { Style::default() };
        frame.render_widget(Paragraph::new(line).style(style), header);
        state.record_header(header, chevron);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let open = app.selectors.get(self.index).is_some_and(|s| s.is_open());
        let hints: &[(&str, &str)] = if open {
            &[("\u{2191}/\u{2193}", " Move "), ("\u{2192}/\u{2190}", " Expand/Collapse "), ("Enter", " Select "), ("Esc", " Close ")]
        } else {
            &[("Enter", " Open "), ("Tab", " Next ")]
        };
        build_hint_spans(&*app.ctx.theme, hints)
    }
}

#[cfg(test)]
mod tests {
    use civiclab_types::TagCategory;
    use civiclab_util::SessionSnapshot;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::tests::test_app;
    use crate::ui::components::selector::state::SelectorHit;

    fn role(index: usize) -> TagDefinition {
        TagDefinition {
            tag_name: format!("role-{index:02}"),
            display_name: format!("Role {index:02}"),
            category: TagCategory::Role,
            subcategory: Some(format!("Cat{index:02}")),
        }
    }

    #[test]
    fn scrolled_panel_keeps_the_expanded_header_measured() {
        let (mut app, _) = test_app(SessionSnapshot::anonymous());
        let state = &mut app.selectors[2];
        state.set_options((0..12).map(role).collect());
        state.record_header(Rect::new(0, 0, 10, 1), Rect::new(9, 0, 1, 1));
        state.focus.set(true);
        state.toggle_open();
        state.move_cursor(10);
        state.expand_at_cursor();
        state.move_cursor(1);
        assert_eq!(state.cursor_row(), Some(SelectorRow::Option(10)));

        let bounds = Rect::new(0, 0, 80, 10);
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).expect("terminal");
        let mut component = SelectorComponent::new(2);
        terminal
            .draw(|frame| component.render_flyout(frame, bounds, &mut app))
            .expect("draw");

        let state = &app.selectors[2];
        assert_eq!(state.measured_position("Cat10"), Some(Rect::new(1, 8, 30, 1)));
        assert_eq!(state.measured_position("Cat00"), None, "scrolled out of view");
        assert_eq!(state.hit_test(Position::new(35, 8)), Some(SelectorHit::Row(SelectorRow::Option(10))));
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("Python", 10), "Python");
        assert_eq!(truncate_to_width("Data Science", 6), "Data \u{2026}");
        assert_eq!(truncate_to_width("\u{6F22}\u{5B57}\u{6F22}\u{5B57}", 5), "\u{6F22}\u{5B57}\u{2026}");
    }
}
