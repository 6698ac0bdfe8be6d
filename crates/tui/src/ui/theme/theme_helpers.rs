use civiclab_types::Severity;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Modal block whose border color follows the severity.
pub fn block_with_severity<'a, T: Theme + ?Sized>(theme: &'a T, severity: Severity, title: Option<&'a str>) -> Block<'a> {
    let border = severity_style(theme, severity);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(flyout_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, border.add_modifier(Modifier::BOLD)));
    }
    block
}

pub fn severity_style<T: Theme + ?Sized>(theme: &T, severity: Severity) -> Style {
    theme.status_style(severity)
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { panel, text, .. } = *theme.roles();
    Style::default().bg(panel).fg(text)
}

/// Style for dialogs and flyout panels that float above the main view.
pub fn flyout_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.overlay_style().fg(theme.roles().text)
}

/// Style for input fields; caller sets the block border based on focus.
pub fn input_style<T: Theme + ?Sized>(theme: &T, valid: bool, focused: bool) -> Style {
    let ThemeRoles { panel, text, error, .. } = *theme.roles();
    let mut style = Style::default().bg(panel).fg(text);
    if !valid {
        style = style.fg(error);
    }
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

/// Secondary button style (outline-like, rely on border color in Block).
pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, enabled: bool, selected: bool) -> Style {
    if !enabled {
        return theme.text_muted_style().bg(theme.roles().panel_disabled);
    }
    let ThemeRoles { control, highlight, .. } = *theme.roles();
    let style = Style::default().fg(control);
    if selected { style.bg(highlight) } else { style }
}

/// Chip style for active filters.
pub fn badge_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { control, background, .. } = *theme.roles();
    Style::default().bg(control).fg(background)
}

/// Flags controlling how [`render_button`] draws a button.
#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub enabled: bool,
    pub focused: bool,
    pub selected: bool,
    pub borders: Borders,
}

impl ButtonRenderOptions {
    pub fn new(enabled: bool, focused: bool, selected: bool, borders: Borders) -> Self {
        Self {
            enabled,
            focused,
            selected,
            borders,
        }
    }
}

/// Renders a standard button
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, options: ButtonRenderOptions) {
    let border_style = if options.enabled {
        theme.border_style(options.focused)
    } else {
        theme.text_muted_style()
    };
    let button_style = button_secondary_style(theme, options.enabled, options.selected || options.focused);

    let padding = if options.borders.is_empty() {
        Padding::uniform(1)
    } else {
        Padding::uniform(0)
    };

    frame.render_widget(
        Paragraph::new(label).centered().block(
            Block::bordered()
                .borders(options.borders)
                .border_style(border_style)
                .padding(padding),
        )
        .style(button_style),
        area,
    );
}

/// Key/description pairs for the hint bar.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(*key, theme.accent_bold_style()));
        spans.push(Span::styled(*description, theme.text_muted_style()));
    }
    spans
}
