use std::fmt::Debug;

use civiclab_types::Severity;
use ratatui::style::{Color, Modifier, Style};

/// Colors a palette assigns to the parts of the project view.
#[derive(Debug, Clone, Copy)]
pub struct ThemeRoles {
    pub background: Color,
    /// Project details, the file list and text inputs.
    pub panel: Color,
    /// Fill behind disabled buttons.
    pub panel_disabled: Color,
    /// Dialogs and selector flyouts, darker than `background`.
    pub overlay: Color,
    pub border: Color,
    pub border_focused: Color,

    pub text: Color,
    /// Panel titles and category names.
    pub text_label: Color,
    pub text_dim: Color,

    /// Selector titles and chevrons.
    pub accent: Color,
    /// Button labels and active filter chips.
    pub control: Color,
    /// Row under the keyboard cursor.
    pub highlight: Color,

    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_label)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_dim)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        Style::default().fg(if focused { roles.border_focused } else { roles.border })
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().text).bg(self.roles().highlight)
    }

    fn overlay_style(&self) -> Style {
        Style::default().bg(self.roles().overlay)
    }

    fn status_style(&self, severity: Severity) -> Style {
        let roles = self.roles();
        let color = match severity {
            Severity::Info => roles.info,
            Severity::Success => roles.success,
            Severity::Warning => roles.warning,
            Severity::Error => roles.error,
        };
        Style::default().fg(color)
    }

    fn accent_style(&self) -> Style {
        Style::default().fg(self.roles().accent)
    }
    /// Titles and key hints.
    fn accent_bold_style(&self) -> Style {
        self.accent_style().add_modifier(Modifier::BOLD)
    }

    /// Checkbox glyph of a selector row.
    fn checkbox_style(&self, checked: bool) -> Style {
        if checked {
            Style::default().fg(self.roles().success).add_modifier(Modifier::BOLD)
        } else {
            self.text_muted_style()
        }
    }
}
