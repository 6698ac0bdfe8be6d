//! Built-in palettes mapped onto [`ThemeRoles`].

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

/// A theme that is nothing but a fixed set of roles.
#[derive(Debug, Clone)]
pub struct PaletteTheme {
    roles: ThemeRoles,
}

impl Theme for PaletteTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// Dracula (https://draculatheme.com), the default for truecolor terminals.
pub fn dracula() -> PaletteTheme {
    const BG: Color = Color::Rgb(0x28, 0x2A, 0x36);
    const CURRENT_LINE: Color = Color::Rgb(0x44, 0x47, 0x5A);
    const FOREGROUND: Color = Color::Rgb(0xF8, 0xF8, 0xF2);
    const COMMENT: Color = Color::Rgb(0x62, 0x72, 0xA4);
    const CYAN: Color = Color::Rgb(0x8B, 0xE9, 0xFD);
    const GREEN: Color = Color::Rgb(0x50, 0xFA, 0x7B);
    const ORANGE: Color = Color::Rgb(0xFF, 0xB8, 0x6C);
    const PINK: Color = Color::Rgb(0xFF, 0x79, 0xC6);
    const RED: Color = Color::Rgb(0xFF, 0x55, 0x55);

    PaletteTheme {
        roles: ThemeRoles {
            background: BG,
            panel: BG,
            panel_disabled: CURRENT_LINE,
            border: CURRENT_LINE,
            text: FOREGROUND,
            text_label: COMMENT,
            text_dim: COMMENT,
            accent: PINK,
            control: CYAN,
            info: CYAN,
            success: GREEN,
            warning: ORANGE,
            error: RED,
            highlight: CURRENT_LINE,
            border_focused: CYAN,
            overlay: Color::Rgb(0x1D, 0x1F, 0x27),
        },
    }
}

/// Nord (https://www.nordtheme.com).
pub fn nord() -> PaletteTheme {
    const POLAR_0: Color = Color::Rgb(0x2E, 0x34, 0x40);
    const POLAR_1: Color = Color::Rgb(0x3B, 0x42, 0x52);
    const POLAR_2: Color = Color::Rgb(0x43, 0x4C, 0x5E);
    const POLAR_3: Color = Color::Rgb(0x4C, 0x56, 0x6A);
    const SNOW_0: Color = Color::Rgb(0xD8, 0xDE, 0xE9);
    const SNOW_2: Color = Color::Rgb(0xEC, 0xEF, 0xF4);
    const FROST_1: Color = Color::Rgb(0x88, 0xC0, 0xD0);
    const FROST_2: Color = Color::Rgb(0x81, 0xA1, 0xC1);
    const RED: Color = Color::Rgb(0xBF, 0x61, 0x6A);
    const YELLOW: Color = Color::Rgb(0xEB, 0xCB, 0x8B);
    const GREEN: Color = Color::Rgb(0xA3, 0xBE, 0x8C);

    PaletteTheme {
        roles: ThemeRoles {
            background: POLAR_0,
            panel: POLAR_1,
            panel_disabled: POLAR_2,
            border: POLAR_3,
            text: SNOW_2,
            text_label: SNOW_0,
            text_dim: POLAR_3,
            accent: FROST_1,
            control: FROST_2,
            info: FROST_2,
            success: GREEN,
            warning: YELLOW,
            error: RED,
            highlight: POLAR_2,
            border_focused: FROST_1,
            overlay: Color::Rgb(0x1A, 0x1E, 0x28),
        },
    }
}

/// Indexed-color approximation of Dracula for terminals without truecolor.
pub fn ansi256() -> PaletteTheme {
    PaletteTheme {
        roles: ThemeRoles {
            background: Color::Indexed(236),
            panel: Color::Indexed(236),
            panel_disabled: Color::Indexed(239),
            border: Color::Indexed(239),
            text: Color::Indexed(255),
            text_label: Color::Indexed(250),
            text_dim: Color::Indexed(247),
            accent: Color::Indexed(212),
            control: Color::Indexed(117),
            info: Color::Indexed(117),
            success: Color::Indexed(84),
            warning: Color::Indexed(215),
            error: Color::Indexed(203),
            highlight: Color::Indexed(239),
            border_focused: Color::Indexed(117),
            overlay: Color::Indexed(234),
        },
    }
}
