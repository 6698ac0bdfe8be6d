//! Theme styling module for the TUI UI layer.
//!
//! Palettes live in [`palettes`], semantic roles and the [`Theme`] trait in
//! [`roles`], and widget builders in [`theme_helpers`]. Prefer these helpers
//! over hard-coding colors.

use std::env;

use tracing::debug;

pub mod palettes;
pub mod roles;
pub mod theme_helpers;

pub use roles::Theme;

/// Theme ids accepted by `TUI_THEME` and the `theme` config value.
pub const THEME_IDS: &[&str] = &["dracula", "nord", "ansi256"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Build the theme with the given id, if known.
pub fn resolve(theme_id: &str) -> Option<Box<dyn Theme>> {
    match theme_id.trim().to_ascii_lowercase().as_str() {
        "dracula" => Some(Box::new(palettes::dracula())),
        "nord" => Some(Box::new(palettes::nord())),
        "ansi256" | "ansi" => Some(Box::new(palettes::ansi256())),
        _ => None,
    }
}

/// Selects a theme from `TUI_THEME`, then the configured preference, then the terminal's capabilities.
pub fn load(preferred_theme: Option<&str>) -> Box<dyn Theme> {
    if matches!(detect_color_capability(), ColorCapability::Ansi256) {
        debug!("ANSI-only terminal detected; using the indexed palette");
        return Box::new(palettes::ansi256());
    }

    if let Ok(theme_name) = env::var("TUI_THEME")
        && let Some(theme) = resolve(&theme_name)
    {
        return theme;
    }

    if let Some(name) = preferred_theme
        && let Some(theme) = resolve(name)
    {
        return theme;
    }

    Box::new(palettes::dracula())
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var("TUI_COLOR_MODE").ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") || term.contains("direct") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}
