//! Terminal rendering: the main view, its components, the event loop and theming.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
