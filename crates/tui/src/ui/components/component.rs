//! Component system for the civiclab TUI.
//!
//! Components are self-contained UI elements. Their state lives on [`App`] so
//! the focus tree and the runtime can see it; the component value itself only
//! keeps render-time scratch data such as hit-test rectangles.

use crossterm::event::{KeyEvent, MouseEvent};
use civiclab_types::{Effect, Msg};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

/// A UI component with event handlers and a render function.
///
/// Handlers report side effects back to the runtime as [`Effect`]s instead of
/// calling collaborators directly.
pub trait Component {
    /// Handle an application-level message the component cares about.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events while this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events. Components hit-test against the areas they recorded during the last render.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw the component into `rect`.
    ///
    /// Rendering may record layout measurements on the component state, but
    /// must not change anything a user could observe besides the frame.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the hint bar while the component has focus.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Split `area` into the sub-areas the component draws into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }
}
