//! Layout helpers shared by the UI components.

use ratatui::prelude::*;

/// A rectangle centered in `r`, sized as a percentage of it.
///
/// ```rust,ignore
/// let parent = Rect::new(0, 0, 100, 50);
/// let centered = centered_rect(80, 70, parent);
/// ```
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Like [`centered_rect`], but never smaller than `min` nor larger than `max`
/// (both only by size), and always inside `r`.
pub fn centered_min_max(percent_x: u16, percent_y: u16, min: Rect, max: Rect, r: Rect) -> Rect {
    let base = centered_rect(percent_x, percent_y, r);
    let width = base.width.clamp(min.width, max.width.max(min.width)).min(r.width);
    let height = base.height.clamp(min.height, max.height.max(min.height)).min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_min_max_clamps_and_stays_inside() {
        let screen = Rect::new(0, 0, 200, 60);
        let rect = centered_min_max(45, 35, Rect::new(0, 0, 80, 10), Rect::new(0, 0, 160, 16), screen);
        assert_eq!((rect.width, rect.height), (90, 16));
        assert_eq!((rect.x, rect.y), (55, 22));

        let tiny = Rect::new(0, 0, 40, 8);
        let rect = centered_min_max(45, 35, Rect::new(0, 0, 80, 10), Rect::new(0, 0, 160, 16), tiny);
        assert_eq!(rect, tiny);
    }
}
