//! State machine for the collapsible selector.
//!
//! The selector is either a flat sorted list or, when any option carries a
//! category, a two-level list whose categories expand into flyout panels.
//! Everything here is renderer independent except the `Rect` geometry the
//! renderer records after laying out headers and rows.

use std::collections::HashMap;
use std::fmt;

use civiclab_types::Effect;
use indexmap::IndexMap;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::{Position, Rect};
use tracing::debug;

/// Width of a flyout panel, in cells.
pub const SELECTOR_WIDTH: u16 = 32;
/// Chevron shown next to the title and expanded categories.
pub const CHEVRON_DOWN: &str = "\u{25BE}";
/// Chevron shown next to collapsed categories.
pub const CHEVRON_RIGHT: &str = "\u{25B8}";

pub type CategoryFn<T> = Box<dyn Fn(&T) -> Option<String>>;
pub type EnabledFn<T> = Box<dyn Fn(&T) -> bool>;
pub type DisplayFn<T> = Box<dyn Fn(&T) -> String>;
pub type SelectFn<T> = Box<dyn FnMut(&T) -> Vec<Effect>>;

/// Caller-supplied behavior. The selector never looks inside `T` except
/// through these functions.
pub struct SelectorProps<T> {
    pub title: String,
    /// Turns the selector into a two-level selector when any option yields a non-empty category.
    pub option_category: Option<CategoryFn<T>>,
    /// Drives the checked state of each row.
    pub option_enabled: EnabledFn<T>,
    pub option_display: DisplayFn<T>,
    pub on_option_select: SelectFn<T>,
}

impl<T> SelectorProps<T> {
    pub fn new(
        title: impl Into<String>,
        option_display: impl Fn(&T) -> String + 'static,
        on_option_select: impl FnMut(&T) -> Vec<Effect> + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            option_category: None,
            option_enabled: Box::new(|_| false),
            option_display: Box::new(option_display),
            on_option_select: Box::new(on_option_select),
        }
    }

    pub fn with_category(mut self, option_category: impl Fn(&T) -> Option<String> + 'static) -> Self {
        self.option_category = Some(Box::new(option_category));
        self
    }

    pub fn with_enabled(mut self, option_enabled: impl Fn(&T) -> bool + 'static) -> Self {
        self.option_enabled = Box::new(option_enabled);
        self
    }
}

/// Options of one category, as indices into the option list sorted by display string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub name: String,
    pub options: Vec<usize>,
}

/// Flat vs. categorized presentation, derived from the options on every update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectorMode {
    /// No options; the header is inert.
    #[default]
    NotReady,
    Flat(Vec<usize>),
    /// Groups sorted by name. Options without a category are not present.
    Categorized(Vec<CategoryGroup>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectorPhase {
    #[default]
    Closed,
    Open { expanded: Option<String> },
}

/// A row shown while the selector is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorRow {
    Category(String),
    /// Index into the option list.
    Option(usize),
}

/// What a screen position maps to after the last render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorHit {
    Header,
    Row(SelectorRow),
}

pub struct CollapsibleSelectorState<T> {
    props: SelectorProps<T>,
    options: Vec<T>,
    mode: SelectorMode,
    phase: SelectorPhase,
    /// Category header rectangles, recorded when each header is drawn.
    measured_positions: HashMap<String, Rect>,
    /// Chevron rectangle from the last header render.
    chevron: Option<Rect>,
    header_area: Rect,
    row_areas: Vec<(Rect, SelectorRow)>,
    cursor: usize,

    pub focus: FocusFlag,
}

impl<T> fmt::Debug for CollapsibleSelectorState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollapsibleSelectorState")
            .field("title", &self.props.title)
            .field("options", &self.options.len())
            .field("mode", &self.mode)
            .field("phase", &self.phase)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<T> CollapsibleSelectorState<T> {
    pub fn new(props: SelectorProps<T>, options: Vec<T>) -> Self {
        let focus = FocusFlag::new().with_name(&format!("selector.{}", props.title));
        let mut state = Self {
            props,
            options: Vec::new(),
            mode: SelectorMode::NotReady,
            phase: SelectorPhase::Closed,
            measured_positions: HashMap::new(),
            chevron: None,
            header_area: Rect::default(),
            row_areas: Vec::new(),
            cursor: 0,
            focus,
        };
        state.set_options(options);
        state
    }

    /// Replace the option set. Recomputes the mode and resets the interaction state.
    pub fn set_options(&mut self, options: Vec<T>) {
        self.options = options;
        self.mode = build_mode(&self.options, &self.props);
        self.phase = SelectorPhase::Closed;
        self.measured_positions.clear();
        self.row_areas.clear();
        self.cursor = 0;
        debug!(selector = %self.props.title, options = self.options.len(), mode = ?self.mode_kind(), "selector options updated");
    }

    fn mode_kind(&self) -> &'static str {
        match self.mode {
            SelectorMode::NotReady => "not-ready",
            SelectorMode::Flat(_) => "flat",
            SelectorMode::Categorized(_) => "categorized",
        }
    }

    pub fn title(&self) -> &str {
        &self.props.title
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn mode(&self) -> &SelectorMode {
        &self.mode
    }

    pub fn phase(&self) -> &SelectorPhase {
        &self.phase
    }

    pub fn is_ready(&self) -> bool {
        !matches!(self.mode, SelectorMode::NotReady)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, SelectorPhase::Open { .. })
    }

    pub fn expanded_category(&self) -> Option<&str> {
        match &self.phase {
            SelectorPhase::Open { expanded } => expanded.as_deref(),
            SelectorPhase::Closed => None,
        }
    }

    /// Header click: opens when ready, closes when open. Returns whether anything changed.
    pub fn toggle_open(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.phase = match self.phase {
            SelectorPhase::Closed => SelectorPhase::Open { expanded: None },
            SelectorPhase::Open { .. } => SelectorPhase::Closed,
        };
        self.cursor = 0;
        true
    }

    pub fn close(&mut self) {
        self.phase = SelectorPhase::Closed;
        self.cursor = 0;
    }

    /// Category header click: expands `category`, or collapses it when it is already expanded.
    ///
    /// The rows shift either way, so the cursor is parked on the category's header.
    pub fn toggle_category(&mut self, category: &str) {
        let SelectorPhase::Open { expanded } = &mut self.phase else {
            return;
        };
        let known = matches!(&self.mode, SelectorMode::Categorized(groups) if groups.iter().any(|g| g.name == category));
        if !known {
            return;
        }
        if expanded.as_deref() == Some(category) {
            *expanded = None;
        } else {
            *expanded = Some(category.to_string());
        }
        if let Some(position) = self
            .visible_rows()
            .iter()
            .position(|row| matches!(row, SelectorRow::Category(name) if name == category))
        {
            self.cursor = position;
        }
    }

    /// Invoke the selection callback with the option at `index`.
    ///
    /// The checked state of the row plays no part; open/closed state is unchanged.
    pub fn select_option(&mut self, index: usize) -> Vec<Effect> {
        let SelectorProps { on_option_select, .. } = &mut self.props;
        match self.options.get(index) {
            Some(option) => on_option_select(option),
            None => Vec::new(),
        }
    }

    pub fn display(&self, index: usize) -> String {
        self.options.get(index).map(|o| (self.props.option_display)(o)).unwrap_or_default()
    }

    /// Checked state of a row: the enabled predicate evaluated for that option.
    pub fn is_checked(&self, index: usize) -> bool {
        self.options.get(index).is_some_and(|o| (self.props.option_enabled)(o))
    }

    /// Categories with their sorted options, in render order.
    pub fn category_groups(&self) -> &[CategoryGroup] {
        match &self.mode {
            SelectorMode::Categorized(groups) => groups,
            _ => &[],
        }
    }

    /// Rows currently reachable with the keyboard, top to bottom.
    ///
    /// For the categorized mode the expanded category's options follow its header.
    pub fn visible_rows(&self) -> Vec<SelectorRow> {
        if !self.is_open() {
            return Vec::new();
        }
        match &self.mode {
            SelectorMode::NotReady => Vec::new(),
            SelectorMode::Flat(indices) => indices.iter().copied().map(SelectorRow::Option).collect(),
            SelectorMode::Categorized(groups) => {
                let expanded = self.expanded_category();
                let mut rows = Vec::new();
                for group in groups {
                    rows.push(SelectorRow::Category(group.name.clone()));
                    if expanded == Some(group.name.as_str()) {
                        rows.extend(group.options.iter().copied().map(SelectorRow::Option));
                    }
                }
                rows
            }
        }
    }

    pub fn cursor_row(&self) -> Option<SelectorRow> {
        self.visible_rows().into_iter().nth(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let last = len as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Enter/Space on the row under the cursor.
    pub fn activate_cursor(&mut self) -> Vec<Effect> {
        match self.cursor_row() {
            Some(SelectorRow::Category(name)) => {
                self.toggle_category(&name);
                Vec::new()
            }
            Some(SelectorRow::Option(index)) => self.select_option(index),
            None => Vec::new(),
        }
    }

    /// Right arrow: expand the category under the cursor.
    pub fn expand_at_cursor(&mut self) {
        if let Some(SelectorRow::Category(name)) = self.cursor_row()
            && self.expanded_category() != Some(name.as_str())
        {
            self.toggle_category(&name);
        }
    }

    /// Left arrow: collapse the expanded category.
    pub fn collapse_expanded(&mut self) {
        if let Some(expanded) = self.expanded_category().map(str::to_string) {
            self.toggle_category(&expanded);
        }
    }

    // ----- Layout measurements -----

    pub fn record_header(&mut self, header: Rect, chevron: Rect) {
        self.header_area = header;
        self.chevron = Some(chevron);
    }

    pub fn record_category_position(&mut self, category: &str, rect: Rect) {
        self.measured_positions.insert(category.to_string(), rect);
    }

    /// Drop header rectangles before a redraw so scrolled-out categories have none.
    pub fn forget_category_positions(&mut self) {
        self.measured_positions.clear();
    }

    pub fn measured_position(&self, category: &str) -> Option<Rect> {
        self.measured_positions.get(category).copied()
    }

    /// Top-left corner of the top-level flyout: centered under the chevron by
    /// shifting left half of [`SELECTOR_WIDTH`], kept inside `bounds`.
    pub fn flyout_origin(&self, bounds: Rect) -> Option<Position> {
        let chevron = self.chevron?;
        let width = SELECTOR_WIDTH.min(bounds.width);
        let max_x = bounds.right().saturating_sub(width);
        let x = chevron.x.saturating_sub(SELECTOR_WIDTH / 2).clamp(bounds.x, max_x.max(bounds.x));
        let y = chevron.bottom().min(bounds.bottom().saturating_sub(1));
        Some(Position::new(x, y))
    }

    /// Top-left corner of a category's flyout: to the right of its measured
    /// header row, top aligned with it. Flips to the left edge of the row when
    /// there is no room on the right.
    pub fn category_flyout_origin(&self, category: &str, bounds: Rect) -> Option<Position> {
        let header = self.measured_position(category)?;
        let width = SELECTOR_WIDTH.min(bounds.width);
        let x = if header.right().saturating_add(width) <= bounds.right() {
            header.right()
        } else {
            header.x.saturating_sub(width).max(bounds.x)
        };
        Some(Position::new(x, header.y))
    }

    pub fn set_row_areas(&mut self, rows: Vec<(Rect, SelectorRow)>) {
        self.row_areas = rows;
    }

    pub fn header_area(&self) -> Rect {
        self.header_area
    }

    pub fn hit_test(&self, position: Position) -> Option<SelectorHit> {
        if self.header_area.contains(position) {
            return Some(SelectorHit::Header);
        }
        if !self.is_open() {
            return None;
        }
        // Category flyouts are drawn last, so they win over rows underneath.
        self.row_areas
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, row)| SelectorHit::Row(row.clone()))
    }

    /// Mouse click at `position`. Returns `None` when the click missed the selector.
    pub fn click(&mut self, position: Position) -> Option<Vec<Effect>> {
        let hit = self.hit_test(position)?;
        let effects = match hit {
            SelectorHit::Header => {
                self.toggle_open();
                Vec::new()
            }
            SelectorHit::Row(SelectorRow::Category(name)) => {
                self.toggle_category(&name);
                Vec::new()
            }
            SelectorHit::Row(SelectorRow::Option(index)) => self.select_option(index),
        };
        Some(effects)
    }
}

fn sort_by_display<T>(indices: &mut [usize], options: &[T], display: &DisplayFn<T>) {
    indices.sort_by_cached_key(|&index| display(&options[index]));
}

fn build_mode<T>(options: &[T], props: &SelectorProps<T>) -> SelectorMode {
    if options.is_empty() {
        return SelectorMode::NotReady;
    }

    let categories: Vec<Option<String>> = match &props.option_category {
        Some(category) => options
            .iter()
            .map(|option| category(option).filter(|name| !name.is_empty()))
            .collect(),
        None => vec![None; options.len()],
    };

    if categories.iter().any(Option::is_some) {
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (index, category) in categories.into_iter().enumerate() {
            if let Some(name) = category {
                groups.entry(name).or_default().push(index);
            }
        }
        groups.sort_keys();
        let groups = groups
            .into_iter()
            .map(|(name, mut indices)| {
                sort_by_display(&mut indices, options, &props.option_display);
                CategoryGroup { name, options: indices }
            })
            .collect();
        SelectorMode::Categorized(groups)
    } else {
        let mut indices: Vec<usize> = (0..options.len()).collect();
        sort_by_display(&mut indices, options, &props.option_display);
        SelectorMode::Flat(indices)
    }
}

impl<T> HasFocus for CollapsibleSelectorState<T> {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.header_area
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Skill {
        name: &'static str,
        group: Option<&'static str>,
        active: bool,
    }

    fn skill(name: &'static str, group: Option<&'static str>) -> Skill {
        Skill { name, group, active: false }
    }

    fn props(selected: Rc<RefCell<Vec<Skill>>>) -> SelectorProps<Skill> {
        SelectorProps::new("Skills", |s: &Skill| s.name.to_string(), move |s: &Skill| {
            selected.borrow_mut().push(s.clone());
            vec![Effect::Navigate(s.name.to_string())]
        })
        .with_category(|s: &Skill| s.group.map(str::to_string))
        .with_enabled(|s: &Skill| s.active)
    }

    fn selector(options: Vec<Skill>) -> (CollapsibleSelectorState<Skill>, Rc<RefCell<Vec<Skill>>>) {
        let selected = Rc::new(RefCell::new(Vec::new()));
        (CollapsibleSelectorState::new(props(selected.clone()), options), selected)
    }

    fn names(state: &CollapsibleSelectorState<Skill>, indices: &[usize]) -> Vec<&'static str> {
        indices.iter().map(|&i| state.options()[i].name).collect()
    }

    #[test]
    fn empty_options_are_not_ready_and_header_is_inert() {
        let (mut state, _) = selector(Vec::new());
        assert_eq!(state.mode(), &SelectorMode::NotReady);
        assert!(!state.toggle_open());
        assert_eq!(state.phase(), &SelectorPhase::Closed);
    }

    #[test]
    fn uncategorized_options_render_one_sorted_flat_list() {
        let (state, _) = selector(vec![skill("Python", None), skill("Django", None), skill("React", None)]);
        let SelectorMode::Flat(indices) = state.mode() else {
            panic!("expected flat mode, got {:?}", state.mode());
        };
        assert_eq!(names(&state, indices), ["Django", "Python", "React"]);
    }

    #[test]
    fn empty_category_strings_do_not_switch_modes() {
        let (state, _) = selector(vec![skill("b", Some("")), skill("a", Some(""))]);
        assert!(matches!(state.mode(), SelectorMode::Flat(_)));
    }

    #[test]
    fn any_category_switches_to_sorted_groups_and_drops_uncategorized() {
        let (state, _) = selector(vec![
            skill("Visual Designer", Some("Design")),
            skill("Back End", Some("Development")),
            skill("Loose Option", None),
            skill("UX Designer", Some("Design")),
            skill("Front End", Some("Development")),
            skill("Analyst", Some("Data")),
        ]);

        let groups = state.category_groups();
        let group_names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(group_names, ["Data", "Design", "Development"]);
        assert_eq!(names(&state, &groups[1].options), ["UX Designer", "Visual Designer"]);
        assert_eq!(names(&state, &groups[2].options), ["Back End", "Front End"]);

        let rendered: usize = groups.iter().map(|g| g.options.len()).sum();
        assert_eq!(rendered, 5);
        assert!(groups.iter().all(|g| g.options.iter().all(|&i| state.options()[i].name != "Loose Option")));
    }

    #[test]
    fn equal_display_strings_keep_input_order() {
        let mut first = skill("Same", None);
        first.active = true;
        let (state, _) = selector(vec![skill("Zed", None), first, skill("Same", None)]);
        let SelectorMode::Flat(indices) = state.mode() else {
            panic!("expected flat mode");
        };
        assert_eq!(indices, &vec![1, 2, 0]);
    }

    #[test]
    fn header_toggles_open_and_closed() {
        let (mut state, _) = selector(vec![skill("a", None)]);
        assert!(state.toggle_open());
        assert_eq!(state.phase(), &SelectorPhase::Open { expanded: None });
        assert!(state.toggle_open());
        assert_eq!(state.phase(), &SelectorPhase::Closed);
    }

    #[test]
    fn toggling_same_category_twice_collapses_it() {
        let (mut state, _) = selector(vec![skill("x", Some("A")), skill("y", Some("B"))]);
        state.toggle_open();

        state.toggle_category("A");
        assert_eq!(state.expanded_category(), Some("A"));
        state.toggle_category("A");
        assert_eq!(state.phase(), &SelectorPhase::Open { expanded: None });
    }

    #[test]
    fn expanding_another_category_replaces_the_expanded_one() {
        let (mut state, _) = selector(vec![skill("x", Some("A")), skill("y", Some("B"))]);
        state.toggle_open();
        state.toggle_category("A");
        state.toggle_category("B");
        assert_eq!(state.expanded_category(), Some("B"));

        state.toggle_category("Unknown");
        assert_eq!(state.expanded_category(), Some("B"));
    }

    #[test]
    fn category_clicks_are_ignored_while_closed() {
        let (mut state, _) = selector(vec![skill("x", Some("A"))]);
        state.toggle_category("A");
        assert_eq!(state.phase(), &SelectorPhase::Closed);
    }

    #[test]
    fn selecting_invokes_callback_once_with_that_option_regardless_of_checked_state() {
        let mut checked = skill("Rust", None);
        checked.active = true;
        let (mut state, selected) = selector(vec![checked.clone(), skill("Go", None)]);
        state.toggle_open();

        assert!(state.is_checked(0));
        assert!(!state.is_checked(1));

        let effects = state.select_option(0);
        assert_eq!(effects, vec![Effect::Navigate("Rust".to_string())]);
        state.select_option(1);

        assert_eq!(*selected.borrow(), vec![checked, skill("Go", None)]);
        assert!(state.is_open(), "selection keeps the selector open");
    }

    #[test]
    fn new_options_reset_state_and_recompute_mode() {
        let (mut state, _) = selector(vec![skill("x", Some("A"))]);
        state.toggle_open();
        state.toggle_category("A");
        state.record_category_position("A", Rect::new(0, 1, 20, 1));

        state.set_options(vec![skill("plain", None)]);
        assert_eq!(state.phase(), &SelectorPhase::Closed);
        assert!(matches!(state.mode(), SelectorMode::Flat(_)));
        assert_eq!(state.measured_position("A"), None);

        state.set_options(Vec::new());
        assert!(!state.is_ready());
        assert!(!state.toggle_open());
    }

    #[test]
    fn keyboard_walks_categories_and_expanded_options() {
        let (mut state, selected) = selector(vec![skill("b", Some("One")), skill("a", Some("One")), skill("c", Some("Two"))]);
        state.toggle_open();
        assert_eq!(
            state.visible_rows(),
            vec![SelectorRow::Category("One".into()), SelectorRow::Category("Two".into())]
        );

        state.expand_at_cursor();
        assert_eq!(state.expanded_category(), Some("One"));
        state.move_cursor(1);
        assert_eq!(state.cursor_row(), Some(SelectorRow::Option(1)));
        state.activate_cursor();
        assert_eq!(selected.borrow().len(), 1);
        assert_eq!(selected.borrow()[0].name, "a");

        state.move_cursor(10);
        assert_eq!(state.cursor_row(), Some(SelectorRow::Category("Two".into())));

        state.move_cursor(-2);
        state.collapse_expanded();
        assert_eq!(state.expanded_category(), None);
        assert_eq!(state.cursor_row(), Some(SelectorRow::Category("One".into())));
    }

    #[test]
    fn expanding_a_lower_category_keeps_the_cursor_on_its_header() {
        let (mut state, _) = selector(vec![skill("a", Some("One")), skill("b", Some("One")), skill("c", Some("Two"))]);
        state.toggle_open();
        state.expand_at_cursor();
        state.move_cursor(3);
        assert_eq!(state.cursor_row(), Some(SelectorRow::Category("Two".into())));

        state.activate_cursor();
        assert_eq!(state.expanded_category(), Some("Two"));
        assert_eq!(state.cursor_row(), Some(SelectorRow::Category("Two".into())));

        state.move_cursor(1);
        assert_eq!(state.cursor_row(), Some(SelectorRow::Option(2)));
        state.activate_cursor();
        assert_eq!(state.expanded_category(), Some("Two"));

        state.move_cursor(-2);
        state.activate_cursor();
        assert_eq!(state.expanded_category(), Some("One"));
        assert_eq!(state.cursor_row(), Some(SelectorRow::Category("One".into())));
    }

    #[test]
    fn flyout_positions_follow_measurements() {
        let (mut state, _) = selector(vec![skill("x", Some("A"))]);
        let bounds = Rect::new(0, 0, 100, 40);
        assert_eq!(state.flyout_origin(bounds), None);

        state.record_header(Rect::new(30, 2, 12, 1), Rect::new(41, 2, 1, 1));
        assert_eq!(state.flyout_origin(bounds), Some(Position::new(41 - SELECTOR_WIDTH / 2, 3)));

        state.record_header(Rect::new(0, 2, 8, 1), Rect::new(7, 2, 1, 1));
        assert_eq!(state.flyout_origin(bounds), Some(Position::new(0, 3)));

        state.record_category_position("A", Rect::new(10, 5, 30, 1));
        assert_eq!(state.category_flyout_origin("A", bounds), Some(Position::new(40, 5)));

        state.record_category_position("A", Rect::new(60, 5, 30, 1));
        assert_eq!(state.category_flyout_origin("A", bounds), Some(Position::new(60 - SELECTOR_WIDTH, 5)));
        assert_eq!(state.category_flyout_origin("B", bounds), None);
    }

    #[test]
    fn clicks_route_through_recorded_areas() {
        let (mut state, selected) = selector(vec![skill("x", Some("A")), skill("y", Some("A"))]);
        state.record_header(Rect::new(0, 0, 10, 1), Rect::new(9, 0, 1, 1));

        assert_eq!(state.click(Position::new(50, 10)), None);
        state.click(Position::new(2, 0));
        assert!(state.is_open());

        state.set_row_areas(vec![(Rect::new(0, 2, 20, 1), SelectorRow::Category("A".into()))]);
        state.click(Position::new(3, 2));
        assert_eq!(state.expanded_category(), Some("A"));

        state.set_row_areas(vec![
            (Rect::new(0, 2, 20, 1), SelectorRow::Category("A".into())),
            (Rect::new(20, 2, 20, 1), SelectorRow::Option(1)),
        ]);
        let effects = state.click(Position::new(25, 2)).expect("hit option");
        assert_eq!(effects, vec![Effect::Navigate("y".to_string())]);
        assert_eq!(selected.borrow().len(), 1);
    }
}
