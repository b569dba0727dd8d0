use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use ratatui::Frame;
use tracing::trace;

use crate::theme::Theme;

/// Delay between the last keystroke and the filter pass, so fast typing
/// does not recompute the list on every character.
pub const DEFAULT_FILTER_DEBOUNCE: Duration = Duration::from_millis(100);

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

/// One projected dataset item: the value, its display label, and whether
/// it sits at the keyboard cursor in the filtered list.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption<T> {
    pub value: T,
    pub label: String,
    pub active: bool,
}

/// Notifications the widget queues for its owner to drain each pass.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoFilterEvent<T> {
    Opened,
    Closed,
    SelectionChanged(Option<T>),
}

type DisplayFn<T> = Box<dyn Fn(&T) -> String>;
type FilterFn<T> = Box<dyn Fn(&FilterOption<T>, &str) -> bool>;
type ChangeFn<T> = Box<dyn FnMut(Option<&T>)>;
type TouchedFn = Box<dyn FnMut()>;

/// A generic filterable single-select input: type to narrow a closed list,
/// navigate it with the keyboard, commit with Enter or a click. Behaves as
/// a bindable form control through registrable change/touched callbacks.
///
/// All state is owned by the instance and mutated synchronously from the
/// event loop; the only deferred edge is filter text -> filtered list,
/// which waits out a short debounce driven by `tick()`.
pub struct AutoFilter<T> {
    id: u64,
    theme: Theme,
    placeholder: String,

    display_fn: DisplayFn<T>,
    filter_fn: FilterFn<T>,

    // Projected (unfiltered) options, re-derived on every dataset replacement.
    options: Vec<FilterOption<T>>,

    // Raw filter text with a char-indexed edit cursor.
    filter_text: String,
    cursor: usize,

    // The debounced copy actually feeding the filter pass.
    applied_filter: String,
    pending_since: Option<Instant>,
    debounce: Duration,

    // Keyboard cursor over the filtered list. Never wraps.
    active_index: usize,

    // Derived view plus the two caches other operations consult.
    filtered: Vec<FilterOption<T>>,
    active_option: Option<FilterOption<T>>,
    filtered_count: usize,

    panel_open: bool,
    value: Option<T>,
    disabled: bool,
    touched_this_focus: bool,

    on_change: Option<ChangeFn<T>>,
    on_touched: Option<TouchedFn>,
    events: Vec<AutoFilterEvent<T>>,

    // Render-pass state: viewport scroll and hit-test areas.
    scroll_offset: Cell<usize>,
    input_area: Cell<Option<Rect>>,
    panel_area: Cell<Option<Rect>>,
}

impl<T: Clone + PartialEq + ToString> AutoFilter<T> {
    /// Widget with the default display function (`to_string`).
    pub fn new(theme: Theme) -> Self {
        Self::with_display(theme, |value: &T| value.to_string())
    }
}

impl<T: Clone + PartialEq> AutoFilter<T> {
    pub fn with_display(theme: Theme, display: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            id: NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed),
            theme,
            placeholder: String::new(),
            display_fn: Box::new(display),
            // Default: case-insensitive substring containment on the label.
            filter_fn: Box::new(|option, filter| {
                option.label.to_lowercase().contains(&filter.to_lowercase())
            }),
            options: Vec::new(),
            filter_text: String::new(),
            cursor: 0,
            applied_filter: String::new(),
            pending_since: None,
            debounce: DEFAULT_FILTER_DEBOUNCE,
            active_index: 0,
            filtered: Vec::new(),
            active_option: None,
            filtered_count: 0,
            panel_open: false,
            value: None,
            disabled: false,
            touched_this_focus: false,
            on_change: None,
            on_touched: None,
            events: Vec::new(),
            scroll_offset: Cell::new(0),
            input_area: Cell::new(None),
            panel_area: Cell::new(None),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Override the default substring filter.
    pub fn set_filter_fn(&mut self, f: impl Fn(&FilterOption<T>, &str) -> bool + 'static) {
        self.filter_fn = Box::new(f);
        self.recompute();
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    // -- Dataset --

    /// Replace the raw dataset wholesale. `None` is an empty list.
    pub fn set_dataset(&mut self, dataset: Option<Vec<T>>) {
        let items = dataset.unwrap_or_default();
        self.options = self.project(&items);
        trace!(widget = self.id, options = self.options.len(), "dataset replaced");
        self.recompute();
    }

    /// Replace the dataset and replay an externally supplied selection
    /// against it. The selection is trusted from the owner and applied
    /// without a membership check.
    pub fn set_dataset_with_selected(&mut self, dataset: Option<Vec<T>>, selected: Option<T>) {
        self.set_dataset(dataset);
        if let Some(value) = selected {
            self.select_item(value);
        }
    }

    fn project(&self, dataset: &[T]) -> Vec<FilterOption<T>> {
        dataset
            .iter()
            .map(|value| FilterOption {
                value: value.clone(),
                label: (self.display_fn)(value),
                active: false,
            })
            .collect()
    }

    // -- Filter pipeline --

    /// Recompute the rendered list from the unfiltered options, the applied
    /// (debounced) filter text, and the active index. Also refreshes the
    /// cached active option and filtered count.
    fn recompute(&mut self) {
        let mut filtered: Vec<FilterOption<T>> = Vec::new();
        for option in &self.options {
            if (self.filter_fn)(option, &self.applied_filter) {
                filtered.push(option.clone());
            }
        }

        if self.active_index >= filtered.len() {
            self.active_index = filtered.len().saturating_sub(1);
        }
        for (index, option) in filtered.iter_mut().enumerate() {
            option.active = index == self.active_index;
        }

        self.filtered_count = filtered.len();
        self.active_option = filtered.iter().find(|option| option.active).cloned();
        self.filtered = filtered;
    }

    /// Drive the filter debounce. Called by the owner on every app tick;
    /// applies the newest filter text once the quiet period has passed.
    pub fn tick(&mut self) {
        let Some(armed) = self.pending_since else {
            return;
        };
        if armed.elapsed() >= self.debounce {
            self.pending_since = None;
            self.applied_filter = self.filter_text.clone();
            self.recompute();
        }
    }

    // -- Active index --

    fn move_down(&mut self) {
        if self.active_index + 1 < self.filtered_count {
            self.active_index += 1;
            self.recompute();
        }
    }

    fn move_up(&mut self) {
        if self.active_index > 0 {
            self.active_index -= 1;
            self.recompute();
        }
    }

    // -- Panel state --

    fn set_panel_open(&mut self, open: bool) {
        if self.panel_open == open {
            return;
        }
        self.panel_open = open;
        self.events.push(if open {
            AutoFilterEvent::Opened
        } else {
            AutoFilterEvent::Closed
        });
    }

    /// Focus gained: open the panel and re-arm the touched latch.
    pub fn focus(&mut self) {
        if self.disabled {
            return;
        }
        self.touched_this_focus = false;
        self.set_panel_open(true);
    }

    /// Close on escape, tab, or an outside click: if the raw typed text is
    /// exactly some option's label, commit that option; otherwise discard
    /// the text and clear the selection. Duplicate labels resolve to the
    /// first match in projection order (inherited behavior, not a
    /// guarantee).
    pub fn close_panel(&mut self) {
        // Only a transition out of Open reconciles; a closed widget stays
        // silent so repeated Escape presses do not re-notify the binding.
        if !self.panel_open {
            return;
        }
        match self
            .options
            .iter()
            .position(|option| option.label == self.filter_text)
        {
            Some(index) => {
                let value = self.options[index].value.clone();
                let label = self.options[index].label.clone();
                self.commit(value, label);
            }
            None => {
                self.reset();
                self.set_panel_open(false);
            }
        }
    }

    // -- Selection --

    /// Commit an option: the single path behind click, Enter, and
    /// close-with-commit.
    pub fn select(&mut self, option: &FilterOption<T>) {
        self.commit(option.value.clone(), option.label.clone());
    }

    fn select_item(&mut self, value: T) {
        let label = (self.display_fn)(&value);
        self.commit(value, label);
    }

    fn commit(&mut self, value: T, label: String) {
        self.filter_text = label.clone();
        self.cursor = self.filter_text.chars().count();
        // The committed label is the applied filter; a pending debounced
        // dispatch would be stale, so it is discarded.
        self.applied_filter = label;
        self.pending_since = None;
        self.value = Some(value.clone());
        self.events
            .push(AutoFilterEvent::SelectionChanged(Some(value.clone())));
        if let Some(cb) = self.on_change.as_mut() {
            cb(Some(&value));
        }
        self.set_panel_open(false);
        self.recompute();
    }

    fn reset(&mut self) {
        self.filter_text.clear();
        self.cursor = 0;
        self.applied_filter.clear();
        self.pending_since = None;
        self.active_index = 0;
        self.scroll_offset.set(0);
        self.value = None;
        self.events.push(AutoFilterEvent::SelectionChanged(None));
        if let Some(cb) = self.on_change.as_mut() {
            cb(None);
        }
        self.recompute();
    }

    // -- Form-control adapter --

    /// Owner pushes a value in (programmatic reset or preset). Values not
    /// discoverable in the current dataset clear the widget instead of
    /// failing.
    pub fn write_value(&mut self, value: Option<T>) {
        match value {
            Some(v) if self.options.iter().any(|option| option.value == v) => {
                self.select_item(v);
            }
            _ => self.reset(),
        }
    }

    /// Owner-trusted selection, applied without a dataset membership check.
    pub fn set_selected(&mut self, selected: Option<T>) {
        if let Some(value) = selected {
            self.select_item(value);
        }
    }

    pub fn register_on_change(&mut self, f: impl FnMut(Option<&T>) + 'static) {
        self.on_change = Some(Box::new(f));
    }

    pub fn register_on_touched(&mut self, f: impl FnMut() + 'static) {
        self.on_touched = Some(Box::new(f));
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.set_panel_open(false);
        }
    }

    // -- Accessors --

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn is_open(&self) -> bool {
        self.panel_open
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn filtered_options(&self) -> &[FilterOption<T>] {
        &self.filtered
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Drain queued notifications. Owners call this once per event pass.
    pub fn drain_events(&mut self) -> Vec<AutoFilterEvent<T>> {
        std::mem::take(&mut self.events)
    }

    // -- Input handlers --

    /// Handle a key. Returns whether the key was consumed; Tab is never
    /// consumed (it closes the panel, then the owner moves focus on).
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if self.disabled {
            return false;
        }

        match key.code {
            KeyCode::Down => {
                self.move_down();
                true
            }
            KeyCode::Up => {
                self.move_up();
                true
            }
            KeyCode::Enter => {
                // No active option (empty filtered list) is a no-op.
                if let Some(option) = self.active_option.clone() {
                    self.select(&option);
                }
                true
            }
            KeyCode::Esc => {
                self.close_panel();
                true
            }
            KeyCode::Tab => {
                self.close_panel();
                false
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_cursor();
                    self.filter_text.remove(at);
                    self.after_text_edit();
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.filter_text.chars().count() {
                    let at = self.byte_cursor();
                    self.filter_text.remove(at);
                    self.after_text_edit();
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.filter_text.chars().count() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.filter_text.chars().count();
                true
            }
            KeyCode::Char(c) => {
                let at = self.byte_cursor();
                self.filter_text.insert(at, c);
                self.cursor += 1;
                self.after_text_edit();
                true
            }
            _ => false,
        }
    }

    /// Every text edit resets the keyboard cursor to the top and re-arms
    /// the debounce; the filtered list keeps its previous contents until
    /// the quiet period elapses.
    fn after_text_edit(&mut self) {
        self.active_index = 0;
        self.scroll_offset.set(0);
        self.pending_since = Some(Instant::now());
        if !self.touched_this_focus && !self.filter_text.is_empty() {
            self.touched_this_focus = true;
            if let Some(cb) = self.on_touched.as_mut() {
                cb();
            }
        }
        self.recompute();
    }

    fn byte_cursor(&self) -> usize {
        self.filter_text
            .char_indices()
            .nth(self.cursor)
            .map(|(at, _)| at)
            .unwrap_or(self.filter_text.len())
    }

    /// Handle a mouse event. Returns whether the point fell inside the
    /// widget; the owner closes the panel on presses that fall outside.
    pub fn handle_mouse_event(&mut self, mouse: &MouseEvent) -> bool {
        if self.disabled {
            return false;
        }
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return self.hit_test(mouse.column, mouse.row);
        }
        let position = Position::new(mouse.column, mouse.row);

        if let Some(input) = self.input_area.get() {
            if input.contains(position) {
                self.focus();
                return true;
            }
        }

        if self.panel_open {
            if let Some(panel) = self.panel_area.get() {
                if panel.contains(position) {
                    let row = (mouse.row - panel.y) as usize + self.scroll_offset.get();
                    if let Some(option) = self.filtered.get(row).cloned() {
                        self.select(&option);
                    }
                    return true;
                }
            }
        }

        false
    }

    /// Whether a point lies inside the widget's rendered bounds (input box,
    /// plus the panel while open).
    pub fn hit_test(&self, column: u16, row: u16) -> bool {
        let position = Position::new(column, row);
        let in_input = self
            .input_area
            .get()
            .is_some_and(|area| area.contains(position));
        let in_panel = self.panel_open
            && self
                .panel_area
                .get()
                .is_some_and(|area| area.contains(position));
        in_input || in_panel
    }

    // -- Rendering --

    /// Render the input box at the top of `area` and, while open, the
    /// panel below it. Records both rectangles for mouse hit testing.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        if area.height < 3 {
            self.input_area.set(None);
            self.panel_area.set(None);
            return;
        }

        let input_area = Rect::new(area.x, area.y, area.width, 3);
        self.input_area.set(Some(input_area));

        let border = if focused {
            self.theme.border_focused
        } else if self.disabled {
            self.theme.dimmed
        } else {
            self.theme.border
        };
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let inner = block.inner(input_area);
        frame.render_widget(block, input_area);
        frame.render_widget(Paragraph::new(self.input_line(focused)), inner);

        if !self.panel_open {
            self.panel_area.set(None);
            return;
        }

        // Panel: bordered list under the input, clipped to the given area.
        let avail = (area.height - 3) as usize;
        if avail < 3 {
            self.panel_area.set(None);
            return;
        }
        let rows = self.filtered.len().clamp(1, avail - 2);
        let panel_outer = Rect::new(area.x, area.y + 3, area.width, rows as u16 + 2);
        frame.render_widget(Clear, panel_outer);
        let panel_block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.popup_border);
        let panel_inner = panel_block.inner(panel_outer);
        frame.render_widget(panel_block, panel_outer);
        self.panel_area.set(Some(panel_inner));

        if self.filtered.is_empty() {
            let empty = Paragraph::new(Span::styled("no matches", self.theme.dimmed));
            frame.render_widget(empty, panel_inner);
            return;
        }

        // Nearest-edge scroll: move the viewport just far enough to keep
        // the active row visible.
        let visible = panel_inner.height as usize;
        let mut offset = self.scroll_offset.get();
        if self.active_index < offset {
            offset = self.active_index;
        } else if self.active_index >= offset + visible {
            offset = self.active_index + 1 - visible;
        }
        self.scroll_offset.set(offset);

        let items: Vec<ListItem> = self
            .filtered
            .iter()
            .skip(offset)
            .take(visible)
            .map(|option| {
                let style = if option.active {
                    self.theme.selected
                } else {
                    self.theme.normal
                };
                ListItem::new(Span::styled(option.label.clone(), style))
            })
            .collect();
        frame.render_widget(List::new(items), panel_inner);
    }

    fn input_line(&self, focused: bool) -> Line<'_> {
        if self.filter_text.is_empty() && !focused {
            return Line::from(Span::styled(
                self.placeholder.as_str(),
                self.theme.dimmed,
            ));
        }

        let text_style = if self.disabled {
            self.theme.dimmed
        } else {
            self.theme.normal
        };
        if !focused {
            return Line::from(Span::styled(self.filter_text.as_str(), text_style));
        }

        let (before, after) = self.filter_text.split_at(self.byte_cursor());
        let cursor_len = after.chars().next().map_or(0, char::len_utf8);
        Line::from(vec![
            Span::styled(before, text_style),
            Span::styled(
                if after.is_empty() { "_" } else { &after[..cursor_len] },
                self.theme.selected,
            ),
            Span::styled(&after[cursor_len..], text_style),
        ])
    }
}
