use std::cell::Cell;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use strum::IntoEnumIterator;
use tracing::debug;

use quizzer_core::models::{Category, Difficulty};

use crate::action::Action;
use crate::component::Component;
use crate::theme::Theme;
use crate::widgets::{AutoFilter, AutoFilterEvent};

/// Which form control holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MakerFocus {
    Category,
    Subcategory,
    Difficulty,
    Create,
}

impl MakerFocus {
    fn next(self, subcategory_visible: bool) -> Self {
        match self {
            Self::Category if subcategory_visible => Self::Subcategory,
            Self::Category => Self::Difficulty,
            Self::Subcategory => Self::Difficulty,
            Self::Difficulty => Self::Create,
            Self::Create => Self::Category,
        }
    }

    fn prev(self, subcategory_visible: bool) -> Self {
        match self {
            Self::Category => Self::Create,
            Self::Subcategory => Self::Category,
            Self::Difficulty if subcategory_visible => Self::Subcategory,
            Self::Difficulty => Self::Category,
            Self::Create => Self::Difficulty,
        }
    }
}

/// The quiz creation form: category, an optional subcategory that appears
/// when the picked category is a synthetic parent, difficulty, and a
/// create button.
pub struct QuizMaker {
    theme: Theme,
    category: AutoFilter<Category>,
    subcategory: AutoFilter<Category>,
    difficulty: AutoFilter<Difficulty>,
    subcategory_visible: bool,
    focus: MakerFocus,
    loading_categories: bool,
    creating: bool,
    error: Option<String>,
    button_area: Cell<Option<Rect>>,
    last_area: Cell<Option<Rect>>,
}

impl QuizMaker {
    pub fn new(theme: Theme, filter_debounce: Duration) -> Self {
        let mut category = AutoFilter::with_display(theme.clone(), Category::display_name);
        category.set_placeholder("Select a category");
        category.set_debounce(filter_debounce);

        let mut subcategory = AutoFilter::with_display(theme.clone(), Category::display_name);
        subcategory.set_placeholder("Select a subcategory");
        subcategory.set_debounce(filter_debounce);

        let mut difficulty = AutoFilter::new(theme.clone());
        difficulty.set_placeholder("Select difficulty");
        difficulty.set_debounce(filter_debounce);
        difficulty.set_dataset(Some(Difficulty::iter().collect()));

        Self {
            theme,
            category,
            subcategory,
            difficulty,
            subcategory_visible: false,
            focus: MakerFocus::Category,
            loading_categories: true,
            creating: false,
            error: None,
            button_area: Cell::new(None),
            last_area: Cell::new(None),
        }
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.loading_categories = false;
        self.category.set_dataset(Some(categories));
    }

    pub fn set_creating(&mut self, creating: bool) {
        self.creating = creating;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.creating = false;
        self.error = Some(message.into());
    }

    /// Back to a blank form, keeping the loaded category dataset.
    pub fn reset(&mut self) {
        self.category.write_value(None);
        self.subcategory.set_dataset(None);
        self.subcategory_visible = false;
        self.difficulty.write_value(None);
        self.focus = MakerFocus::Category;
        self.creating = false;
        self.error = None;
        self.sync_selections();
    }

    /// Drive the filter debounce of every hosted widget.
    pub fn tick(&mut self) {
        self.category.tick();
        self.subcategory.tick();
        self.difficulty.tick();
    }

    fn focused_widget(&mut self) -> Option<&mut AutoFilter<Category>> {
        match self.focus {
            MakerFocus::Category => Some(&mut self.category),
            MakerFocus::Subcategory => Some(&mut self.subcategory),
            _ => None,
        }
    }

    fn move_focus(&mut self, forward: bool) {
        self.focus = if forward {
            self.focus.next(self.subcategory_visible)
        } else {
            self.focus.prev(self.subcategory_visible)
        };
        match self.focus {
            MakerFocus::Category => self.category.focus(),
            MakerFocus::Subcategory => self.subcategory.focus(),
            MakerFocus::Difficulty => self.difficulty.focus(),
            MakerFocus::Create => {}
        }
    }

    /// React to selection changes queued by the hosted widgets. Picking a
    /// synthetic parent category reveals the subcategory control bound to
    /// that parent's children.
    fn sync_selections(&mut self) {
        for event in self.category.drain_events() {
            if let AutoFilterEvent::SelectionChanged(selection) = event {
                match selection {
                    Some(category) if category.needs_subcategory() => {
                        debug!(parent = %category.name, "subcategory required");
                        self.subcategory_visible = true;
                        self.subcategory.set_dataset(Some(category.children));
                    }
                    _ => {
                        self.subcategory_visible = false;
                        self.subcategory.set_dataset(None);
                        self.subcategory.write_value(None);
                        self.subcategory.drain_events();
                    }
                }
            }
        }
        self.subcategory.drain_events();
        self.difficulty.drain_events();
    }

    /// Validate the form and request quiz creation.
    fn create_quiz(&mut self) -> Action {
        if self.creating {
            return Action::None;
        }
        let Some(category) = self.category.value().cloned() else {
            self.error = Some("Pick a category first".to_string());
            return Action::None;
        };
        let category_id = if category.needs_subcategory() {
            match self.subcategory.value() {
                Some(sub) => sub.id,
                None => {
                    self.error = Some("Pick a subcategory first".to_string());
                    return Action::None;
                }
            }
        } else {
            category.id
        };
        let Some(difficulty) = self.difficulty.value().copied() else {
            self.error = Some("Pick a difficulty first".to_string());
            return Action::None;
        };

        self.creating = true;
        self.error = None;
        Action::CreateQuiz {
            category_id,
            difficulty,
        }
    }

    fn widget_rects(&self, area: Rect) -> (Rect, Option<Rect>, Rect, Rect) {
        // Header row, then stacked inputs. Each widget gets the rest of the
        // screen below its input row so an open panel has room to draw.
        let column = |y: u16| {
            Rect::new(
                area.x,
                y,
                area.width,
                area.bottom().saturating_sub(y),
            )
        };
        let mut y = area.y + 2;
        let category = column(y);
        y += 4;
        let subcategory = if self.subcategory_visible {
            let rect = column(y);
            y += 4;
            Some(rect)
        } else {
            None
        };
        let difficulty = column(y);
        y += 4;
        let button = Rect::new(area.x, y, area.width.min(20), 3);
        (category, subcategory, difficulty, button)
    }
}

impl Component for QuizMaker {
    fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        let action = match key.code {
            KeyCode::BackTab => {
                if let Some(widget) = self.focused_widget() {
                    widget.close_panel();
                } else if self.focus == MakerFocus::Difficulty {
                    self.difficulty.close_panel();
                }
                self.move_focus(false);
                Action::None
            }
            KeyCode::Enter if self.focus == MakerFocus::Create => self.create_quiz(),
            _ => {
                let consumed = match self.focus {
                    MakerFocus::Category => self.category.handle_key_event(key),
                    MakerFocus::Subcategory => self.subcategory.handle_key_event(key),
                    MakerFocus::Difficulty => self.difficulty.handle_key_event(key),
                    MakerFocus::Create => false,
                };
                if !consumed && key.code == KeyCode::Tab {
                    self.move_focus(true);
                }
                Action::None
            }
        };
        self.sync_selections();
        action
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Action {
        let mut action = Action::None;

        if self.category.handle_mouse_event(&mouse) {
            self.focus = MakerFocus::Category;
        } else if self.subcategory_visible && self.subcategory.handle_mouse_event(&mouse) {
            self.focus = MakerFocus::Subcategory;
        } else if self.difficulty.handle_mouse_event(&mouse) {
            self.focus = MakerFocus::Difficulty;
        } else if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            // A press outside every widget closes whichever panel is open.
            if self.category.is_open() {
                self.category.close_panel();
            }
            if self.subcategory.is_open() {
                self.subcategory.close_panel();
            }
            if self.difficulty.is_open() {
                self.difficulty.close_panel();
            }
            let position = Position::new(mouse.column, mouse.row);
            if self
                .button_area
                .get()
                .is_some_and(|rect| rect.contains(position))
            {
                self.focus = MakerFocus::Create;
                action = self.create_quiz();
            }
        }

        self.sync_selections();
        action
    }

    fn render(&self, frame: &mut Frame, area: Rect, _focused: bool) {
        self.last_area.set(Some(area));

        let title = if self.loading_categories {
            "Quiz Maker (loading categories...)"
        } else {
            "Quiz Maker"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(title, self.theme.header)),
            Rect::new(area.x, area.y, area.width, 1),
        );

        let (category_area, subcategory_area, difficulty_area, button_area) =
            self.widget_rects(area);

        // Unfocused widgets first so the focused one's panel draws on top.
        let order = [
            MakerFocus::Category,
            MakerFocus::Subcategory,
            MakerFocus::Difficulty,
        ];
        for control in order.iter().filter(|c| **c != self.focus) {
            match control {
                MakerFocus::Category => self.category.render(frame, category_area, false),
                MakerFocus::Subcategory => {
                    if let Some(rect) = subcategory_area {
                        self.subcategory.render(frame, rect, false);
                    }
                }
                MakerFocus::Difficulty => self.difficulty.render(frame, difficulty_area, false),
                MakerFocus::Create => {}
            }
        }
        match self.focus {
            MakerFocus::Category => self.category.render(frame, category_area, true),
            MakerFocus::Subcategory => {
                if let Some(rect) = subcategory_area {
                    self.subcategory.render(frame, rect, true);
                }
            }
            MakerFocus::Difficulty => self.difficulty.render(frame, difficulty_area, true),
            MakerFocus::Create => {}
        }

        if button_area.bottom() <= area.bottom() {
            self.button_area.set(Some(button_area));
            let label = if self.creating {
                "Creating..."
            } else {
                "[ Create Quiz ]"
            };
            let style = if self.creating {
                self.theme.dimmed
            } else if self.focus == MakerFocus::Create {
                self.theme.selected
            } else {
                self.theme.normal
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(label, style))).centered(),
                Rect::new(button_area.x, button_area.y + 1, button_area.width, 1),
            );
        } else {
            self.button_area.set(None);
        }

        if let Some(error) = &self.error {
            let y = area.bottom().saturating_sub(1);
            frame.render_widget(
                Paragraph::new(Span::styled(error.as_str(), self.theme.error)),
                Rect::new(area.x, y, area.width, 1),
            );
        }
    }

    fn last_area(&self) -> Option<Rect> {
        self.last_area.get()
    }
}
