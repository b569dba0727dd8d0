use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use quizzer_core::models::QuizResults;

use crate::action::Action;
use crate::component::Component;
use crate::theme::Theme;

/// Post-submit review: every question with the given and correct answers,
/// plus the score.
pub struct ResultsPanel {
    theme: Theme,
    results: Option<QuizResults>,
    scroll: Cell<u16>,
    last_area: Cell<Option<Rect>>,
}

impl ResultsPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            results: None,
            scroll: Cell::new(0),
            last_area: Cell::new(None),
        }
    }

    pub fn set_results(&mut self, results: QuizResults) {
        self.results = Some(results);
        self.scroll.set(0);
    }

    fn result_lines<'a>(&'a self, results: &'a QuizResults) -> Vec<Line<'a>> {
        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "You scored {} out of {}",
                    results.score,
                    results.questions.len()
                ),
                self.theme.header,
            )),
            Line::default(),
        ];

        for (question, given) in results.questions.iter().zip(&results.answers) {
            let correct = *given == question.correct_answer;
            lines.push(Line::from(Span::styled(
                question.question.as_str(),
                self.theme.normal,
            )));
            let (mark, style) = if correct {
                ("+", self.theme.success)
            } else {
                ("-", self.theme.error)
            };
            lines.push(Line::from(Span::styled(
                format!("  {mark} your answer: {given}"),
                style,
            )));
            if !correct {
                lines.push(Line::from(Span::styled(
                    format!("    correct answer: {}", question.correct_answer),
                    self.theme.success,
                )));
            }
            lines.push(Line::default());
        }

        lines.push(Line::from(Span::styled(
            "Enter: play again",
            self.theme.dimmed,
        )));
        lines
    }
}

impl Component for ResultsPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Char('n') => Action::PlayAgain,
            KeyCode::Down => {
                self.scroll.set(self.scroll.get().saturating_add(1));
                Action::None
            }
            KeyCode::Up => {
                self.scroll.set(self.scroll.get().saturating_sub(1));
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Action {
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.scroll.set(self.scroll.get().saturating_add(1));
            }
            MouseEventKind::ScrollUp => {
                self.scroll.set(self.scroll.get().saturating_sub(1));
            }
            _ => {}
        }
        Action::None
    }

    fn render(&self, frame: &mut Frame, area: Rect, _focused: bool) {
        self.last_area.set(Some(area));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_focused)
            .title(Span::styled(" Results ", self.theme.header));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(results) = &self.results else {
            return;
        };
        frame.render_widget(
            Paragraph::new(self.result_lines(results)).scroll((self.scroll.get(), 0)),
            inner,
        );
    }

    fn last_area(&self) -> Option<Rect> {
        self.last_area.get()
    }
}
