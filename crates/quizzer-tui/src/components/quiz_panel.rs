use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tracing::info;

use quizzer_core::models::Question;

use crate::action::Action;
use crate::component::Component;
use crate::theme::Theme;

/// The running quiz: every question with its shuffled answers, a cursor,
/// and a one-time question swap.
pub struct QuizPanel {
    theme: Theme,
    questions: Vec<Question>,
    answers: Vec<Option<String>>,
    current: usize,
    answer_cursor: usize,
    swap_used: bool,
    swap_pending: bool,
    scroll: Cell<u16>,
    last_area: Cell<Option<Rect>>,
}

impl QuizPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            questions: Vec::new(),
            answers: Vec::new(),
            current: 0,
            answer_cursor: 0,
            swap_used: false,
            swap_pending: false,
            scroll: Cell::new(0),
            last_area: Cell::new(None),
        }
    }

    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.current = 0;
        self.answer_cursor = 0;
        self.swap_used = false;
        self.swap_pending = false;
        self.scroll.set(0);
    }

    /// Swap in the replacement question. The old answer is discarded and
    /// the swap is spent whether or not the player re-answers.
    pub fn question_replaced(&mut self, index: usize, question: Question) {
        if index >= self.questions.len() {
            return;
        }
        info!(index, "question swapped");
        self.questions[index] = question;
        self.answers[index] = None;
        self.swap_pending = false;
        if self.current == index {
            self.answer_cursor = 0;
        }
    }

    pub fn swap_failed(&mut self) {
        // Fetch failed: give the swap back.
        self.swap_pending = false;
        self.swap_used = false;
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn swap_pending(&self) -> bool {
        self.swap_pending
    }

    fn all_answered(&self) -> bool {
        !self.answers.is_empty() && self.answers.iter().all(Option::is_some)
    }

    fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    fn choose_answer(&mut self) {
        let Some(answer) = self
            .current_question()
            .and_then(|q| q.all_answers.get(self.answer_cursor))
            .cloned()
        else {
            return;
        };
        self.answers[self.current] = Some(answer);

        // Jump to the next unanswered question, if any.
        if let Some(next) = self
            .answers
            .iter()
            .enumerate()
            .cycle()
            .skip(self.current + 1)
            .take(self.answers.len())
            .find_map(|(i, a)| a.is_none().then_some(i))
        {
            self.current = next;
            self.answer_cursor = 0;
        }
    }

    fn request_swap(&mut self) -> Action {
        if self.swap_used || self.questions.is_empty() {
            return Action::None;
        }
        self.swap_used = true;
        self.swap_pending = true;
        Action::ReplaceQuestion(self.current)
    }

    fn submit(&mut self) -> Action {
        if !self.all_answered() {
            return Action::None;
        }
        let answers = self.answers.iter().flatten().cloned().collect();
        Action::SubmitQuiz(answers)
    }

    fn question_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        for (qi, question) in self.questions.iter().enumerate() {
            let marker = if self.answers[qi].is_some() { "*" } else { " " };
            let header_style = if qi == self.current {
                self.theme.header
            } else {
                self.theme.dimmed
            };
            lines.push(Line::from(Span::styled(
                format!("{marker} {}. {}", qi + 1, question.question),
                header_style,
            )));

            for (ai, answer) in question.all_answers.iter().enumerate() {
                let chosen = self.answers[qi].as_deref() == Some(answer.as_str());
                let cursor_here = qi == self.current && ai == self.answer_cursor;
                let bullet = if chosen { "(x)" } else { "( )" };
                let style = if cursor_here {
                    self.theme.selected
                } else if chosen {
                    self.theme.success
                } else {
                    self.theme.normal
                };
                lines.push(Line::from(Span::styled(
                    format!("    {bullet} {answer}"),
                    style,
                )));
            }
            lines.push(Line::default());
        }
        lines
    }

    /// First line of the current question, for keeping it scrolled into view.
    fn current_question_line(&self) -> usize {
        self.questions
            .iter()
            .take(self.current)
            .map(|q| q.all_answers.len() + 2)
            .sum()
    }
}

impl Component for QuizPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        let Some(question) = self.current_question() else {
            return Action::None;
        };
        let answer_count = question.all_answers.len();

        match key.code {
            KeyCode::Down => {
                if self.answer_cursor + 1 < answer_count {
                    self.answer_cursor += 1;
                }
                Action::None
            }
            KeyCode::Up => {
                self.answer_cursor = self.answer_cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.choose_answer();
                Action::None
            }
            KeyCode::Tab | KeyCode::Right => {
                if self.current + 1 < self.questions.len() {
                    self.current += 1;
                    self.answer_cursor = 0;
                }
                Action::None
            }
            KeyCode::BackTab | KeyCode::Left => {
                if self.current > 0 {
                    self.current -= 1;
                    self.answer_cursor = 0;
                }
                Action::None
            }
            KeyCode::Char('r') => self.request_swap(),
            KeyCode::Char('s') => self.submit(),
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

        let answered = self.answers.iter().flatten().count();
        let swap_hint = if self.swap_used {
            String::new()
        } else {
            "  r: swap question".to_string()
        };
        let submit_hint = if self.all_answered() {
            "  s: submit"
        } else {
            ""
        };
        let title = format!(
            " Quiz  {answered}/{} answered{swap_hint}{submit_hint} ",
            self.questions.len()
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_focused)
            .title(Span::styled(title, self.theme.header));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.swap_pending {
            frame.render_widget(
                Paragraph::new(Span::styled("Fetching a new question...", self.theme.dimmed)),
                inner,
            );
            return;
        }

        // Keep the current question's first line inside the viewport.
        let target = self.current_question_line() as u16;
        let mut scroll = self.scroll.get();
        if target < scroll {
            scroll = target;
        } else if target >= scroll + inner.height {
            scroll = target + 1 - inner.height;
        }
        self.scroll.set(scroll);

        frame.render_widget(
            Paragraph::new(self.question_lines()).scroll((scroll, 0)),
            inner,
        );
    }

    fn last_area(&self) -> Option<Rect> {
        self.last_area.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct: &str, wrong: &[&str]) -> Question {
        let mut all: Vec<String> = wrong.iter().map(|s| s.to_string()).collect();
        all.push(correct.to_string());
        Question {
            question: text.to_string(),
            correct_answer: correct.to_string(),
            incorrect_answers: wrong.iter().map(|s| s.to_string()).collect(),
            all_answers: all,
        }
    }

    fn panel() -> QuizPanel {
        let mut panel = QuizPanel::new(Theme::dark());
        panel.set_questions(vec![
            question("Q1", "a", &["b", "c", "d"]),
            question("Q2", "x", &["y", "z", "w"]),
        ]);
        panel
    }

    fn press(panel: &mut QuizPanel, code: KeyCode) -> Action {
        panel.handle_key_event(KeyEvent::from(code))
    }

    #[test]
    fn test_choose_answer_advances_to_next_unanswered() {
        let mut panel = panel();
        press(&mut panel, KeyCode::Down);
        press(&mut panel, KeyCode::Enter);
        assert_eq!(panel.answers[0].as_deref(), Some("c"));
        assert_eq!(panel.current, 1);
        assert_eq!(panel.answer_cursor, 0);
    }

    #[test]
    fn test_cursor_stays_in_answer_bounds() {
        let mut panel = panel();
        for _ in 0..10 {
            press(&mut panel, KeyCode::Down);
        }
        assert_eq!(panel.answer_cursor, 3);
        for _ in 0..10 {
            press(&mut panel, KeyCode::Up);
        }
        assert_eq!(panel.answer_cursor, 0);
    }

    #[test]
    fn test_submit_blocked_until_all_answered() {
        let mut panel = panel();
        assert!(matches!(press(&mut panel, KeyCode::Char('s')), Action::None));

        press(&mut panel, KeyCode::Enter); // Q1 -> "b", advances to Q2
        press(&mut panel, KeyCode::Enter); // Q2 -> "y"
        match press(&mut panel, KeyCode::Char('s')) {
            Action::SubmitQuiz(answers) => assert_eq!(answers, vec!["b", "y"]),
            other => panic!("expected SubmitQuiz, got {other:?}"),
        }
    }

    #[test]
    fn test_swap_only_once() {
        let mut panel = panel();
        match press(&mut panel, KeyCode::Char('r')) {
            Action::ReplaceQuestion(index) => assert_eq!(index, 0),
            other => panic!("expected ReplaceQuestion, got {other:?}"),
        }
        assert!(matches!(press(&mut panel, KeyCode::Char('r')), Action::None));
    }

    #[test]
    fn test_question_replaced_clears_old_answer() {
        let mut panel = panel();
        press(&mut panel, KeyCode::Enter); // answers Q1
        press(&mut panel, KeyCode::Left); // back to Q1
        press(&mut panel, KeyCode::Char('r'));
        panel.question_replaced(0, question("Q1b", "n", &["m", "o", "p"]));

        assert_eq!(panel.questions[0].question, "Q1b");
        assert!(panel.answers[0].is_none());
        assert!(panel.swap_used);
        assert!(!panel.swap_pending);
    }

    #[test]
    fn test_failed_swap_is_refunded() {
        let mut panel = panel();
        press(&mut panel, KeyCode::Char('r'));
        panel.swap_failed();
        assert!(matches!(
            press(&mut panel, KeyCode::Char('r')),
            Action::ReplaceQuestion(0)
        ));
    }

    #[test]
    fn test_question_navigation() {
        let mut panel = panel();
        press(&mut panel, KeyCode::Tab);
        assert_eq!(panel.current, 1);
        press(&mut panel, KeyCode::Tab);
        assert_eq!(panel.current, 1); // no wrap
        press(&mut panel, KeyCode::BackTab);
        assert_eq!(panel.current, 0);
    }

    #[test]
    fn test_empty_quiz_ignores_keys() {
        let mut panel = QuizPanel::new(Theme::dark());
        assert!(matches!(press(&mut panel, KeyCode::Enter), Action::None));
        assert!(matches!(press(&mut panel, KeyCode::Char('s')), Action::None));
    }
}
