use std::cell::Cell;

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::component::Component;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Error,
}

/// Bottom status line: transient messages on the left, key hints on the right.
pub struct StatusBar {
    theme: Theme,
    message: String,
    level: Level,
    hints: String,
    last_area: Cell<Option<Rect>>,
}

impl StatusBar {
    pub fn new(theme: Theme, hints: impl Into<String>) -> Self {
        Self {
            theme,
            message: String::new(),
            level: Level::Info,
            hints: hints.into(),
            last_area: Cell::new(None),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.level = Level::Info;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.level = Level::Error;
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.level = Level::Info;
    }
}

impl Component for StatusBar {
    fn render(&self, frame: &mut Frame, area: Rect, _focused: bool) {
        self.last_area.set(Some(area));

        let message_style = match self.level {
            Level::Info => self.theme.status_bar,
            Level::Error => self.theme.error,
        };
        // Hints get clipped before the message does; both rects stay
        // inside the given area so narrow terminals render a truncation
        // instead of indexing past the buffer.
        let hint_width = (self.hints.chars().count() as u16 + 1).min(area.width);
        let message_width = area.width.saturating_sub(hint_width);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                self.message.as_str(),
                message_style,
            )))
            .style(self.theme.status_bar),
            Rect::new(area.x, area.y, message_width, area.height),
        );
        if hint_width > 0 {
            frame.render_widget(
                Paragraph::new(Span::styled(self.hints.as_str(), self.theme.status_bar))
                    .right_aligned(),
                Rect::new(area.x + message_width, area.y, hint_width, area.height),
            );
        }
    }

    fn last_area(&self) -> Option<Rect> {
        self.last_area.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_render_in_narrow_terminal() {
        // Hints wider than the terminal must truncate, not overflow.
        let mut bar = StatusBar::new(Theme::dark(), "Ctrl+q: quit  Ctrl+n: new quiz");
        bar.set_message("loading categories");
        let mut terminal = Terminal::new(TestBackend::new(10, 1)).unwrap();
        terminal
            .draw(|frame| bar.render(frame, frame.area(), false))
            .unwrap();
    }

    #[test]
    fn test_render_in_zero_width_area() {
        let bar = StatusBar::new(Theme::dark(), "Ctrl+q: quit");
        let mut terminal = Terminal::new(TestBackend::new(1, 1)).unwrap();
        terminal
            .draw(|frame| bar.render(frame, Rect::new(0, 0, 0, 1), false))
            .unwrap();
    }

    #[test]
    fn test_error_replaces_info_message() {
        let mut bar = StatusBar::new(Theme::dark(), "Ctrl+q: quit");
        bar.set_message("loading");
        bar.set_error("network unreachable");
        assert_eq!(bar.message, "network unreachable");
        assert_eq!(bar.level, Level::Error);
        bar.clear();
        assert!(bar.message.is_empty());
        assert_eq!(bar.level, Level::Info);
    }
}
