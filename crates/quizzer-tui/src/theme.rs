use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

/// Application theme with styles for every UI element.
#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Style,
    pub border_focused: Style,
    pub selected: Style,
    pub header: Style,
    pub normal: Style,
    pub dimmed: Style,
    pub error: Style,
    pub success: Style,
    pub status_bar: Style,
    pub popup_border: Style,
    pub popup_title: Style,
}

impl Theme {
    /// Default dark theme based on the Catppuccin Mocha palette.
    pub fn dark() -> Self {
        let base = Color::Rgb(30, 30, 46); // #1e1e2e  background
        let surface0 = Color::Rgb(49, 50, 68); // #313244  elevated surfaces
        let surface1 = Color::Rgb(69, 71, 90); // #45475a  selection/active bg
        let overlay0 = Color::Rgb(108, 112, 134); // #6c7086 muted/dim
        let subtext0 = Color::Rgb(166, 173, 200); // #a6adc8 secondary text
        let text = Color::Rgb(205, 214, 244); // #cdd6f4  primary text
        let blue = Color::Rgb(137, 180, 250); // #89b4fa  accent/focus
        let lavender = Color::Rgb(180, 190, 254); // #b4befe secondary accent
        let green = Color::Rgb(166, 227, 161); // #a6e3a1  success
        let red = Color::Rgb(243, 139, 168); // #f38ba8  error
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7  purple accent

        Self {
            border: Style::default().fg(surface1),
            border_focused: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            selected: Style::default().fg(base).bg(blue),
            header: Style::default().fg(lavender).add_modifier(Modifier::BOLD),
            normal: Style::default().fg(text),
            dimmed: Style::default().fg(overlay0),
            error: Style::default().fg(red).add_modifier(Modifier::BOLD),
            success: Style::default().fg(green),
            status_bar: Style::default().fg(subtext0).bg(surface0),
            popup_border: Style::default().fg(mauve),
            popup_title: Style::default().fg(mauve).add_modifier(Modifier::BOLD),
        }
    }

    /// Light theme for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Blue),
            selected: Style::default().fg(Color::White).bg(Color::Blue),
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            normal: Style::default().fg(Color::Black),
            dimmed: Style::default().fg(Color::Gray),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            success: Style::default().fg(Color::Green),
            status_bar: Style::default().fg(Color::Black).bg(Color::Gray),
            popup_border: Style::default().fg(Color::Blue),
            popup_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Load a theme by name.
    pub fn load(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => {
                warn!("Unknown theme '{}', using dark", name);
                Self::dark()
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
