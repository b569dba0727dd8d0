use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::config::KeybindingConfig;

/// A parsed keybinding: modifiers plus a key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    modifiers: KeyModifiers,
    code: KeyCode,
}

impl Binding {
    fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.modifiers
    }
}

/// Parse a key string like "Ctrl+q", "Alt+n", "F2", or "q".
/// Unparseable strings fall back to the unbound Null key.
fn parse_binding(spec: &str) -> Binding {
    let mut modifiers = KeyModifiers::NONE;
    let mut code = KeyCode::Null;

    for part in spec.split('+') {
        match part.trim().to_lowercase().as_str() {
            "ctrl" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            key => {
                code = match key {
                    "tab" => KeyCode::Tab,
                    "enter" => KeyCode::Enter,
                    "esc" | "escape" => KeyCode::Esc,
                    k if k.len() == 1 => KeyCode::Char(k.chars().next().unwrap()),
                    k => k
                        .strip_prefix('f')
                        .and_then(|n| n.parse::<u8>().ok())
                        .map(KeyCode::F)
                        .unwrap_or(KeyCode::Null),
                };
            }
        }
    }

    Binding { modifiers, code }
}

/// Global keybindings resolved from config strings.
pub struct Keymap {
    quit: Binding,
    force_quit: Binding,
    new_quiz: Binding,
    hints: KeybindingConfig,
}

impl Keymap {
    pub fn from_config(config: &KeybindingConfig) -> Self {
        Self {
            quit: parse_binding(&config.quit),
            force_quit: parse_binding(&config.force_quit),
            new_quiz: parse_binding(&config.new_quiz),
            hints: config.clone(),
        }
    }

    /// Resolve a key event against the global bindings only. Screen-local
    /// keys (typing, navigation, answers) are handled by the components.
    pub fn resolve_global(&self, key: &KeyEvent) -> Action {
        if self.quit.matches(key) || self.force_quit.matches(key) {
            Action::Quit
        } else if self.new_quiz.matches(key) {
            Action::PlayAgain
        } else {
            Action::None
        }
    }

    /// The configured key string for a named binding, for status-bar hints.
    pub fn hint(&self, name: &str) -> &str {
        match name {
            "quit" => &self.hints.quit,
            "new_quiz" => &self.hints.new_quiz,
            _ => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_ctrl_binding() {
        let b = parse_binding("Ctrl+q");
        assert_eq!(b.modifiers, KeyModifiers::CONTROL);
        assert_eq!(b.code, KeyCode::Char('q'));
    }

    #[test]
    fn test_parse_function_key() {
        let b = parse_binding("F2");
        assert_eq!(b.modifiers, KeyModifiers::NONE);
        assert_eq!(b.code, KeyCode::F(2));
    }

    #[test]
    fn test_parse_garbage_is_unbound() {
        let b = parse_binding("NotAKey");
        assert_eq!(b.code, KeyCode::Null);
    }

    #[test]
    fn test_resolve_quit() {
        let keymap = Keymap::from_config(&KeybindingConfig::default());
        let action = keymap.resolve_global(&key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(matches!(action, Action::Quit));
    }

    #[test]
    fn test_resolve_force_quit() {
        let keymap = Keymap::from_config(&KeybindingConfig::default());
        let action = keymap.resolve_global(&key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(action, Action::Quit));
    }

    #[test]
    fn test_resolve_new_quiz() {
        let keymap = Keymap::from_config(&KeybindingConfig::default());
        let action = keymap.resolve_global(&key(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert!(matches!(action, Action::PlayAgain));
    }

    #[test]
    fn test_plain_char_does_not_quit() {
        // Plain characters must reach text inputs untouched.
        let keymap = Keymap::from_config(&KeybindingConfig::default());
        let action = keymap.resolve_global(&key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(matches!(action, Action::None));
    }
}
