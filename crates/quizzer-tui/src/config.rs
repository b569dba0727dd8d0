use serde::Deserialize;

use quizzer_core::client::DEFAULT_API_URL;

/// Configurable keybindings for global shortcuts.
/// Each field holds a key string like "Ctrl+q", "Alt+n", "F2", etc.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: String,
    pub force_quit: String,
    pub new_quiz: String,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: "Ctrl+q".to_string(),
            force_quit: "Ctrl+c".to_string(),
            new_quiz: "Ctrl+n".to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_question_count")]
    pub question_count: u8,
    #[serde(default = "default_filter_debounce")]
    pub filter_debounce_ms: u64,
}

fn default_theme() -> String {
    "dark".to_string()
}
fn default_tick_rate() -> u64 {
    50
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_question_count() -> u8 {
    5
}
fn default_filter_debounce() -> u64 {
    100
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate(),
            log_level: default_log_level(),
            api_url: default_api_url(),
            question_count: default_question_count(),
            filter_debounce_ms: default_filter_debounce(),
        }
    }
}

impl AppConfig {
    /// Load config from ~/.config/quizzer/config.toml, with fallback to defaults.
    pub fn load() -> Self {
        let config_path = dirs::config_dir()
            .map(|d| d.join("quizzer").join("config.toml"))
            .unwrap_or_default();

        if config_path.exists() {
            if let Ok(content) = std::fs::read_to_string(&config_path) {
                if let Ok(config) = toml::from_str::<AppConfig>(&content) {
                    return config;
                }
            }
        }

        Self::default()
    }

    /// Load config from an explicit path; any failure falls back to defaults.
    pub fn load_from(path: &str) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Parse config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.general.theme, "dark");
        assert_eq!(config.general.tick_rate_ms, 50);
        assert_eq!(config.general.api_url, "https://opentdb.com");
        assert_eq!(config.general.question_count, 5);
        assert_eq!(config.general.filter_debounce_ms, 100);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[general]
theme = "light"
"#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.general.theme, "light");
        // Non-specified fields keep defaults
        assert_eq!(config.general.question_count, 5);
        assert_eq!(config.keybindings.quit, "Ctrl+q");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[general]
theme = "light"
tick_rate_ms = 100
log_level = "debug"
api_url = "http://localhost:9000"
question_count = 10
filter_debounce_ms = 250

[keybindings]
quit = "Alt+q"
new_quiz = "F2"
"#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.general.api_url, "http://localhost:9000");
        assert_eq!(config.general.question_count, 10);
        assert_eq!(config.general.filter_debounce_ms, 250);
        assert_eq!(config.keybindings.quit, "Alt+q");
        assert_eq!(config.keybindings.new_quiz, "F2");
        assert_eq!(config.keybindings.force_quit, "Ctrl+c");
    }

    #[test]
    fn test_keybindings_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.keybindings.quit, "Ctrl+q");
        assert_eq!(config.keybindings.force_quit, "Ctrl+c");
        assert_eq!(config.keybindings.new_quiz, "Ctrl+n");
    }
}
