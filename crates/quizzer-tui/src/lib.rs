pub mod action;
pub mod app;
pub mod component;
pub mod components;
pub mod config;
pub mod event;
pub mod keymap;
pub mod theme;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use config::AppConfig;
