pub mod quiz_maker;
pub mod quiz_panel;
pub mod results_panel;
pub mod status_bar;

pub use quiz_maker::QuizMaker;
pub use quiz_panel::QuizPanel;
pub use results_panel::ResultsPanel;
pub use status_bar::StatusBar;
