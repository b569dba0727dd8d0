use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use quizzer_core::client::TriviaClient;
use quizzer_core::models::Difficulty;
use quizzer_core::score::compute_score;

use crate::action::{Action, Screen};
use crate::component::Component;
use crate::components::{QuizMaker, QuizPanel, ResultsPanel, StatusBar};
use crate::config::AppConfig;
use crate::event::{poll_event, AppEvent};
use crate::keymap::Keymap;
use crate::theme::Theme;
use crate::tui;

/// The application: owns the screens, the action channel, and the API
/// client. Background fetches run on the runtime and post actions back.
pub struct App {
    config: AppConfig,
    keymap: Keymap,
    client: Arc<TriviaClient>,
    screen: Screen,
    maker: QuizMaker,
    quiz: QuizPanel,
    results: ResultsPanel,
    status_bar: StatusBar,
    // Remembered so a question swap refetches with the same parameters.
    quiz_params: Option<(i64, Difficulty)>,
    should_quit: bool,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let theme = Theme::load(&config.general.theme);
        let keymap = Keymap::from_config(&config.keybindings);
        let client = Arc::new(TriviaClient::new(config.general.api_url.clone())?);
        let debounce = Duration::from_millis(config.general.filter_debounce_ms);

        let hints = format!(
            "{}: quit  {}: new quiz",
            keymap.hint("quit"),
            keymap.hint("new_quiz")
        );

        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Ok(Self {
            maker: QuizMaker::new(theme.clone(), debounce),
            quiz: QuizPanel::new(theme.clone()),
            results: ResultsPanel::new(theme.clone()),
            status_bar: StatusBar::new(theme, hints),
            config,
            keymap,
            client,
            screen: Screen::Maker,
            quiz_params: None,
            should_quit: false,
            action_tx,
            action_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        tui::install_panic_hook();
        let mut terminal = tui::init()?;
        info!("terminal initialized");

        self.spawn_fetch_categories();
        let tick_rate = Duration::from_millis(self.config.general.tick_rate_ms);

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            if let Some(event) = poll_event(tick_rate)? {
                let action = self.handle_event(event);
                self.dispatch(action);
            }
            while let Ok(action) = self.action_rx.try_recv() {
                self.dispatch(action);
            }
        }

        tui::restore()?;
        info!("terminal restored, exiting");
        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) -> Action {
        match event {
            AppEvent::Tick => Action::Tick,
            AppEvent::Resize(w, h) => Action::Resize(w, h),
            AppEvent::Key(key) => {
                let global = self.keymap.resolve_global(&key);
                if !matches!(global, Action::None) {
                    return global;
                }
                match self.screen {
                    Screen::Maker => self.maker.handle_key_event(key),
                    Screen::Quiz => self.quiz.handle_key_event(key),
                    Screen::Results => self.results.handle_key_event(key),
                }
            }
            AppEvent::Mouse(mouse) => match self.screen {
                Screen::Maker => self.maker.handle_mouse_event(mouse),
                Screen::Quiz => self.quiz.handle_mouse_event(mouse),
                Screen::Results => self.results.handle_mouse_event(mouse),
            },
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Tick => {
                self.maker.tick();
            }
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) | Action::None => {}
            Action::Navigate(screen) => {
                self.screen = screen;
            }
            Action::CategoriesLoaded(categories) => {
                info!(count = categories.len(), "categories loaded");
                self.maker.set_categories(categories);
                self.status_bar.clear();
            }
            Action::CreateQuiz {
                category_id,
                difficulty,
            } => {
                self.status_bar.set_message("Creating quiz...");
                self.spawn_create_quiz(category_id, difficulty);
            }
            Action::QuizCreated {
                category_id,
                difficulty,
                questions,
            } => {
                info!(category_id, %difficulty, count = questions.len(), "quiz created");
                self.quiz_params = Some((category_id, difficulty));
                self.quiz.set_questions(questions);
                self.maker.set_creating(false);
                self.status_bar.clear();
                self.screen = Screen::Quiz;
            }
            Action::ReplaceQuestion(index) => match self.quiz_params {
                Some((category_id, difficulty)) => {
                    self.status_bar.set_message("Swapping question...");
                    self.spawn_replace_question(index, category_id, difficulty);
                }
                None => self.quiz.swap_failed(),
            },
            Action::QuestionReplaced(index, question) => {
                self.quiz.question_replaced(index, *question);
                self.status_bar.clear();
            }
            Action::SubmitQuiz(answers) => {
                let results = compute_score(self.quiz.questions(), &answers);
                info!(score = results.score, total = results.questions.len(), "quiz submitted");
                self.results.set_results(results);
                self.screen = Screen::Results;
            }
            Action::PlayAgain => {
                self.maker.reset();
                self.quiz_params = None;
                self.status_bar.clear();
                self.screen = Screen::Maker;
            }
            Action::StatusMessage(message) => {
                self.status_bar.set_message(message);
            }
            Action::ErrorMessage(message) => {
                error!("{}", message);
                self.status_bar.set_error(message);
                self.maker.set_creating(false);
                if self.quiz.swap_pending() {
                    self.quiz.swap_failed();
                }
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());

        match self.screen {
            Screen::Maker => self.maker.render(frame, chunks[0], true),
            Screen::Quiz => self.quiz.render(frame, chunks[0], true),
            Screen::Results => self.results.render(frame, chunks[0], true),
        }
        self.status_bar.render(frame, chunks[1], false);
    }

    fn spawn_fetch_categories(&self) {
        let client = Arc::clone(&self.client);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match client.fetch_categories().await {
                Ok(categories) => Action::CategoriesLoaded(categories),
                Err(e) => Action::ErrorMessage(format!("Failed to load categories: {e}")),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_create_quiz(&self, category_id: i64, difficulty: Difficulty) {
        let client = Arc::clone(&self.client);
        let tx = self.action_tx.clone();
        let amount = self.config.general.question_count;
        tokio::spawn(async move {
            let action = match client.create_quiz(category_id, difficulty, amount).await {
                Ok(questions) => Action::QuizCreated {
                    category_id,
                    difficulty,
                    questions,
                },
                Err(e) => Action::ErrorMessage(format!("Failed to create quiz: {e}")),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_replace_question(&self, index: usize, category_id: i64, difficulty: Difficulty) {
        let client = Arc::clone(&self.client);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match client.fetch_question(category_id, difficulty).await {
                Ok(Some(question)) => Action::QuestionReplaced(index, Box::new(question)),
                Ok(None) => Action::ErrorMessage("No replacement question available".to_string()),
                Err(e) => Action::ErrorMessage(format!("Failed to swap question: {e}")),
            };
            let _ = tx.send(action);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizzer_core::models::{Category, Question};

    fn app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    fn question(text: &str) -> Question {
        Question {
            question: text.to_string(),
            correct_answer: "a".to_string(),
            incorrect_answers: vec!["b".to_string()],
            all_answers: vec!["a".to_string(), "b".to_string()],
        }
    }

    #[tokio::test]
    async fn test_quiz_created_navigates_to_quiz() {
        let mut app = app();
        app.dispatch(Action::QuizCreated {
            category_id: 9,
            difficulty: Difficulty::Easy,
            questions: vec![question("Q1")],
        });
        assert_eq!(app.screen, Screen::Quiz);
        assert_eq!(app.quiz_params, Some((9, Difficulty::Easy)));
    }

    #[tokio::test]
    async fn test_submit_scores_and_navigates_to_results() {
        let mut app = app();
        app.dispatch(Action::QuizCreated {
            category_id: 9,
            difficulty: Difficulty::Easy,
            questions: vec![question("Q1"), question("Q2")],
        });
        app.dispatch(Action::SubmitQuiz(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(app.screen, Screen::Results);
    }

    #[tokio::test]
    async fn test_play_again_returns_to_maker() {
        let mut app = app();
        app.dispatch(Action::Navigate(Screen::Results));
        app.dispatch(Action::PlayAgain);
        assert_eq!(app.screen, Screen::Maker);
        assert_eq!(app.quiz_params, None);
    }

    #[tokio::test]
    async fn test_categories_loaded_fills_maker() {
        let mut app = app();
        app.dispatch(Action::CategoriesLoaded(vec![Category::leaf(9, "General")]));
        // A loaded dataset means the maker form is usable.
        assert_eq!(app.screen, Screen::Maker);
    }

    #[tokio::test]
    async fn test_quit_action() {
        let mut app = app();
        app.dispatch(Action::Quit);
        assert!(app.should_quit);
    }
}
