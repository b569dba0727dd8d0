use quizzer_core::models::{Category, Difficulty, Question};

/// Which screen is currently shown. Navigation between these is the
/// whole routing story of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Maker,
    Quiz,
    Results,
}

/// All actions that can flow through the application.
#[derive(Debug, Clone)]
pub enum Action {
    // System
    Tick,
    Quit,
    Resize(u16, u16),

    // Navigation
    Navigate(Screen),

    // Categories
    CategoriesLoaded(Vec<Category>),

    // Quiz lifecycle
    CreateQuiz {
        category_id: i64,
        difficulty: Difficulty,
    },
    QuizCreated {
        category_id: i64,
        difficulty: Difficulty,
        questions: Vec<Question>,
    },
    ReplaceQuestion(usize),
    QuestionReplaced(usize, Box<Question>),
    SubmitQuiz(Vec<String>),
    PlayAgain,

    // Status
    StatusMessage(String),
    ErrorMessage(String),

    // No-op
    None,
}
