use serde::Deserialize;
use strum::{Display, EnumIter};

/// A category exactly as the API returns it: flat, with composite names
/// like "Entertainment: Books".
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategory {
    pub id: i64,
    pub name: String,
}

/// A restructured category. Composite API names are split into a parent
/// with children; a synthetic parent carries `id == -1` and cannot be
/// queried directly — one of its children must be picked instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub children: Vec<Category>,
}

impl Category {
    pub fn leaf(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Whether picking this category requires picking a child too.
    pub fn needs_subcategory(&self) -> bool {
        self.id == -1
    }

    /// Display function handed to the auto-filter widget.
    pub fn display_name(&self) -> String {
        self.name.clone()
    }
}

/// A question exactly as the API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiQuestion {
    pub category: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// A shaped question: the answer set is pre-shuffled once so the order is
/// stable for the lifetime of the quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub all_answers: Vec<String>,
}

/// Outcome of a submitted quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub questions: Vec<Question>,
    pub answers: Vec<String>,
    pub score: usize,
}

/// Quiz difficulty. `Display` renders the UI form ("Easy"); the API wants
/// the lowercase token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn api_value(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_display_and_api_value() {
        assert_eq!(Difficulty::Easy.to_string(), "Easy");
        assert_eq!(Difficulty::Easy.api_value(), "easy");
        assert_eq!(Difficulty::Hard.api_value(), "hard");
    }

    #[test]
    fn test_needs_subcategory() {
        let parent = Category {
            id: -1,
            name: "Entertainment".to_string(),
            children: vec![Category::leaf(10, "Books")],
        };
        assert!(parent.needs_subcategory());
        assert!(!Category::leaf(9, "General Knowledge").needs_subcategory());
    }

    #[test]
    fn test_api_question_deserialize() {
        let json = r#"{
            "category": "Entertainment: Books",
            "type": "multiple",
            "difficulty": "easy",
            "question": "Who wrote Dune?",
            "correct_answer": "Frank Herbert",
            "incorrect_answers": ["Isaac Asimov", "Arthur C. Clarke", "Ray Bradbury"]
        }"#;
        let q: ApiQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.question_type, "multiple");
        assert_eq!(q.correct_answer, "Frank Herbert");
        assert_eq!(q.incorrect_answers.len(), 3);
    }
}
