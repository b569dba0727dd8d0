use std::time::Duration;

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::debug;

use crate::categories::structurize;
use crate::error::CoreError;
use crate::models::{ApiCategory, ApiQuestion, Category, Difficulty, Question};

pub const DEFAULT_API_URL: &str = "https://opentdb.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    trivia_categories: Vec<ApiCategory>,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    response_code: i32,
    results: Vec<ApiQuestion>,
}

/// Async client for the Open Trivia DB API.
#[derive(Debug, Clone)]
pub struct TriviaClient {
    http: reqwest::Client,
    base_url: String,
}

impl TriviaClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all categories and restructure them into the two-level tree.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, CoreError> {
        let url = format!("{}/api_category.php", self.base_url);
        debug!("fetching categories from {}", url);
        let response: CategoriesResponse = self.http.get(&url).send().await?.json().await?;
        debug!("fetched {} raw categories", response.trivia_categories.len());
        Ok(structurize(response.trivia_categories))
    }

    /// Fetch a full quiz for a category/difficulty.
    pub async fn create_quiz(
        &self,
        category_id: i64,
        difficulty: Difficulty,
        amount: u8,
    ) -> Result<Vec<Question>, CoreError> {
        let questions = self.fetch_questions(category_id, difficulty, amount).await?;
        if questions.is_empty() {
            return Err(CoreError::EmptyResults);
        }
        Ok(questions)
    }

    /// Fetch a single replacement question, if the API has one.
    pub async fn fetch_question(
        &self,
        category_id: i64,
        difficulty: Difficulty,
    ) -> Result<Option<Question>, CoreError> {
        let mut questions = self.fetch_questions(category_id, difficulty, 1).await?;
        Ok(if questions.is_empty() {
            None
        } else {
            Some(questions.remove(0))
        })
    }

    async fn fetch_questions(
        &self,
        category_id: i64,
        difficulty: Difficulty,
        amount: u8,
    ) -> Result<Vec<Question>, CoreError> {
        let url = self.questions_url(category_id, difficulty, amount);
        debug!("fetching {} questions from {}", amount, url);
        let response: QuestionsResponse = self.http.get(&url).send().await?.json().await?;
        if response.response_code != 0 {
            return Err(CoreError::Api(format!(
                "response_code {} for category {}",
                response.response_code, category_id
            )));
        }
        Ok(response.results.into_iter().map(shape_question).collect())
    }

    fn questions_url(&self, category_id: i64, difficulty: Difficulty, amount: u8) -> String {
        format!(
            "{}/api.php?amount={}&category={}&difficulty={}&type=multiple",
            self.base_url,
            amount,
            category_id,
            difficulty.api_value()
        )
    }
}

/// Shape a raw API question: the answer set is the shuffled union of the
/// incorrect answers and the correct one.
fn shape_question(api: ApiQuestion) -> Question {
    let mut all_answers: Vec<String> = api
        .incorrect_answers
        .iter()
        .cloned()
        .chain(std::iter::once(api.correct_answer.clone()))
        .collect();
    all_answers.shuffle(&mut rand::thread_rng());

    Question {
        question: api.question,
        correct_answer: api.correct_answer,
        incorrect_answers: api.incorrect_answers,
        all_answers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_question() -> ApiQuestion {
        ApiQuestion {
            category: "Entertainment: Books".to_string(),
            question_type: "multiple".to_string(),
            difficulty: "easy".to_string(),
            question: "Who wrote Dune?".to_string(),
            correct_answer: "Frank Herbert".to_string(),
            incorrect_answers: vec![
                "Isaac Asimov".to_string(),
                "Arthur C. Clarke".to_string(),
                "Ray Bradbury".to_string(),
            ],
        }
    }

    #[test]
    fn test_shape_question_contains_all_answers() {
        let q = shape_question(api_question());
        assert_eq!(q.all_answers.len(), 4);
        assert!(q.all_answers.contains(&q.correct_answer));
        for wrong in &q.incorrect_answers {
            assert!(q.all_answers.contains(wrong));
        }
    }

    #[test]
    fn test_questions_url() {
        let client = TriviaClient::new("https://opentdb.com/").unwrap();
        assert_eq!(
            client.questions_url(10, Difficulty::Medium, 5),
            "https://opentdb.com/api.php?amount=5&category=10&difficulty=medium&type=multiple"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TriviaClient::new("http://localhost:8080///").unwrap();
        assert_eq!(
            client.questions_url(9, Difficulty::Easy, 1),
            "http://localhost:8080/api.php?amount=1&category=9&difficulty=easy&type=multiple"
        );
    }
}
