use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("trivia API error: {0}")]
    Api(String),

    #[error("the API returned no questions for this category/difficulty")]
    EmptyResults,
}
