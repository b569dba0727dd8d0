pub mod categories;
pub mod client;
pub mod error;
pub mod models;
pub mod score;
