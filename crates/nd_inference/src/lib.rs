pub mod classify;
pub mod models;
pub mod parse;
pub mod prompt;

pub use models::{create_analyzer, DummyAnalyzer, OllamaAnalyzer};
pub use parse::{normalize_truth_percentage, parse_reply, ModelReply};
