pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod sources;
pub mod topics;
pub mod types;

pub use config::{Config, ModelConfig, NewsApiConfig};
pub use error::{Error, Result};
pub use events::{DigestEvent, EventSink, RecordingSink, TracingSink};
pub use models::ToneAnalyzer;
pub use sources::ArticleSource;
pub use topics::{TopicSet, AVAILABLE_TOPICS};
pub use types::{AnalysisResult, Article, Emotion, Source};
