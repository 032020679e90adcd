use std::env;
use std::time::Duration;

use url::Url;

use crate::{Error, Result};

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org";
pub const DEFAULT_MODEL_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL_NAME: &str = "llama3";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub page_size: u32,
    pub timeout: Duration,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            base_url: parse_url(DEFAULT_NEWS_API_URL).expect("default news API URL is valid"),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(30),
        }
    }
}

impl NewsApiConfig {
    pub fn with_url(mut self, url: &str) -> Result<Self> {
        self.base_url = parse_url(url)?;
        Ok(self)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The key, or a configuration error explaining where to put it.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            Error::Config(
                "NEWS_API_KEY not found.\n\n\
                 Set it in the environment or in ~/.config/news-digest/.env:\n  \
                 NEWS_API_KEY=your_key_here\n\n\
                 Get a key from: https://newsapi.org/register"
                    .to_string(),
            )
        })
    }

    pub fn endpoint(&self) -> Result<Url> {
        self.base_url
            .join("v2/everything")
            .map_err(|e| Error::Config(format!("Invalid news API URL: {}", e)))
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: Url,
    pub model_name: String,
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: parse_url(DEFAULT_MODEL_URL).expect("default model URL is valid"),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ModelConfig {
    pub fn with_url(mut self, url: &str) -> Result<Self> {
        self.base_url = parse_url(url)?;
        Ok(self)
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn generate_endpoint(&self) -> Result<Url> {
        self.base_url
            .join("api/generate")
            .map_err(|e| Error::Config(format!("Invalid model URL: {}", e)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub news: NewsApiConfig,
    pub model: ModelConfig,
}

impl Config {
    /// Build from the process environment, after loading any `.env` file.
    pub fn from_env() -> Result<Self> {
        load_dotenv();

        let mut news = NewsApiConfig::default();
        if let Some(url) = var("NEWS_API_URL") {
            news = news.with_url(&url)?;
        }
        news.api_key = var("NEWS_API_KEY").or_else(|| var("VITE_NEWS_API_KEY"));

        let mut model = ModelConfig::default();
        if let Some(url) = var("OLLAMA_URL") {
            model = model.with_url(&url)?;
        }
        if let Some(name) = var("OLLAMA_MODEL") {
            model = model.with_model_name(name);
        }

        Ok(Self { news, model })
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parses a base URL, making sure it ends in `/` so `join` appends instead of replacing.
pub fn parse_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') { raw.to_string() } else { format!("{}/", raw) };
    Url::parse(&normalized).map_err(|e| Error::Config(format!("Invalid URL '{}': {}", raw, e)))
}

/// Loads `.env` from the working directory, falling back to the user config dir.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("news-digest").join(".env");
        if path.exists() && dotenvy::from_path(&path).is_ok() {
            tracing::debug!(path = %path.display(), "Loaded environment file");
        }
    }
}
