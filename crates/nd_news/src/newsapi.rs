use std::fmt;

use async_trait::async_trait;
use nd_core::{Article, ArticleSource, Error, NewsApiConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

const SERVICE: &str = "NewsAPI";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct NewsApiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    page_size: u32,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(config: &NewsApiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint()?,
            api_key,
            page_size: config.page_size,
        })
    }
}

/// Joins topics into one disjunctive search expression.
pub fn build_query<S: AsRef<str>>(topics: &[S]) -> String {
    topics.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" OR ")
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn fetch_articles(&self, topics: &[String]) -> Result<Vec<Article>> {
        if topics.is_empty() {
            return Err(Error::InvalidInput("No topics selected".to_string()));
        }

        let query = build_query(topics);
        tracing::debug!(%query, page_size = self.page_size, "Searching articles");

        let page_size = self.page_size.to_string();
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("q", query.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| match (e.code, e.message) {
                    (Some(code), Some(message)) => Some(format!("{} ({})", message, code)),
                    (None, message) => message,
                    (Some(code), None) => Some(code),
                });
            tracing::warn!(status = status.as_u16(), ?message, "Article search failed");
            return Err(Error::remote(SERVICE, status.as_u16(), message));
        }

        let body: SearchResponse = response.json().await?;
        if body.status.as_deref() == Some("error") {
            return Err(Error::remote(SERVICE, status.as_u16(), body.message));
        }

        tracing::debug!(articles = body.articles.len(), "Article search complete");
        Ok(body.articles)
    }
}
