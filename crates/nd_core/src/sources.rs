use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Name of the upstream search service
    fn name(&self) -> &str;

    /// Fetch the first page of articles matching any of the topics.
    ///
    /// Fails with `InvalidInput` before touching the network when `topics` is empty.
    async fn fetch_articles(&self, topics: &[String]) -> Result<Vec<Article>>;
}
