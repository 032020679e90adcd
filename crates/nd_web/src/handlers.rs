use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::{Form, Json};
use nd_core::{AnalysisResult, Error, TopicSet, AVAILABLE_TOPICS};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::digest::{AnalysisOutcome, AnalysisView, DigestSnapshot};
use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct TopicOption {
    name: String,
    selected: bool,
}

fn topic_options(topics: &TopicSet) -> Vec<TopicOption> {
    let mut options: Vec<TopicOption> = AVAILABLE_TOPICS
        .iter()
        .map(|name| TopicOption { name: name.to_string(), selected: topics.contains(name) })
        .collect();
    // Topics added through the API may fall outside the fixed list.
    for topic in topics.iter().filter(|t| !AVAILABLE_TOPICS.contains(t)) {
        options.push(TopicOption { name: topic.to_string(), selected: true });
    }
    options
}

fn topic_name(raw: &str) -> ApiResult<String> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(Error::InvalidInput("Topic name must not be empty".to_string()).into());
    }
    Ok(topic.to_string())
}

pub async fn home(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    let topics = state.topics().await;
    let html = state.views.render("home", &json!({ "topics": topics }))?;
    Ok(Html(html))
}

pub async fn preferences_page(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    let topics = state.topics().await;
    let html = state.views.render(
        "preferences",
        &json!({ "topics": topic_options(&topics), "selected": topics.len() }),
    )?;
    Ok(Html(html))
}

/// Checkbox form submission: every checked box arrives as a `topic` field.
pub async fn save_preferences(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<Vec<(String, String)>>,
) -> impl IntoResponse {
    let selected: Vec<String> = fields
        .into_iter()
        .filter(|(name, _)| name == "topic")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();
    let topics = state.select_topics(&selected).await;
    tracing::info!(topics = %topics.cache_key(), "💾 Saved topic preferences");
    Redirect::to("/digest")
}

pub async fn digest_page(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    let topics = state.topics().await;
    let outcome = state.digest.refresh(&topics).await;
    tracing::debug!(outcome = outcome.as_str(), "📰 Digest refreshed");
    let snapshot = state.digest.snapshot().await;
    let html = state.views.render(
        "digest",
        &json!({
            "topics": topics,
            "disabled": topics.is_empty(),
            "digest": snapshot,
        }),
    )?;
    Ok(Html(html))
}

pub async fn analyze_article(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<Redirect> {
    state.digest.analyze(index).await?;
    Ok(Redirect::to(&format!("/digest#article-{}", index)))
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    pub topics: TopicSet,
    pub available: Vec<&'static str>,
}

impl From<TopicSet> for TopicsResponse {
    fn from(topics: TopicSet) -> Self {
        Self { topics, available: AVAILABLE_TOPICS.to_vec() }
    }
}

pub async fn list_topics(State(state): State<Arc<AppState>>) -> Json<TopicsResponse> {
    Json(state.topics().await.into())
}

pub async fn add_topic(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> ApiResult<Json<TopicsResponse>> {
    let topic = topic_name(&topic)?;
    Ok(Json(state.add_topic(&topic).await.into()))
}

pub async fn remove_topic(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> ApiResult<Json<TopicsResponse>> {
    let topic = topic_name(&topic)?;
    Ok(Json(state.remove_topic(&topic).await.into()))
}

pub async fn clear_topics(State(state): State<Arc<AppState>>) -> Json<TopicsResponse> {
    Json(state.clear_topics().await.into())
}

#[derive(Debug, Serialize)]
pub struct DigestResponse {
    pub outcome: &'static str,
    #[serde(flatten)]
    pub digest: DigestSnapshot,
}

pub async fn get_digest(State(state): State<Arc<AppState>>) -> Json<DigestResponse> {
    let topics = state.topics().await;
    let outcome = state.digest.refresh(&topics).await;
    Json(DigestResponse { outcome: outcome.as_str(), digest: state.digest.snapshot().await })
}

#[derive(Debug, Serialize)]
pub struct ArticleAnalysisResponse {
    pub index: usize,
    /// False when the article list changed before the model answered.
    pub applied: bool,
    pub analysis: AnalysisView,
}

pub async fn analyze_digest_article(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<Json<ArticleAnalysisResponse>> {
    let (applied, result) = match state.digest.analyze(index).await? {
        AnalysisOutcome::Applied(result) => (true, result),
        AnalysisOutcome::Discarded(result) => (false, result),
    };
    Ok(Json(ArticleAnalysisResponse { index, applied, analysis: result.into() }))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalysisResult>> {
    if request.text.trim().is_empty() {
        return Err(Error::InvalidInput("Text to analyze must not be empty".to_string()).into());
    }
    Ok(Json(state.digest.analyzer().analyze(&request.text).await))
}
