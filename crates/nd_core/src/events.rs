use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::types::Emotion;

/// Something worth reporting that happened while serving a digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DigestEvent {
    TopicAdded { topic: String },
    TopicRemoved { topic: String },
    TopicsCleared,
    FetchStarted { key: String, request: u64 },
    FetchCompleted { key: String, request: u64, articles: usize },
    FetchFailed { key: String, request: u64, error: String },
    FetchDiscarded { key: String, request: u64 },
    AnalysisStarted { index: usize, version: u64 },
    AnalysisCompleted { index: usize, version: u64, emotion: Emotion, truth_percentage: f64 },
    AnalysisDiscarded { index: usize, version: u64 },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: DigestEvent);
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: DigestEvent) {
        match event {
            DigestEvent::TopicAdded { topic } => tracing::info!(%topic, "➕ Topic added"),
            DigestEvent::TopicRemoved { topic } => tracing::info!(%topic, "➖ Topic removed"),
            DigestEvent::TopicsCleared => tracing::info!("🧹 Topics cleared"),
            DigestEvent::FetchStarted { key, request } => {
                tracing::info!(%key, request, "📰 Fetching articles")
            }
            DigestEvent::FetchCompleted { key, request, articles } => {
                tracing::info!(%key, request, articles, "✨ Articles fetched")
            }
            DigestEvent::FetchFailed { key, request, error } => {
                tracing::error!(%key, request, %error, "Article fetch failed")
            }
            DigestEvent::FetchDiscarded { key, request } => {
                tracing::debug!(%key, request, "Discarding superseded article fetch")
            }
            DigestEvent::AnalysisStarted { index, version } => {
                tracing::info!(index, version, "🧠 Analyzing article")
            }
            DigestEvent::AnalysisCompleted { index, version, emotion, truth_percentage } => {
                tracing::info!(index, version, %emotion, truth_percentage, "✨ Analysis complete")
            }
            DigestEvent::AnalysisDiscarded { index, version } => {
                tracing::debug!(index, version, "Discarding analysis for a replaced article list")
            }
        }
    }
}

/// Keeps every event in memory so tests can assert on them.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<DigestEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DigestEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: DigestEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
