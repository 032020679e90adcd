use std::sync::Arc;

use nd_core::{ArticleSource, DigestEvent, EventSink, Result, ToneAnalyzer, TopicSet, TracingSink};
use tokio::sync::RwLock;

use crate::digest::DigestView;
use crate::views::Views;

pub struct AppState {
    preferences: RwLock<TopicSet>,
    pub digest: DigestView,
    pub views: Views,
    events: Arc<dyn EventSink>,
}

impl AppState {
    pub fn new(source: Arc<dyn ArticleSource>, analyzer: Arc<dyn ToneAnalyzer>) -> Result<Self> {
        Self::with_events(source, analyzer, Arc::new(TracingSink))
    }

    pub fn with_events(
        source: Arc<dyn ArticleSource>,
        analyzer: Arc<dyn ToneAnalyzer>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self> {
        Ok(Self {
            preferences: RwLock::new(TopicSet::new()),
            digest: DigestView::new(source, analyzer, events.clone()),
            views: Views::new()?,
            events,
        })
    }

    pub async fn topics(&self) -> TopicSet {
        self.preferences.read().await.clone()
    }

    pub async fn add_topic(&self, topic: &str) -> TopicSet {
        let mut topics = self.preferences.write().await;
        if topics.add(topic) {
            self.events.emit(DigestEvent::TopicAdded { topic: topic.to_string() });
        }
        topics.clone()
    }

    pub async fn remove_topic(&self, topic: &str) -> TopicSet {
        let mut topics = self.preferences.write().await;
        if topics.remove(topic) {
            self.events.emit(DigestEvent::TopicRemoved { topic: topic.to_string() });
        }
        topics.clone()
    }

    pub async fn clear_topics(&self) -> TopicSet {
        let mut topics = self.preferences.write().await;
        if !topics.is_empty() {
            topics.clear();
            self.events.emit(DigestEvent::TopicsCleared);
        }
        topics.clone()
    }

    /// Bring the selection in line with `selected`, keeping the order of topics that stay.
    pub async fn select_topics(&self, selected: &[String]) -> TopicSet {
        let mut topics = self.preferences.write().await;
        let dropped: Vec<String> = topics
            .iter()
            .filter(|t| !selected.iter().any(|s| s == t))
            .map(str::to_string)
            .collect();
        for topic in dropped {
            topics.remove(&topic);
            self.events.emit(DigestEvent::TopicRemoved { topic });
        }
        for topic in selected {
            if topics.add(topic.as_str()) {
                self.events.emit(DigestEvent::TopicAdded { topic: topic.clone() });
            }
        }
        topics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nd_core::{AnalysisResult, Article, RecordingSink};

    struct NoSource;

    #[async_trait]
    impl ArticleSource for NoSource {
        fn name(&self) -> &str {
            "none"
        }

        async fn fetch_articles(&self, _topics: &[String]) -> Result<Vec<Article>> {
            Ok(Vec::new())
        }
    }

    struct NoAnalyzer;

    #[async_trait]
    impl ToneAnalyzer for NoAnalyzer {
        fn name(&self) -> &str {
            "none"
        }

        async fn analyze(&self, _text: &str) -> AnalysisResult {
            AnalysisResult::error("unused")
        }
    }

    fn state(events: Arc<RecordingSink>) -> AppState {
        AppState::with_events(Arc::new(NoSource), Arc::new(NoAnalyzer), events).unwrap()
    }

    #[tokio::test]
    async fn test_topic_events_only_for_real_changes() {
        let events = Arc::new(RecordingSink::new());
        let state = state(events.clone());

        state.add_topic("Science").await;
        state.add_topic("Science").await;
        state.remove_topic("Sports").await;
        state.remove_topic("Science").await;
        state.clear_topics().await;

        assert_eq!(
            events.events(),
            vec![
                DigestEvent::TopicAdded { topic: "Science".to_string() },
                DigestEvent::TopicRemoved { topic: "Science".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_select_topics_keeps_existing_order() {
        let state = state(Arc::new(RecordingSink::new()));
        state.add_topic("Sports").await;
        state.add_topic("Business").await;
        state.add_topic("Health").await;

        let topics = state
            .select_topics(&["Business".to_string(), "Science".to_string(), "Sports".to_string()])
            .await;
        assert_eq!(topics.iter().collect::<Vec<_>>(), vec!["Sports", "Business", "Science"]);
    }
}
