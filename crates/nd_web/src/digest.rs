use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nd_core::{AnalysisResult, Article, ArticleSource, DigestEvent, Error, EventSink, Result, ToneAnalyzer, TopicSet};
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
enum FetchStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
enum AnalysisSlot {
    Pending,
    Done(AnalysisResult),
}

#[derive(Debug)]
struct DigestState {
    /// Key of the most recently requested topic set.
    key: Option<String>,
    /// Id of the most recent fetch; older completions are dropped.
    request: u64,
    status: FetchStatus,
    /// Bumped whenever `articles` is replaced.
    version: u64,
    articles: Vec<Article>,
    analyses: HashMap<usize, AnalysisSlot>,
}

impl Default for DigestState {
    fn default() -> Self {
        Self {
            key: None,
            request: 0,
            status: FetchStatus::Idle,
            version: 0,
            articles: Vec::new(),
            analyses: HashMap::new(),
        }
    }
}

impl DigestState {
    fn lock(state: &Mutex<DigestState>) -> MutexGuard<'_, DigestState> {
        state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace_articles(&mut self, articles: Vec<Article>) {
        self.version += 1;
        self.articles = articles;
        self.analyses.clear();
    }
}

/// Puts a fetch back to `Idle` if its future is dropped before completing.
struct FetchGuard<'a> {
    state: &'a Mutex<DigestState>,
    request: u64,
    armed: bool,
}

impl FetchGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = DigestState::lock(self.state);
        if state.request == self.request && state.status == FetchStatus::Loading {
            tracing::debug!(request = self.request, "Article fetch abandoned");
            state.status = FetchStatus::Idle;
        }
    }
}

/// Frees an article's `Pending` slot if its analysis future is dropped.
struct AnalysisGuard<'a> {
    state: &'a Mutex<DigestState>,
    index: usize,
    version: u64,
    armed: bool,
}

impl AnalysisGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for AnalysisGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = DigestState::lock(self.state);
        if state.version == self.version && matches!(state.analyses.get(&self.index), Some(AnalysisSlot::Pending)) {
            tracing::debug!(index = self.index, "Article analysis abandoned");
            state.analyses.remove(&self.index);
        }
    }
}

/// Only `http` and `https` links are rendered; anything else is dropped.
fn http_url(raw: &str) -> Option<String> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(String::from)
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// No topics selected; nothing was requested.
    Disabled,
    /// The same topic set is already loaded or in flight.
    Cached,
    Fetched { articles: usize },
    Failed(String),
    /// A newer request started while this one was in flight.
    Superseded,
}

impl RefreshOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Cached => "cached",
            Self::Fetched { .. } => "fetched",
            Self::Failed(_) => "failed",
            Self::Superseded => "superseded",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Applied(AnalysisResult),
    /// The article list changed while the model was thinking.
    Discarded(AnalysisResult),
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub truth_label: String,
    pub degraded: bool,
}

impl From<AnalysisResult> for AnalysisView {
    fn from(result: AnalysisResult) -> Self {
        Self {
            truth_label: format!("{:.0}%", result.truth_percentage),
            degraded: result.is_degraded(),
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleCard {
    pub index: usize,
    pub article: Article,
    pub published: String,
    /// The article URL when it is safe to link.
    pub link: Option<String>,
    pub image: Option<String>,
    pub analyzing: bool,
    pub analysis: Option<AnalysisView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DigestSnapshot {
    pub key: Option<String>,
    pub version: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub empty: bool,
    pub articles: Vec<ArticleCard>,
}

/// Fetches articles for the selected topics and tracks per-article analyses.
///
/// The state lock is never held across an await.
pub struct DigestView {
    state: Mutex<DigestState>,
    source: Arc<dyn ArticleSource>,
    analyzer: Arc<dyn ToneAnalyzer>,
    events: Arc<dyn EventSink>,
}

impl fmt::Debug for DigestView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestView")
            .field("source", &self.source.name())
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl DigestView {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        analyzer: Arc<dyn ToneAnalyzer>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            state: Mutex::new(DigestState::default()),
            source,
            analyzer,
            events,
        }
    }

    /// Make sure the article list matches `topics`, fetching at most once per topic set.
    pub async fn refresh(&self, topics: &TopicSet) -> RefreshOutcome {
        if topics.is_empty() {
            return RefreshOutcome::Disabled;
        }

        let key = topics.cache_key();
        let request = {
            let mut state = self.lock();
            let same_key = state.key.as_deref() == Some(key.as_str());
            if same_key && matches!(state.status, FetchStatus::Loading | FetchStatus::Loaded) {
                return RefreshOutcome::Cached;
            }
            state.request += 1;
            state.key = Some(key.clone());
            state.status = FetchStatus::Loading;
            state.request
        };
        self.events.emit(DigestEvent::FetchStarted { key: key.clone(), request });

        let mut guard = FetchGuard { state: &self.state, request, armed: true };
        let result = self.source.fetch_articles(topics.as_slice()).await;
        guard.disarm();

        let mut state = self.lock();
        if state.request != request {
            self.events.emit(DigestEvent::FetchDiscarded { key, request });
            return RefreshOutcome::Superseded;
        }

        match result {
            Ok(articles) => {
                let count = articles.len();
                state.replace_articles(articles);
                state.status = FetchStatus::Loaded;
                self.events.emit(DigestEvent::FetchCompleted { key, request, articles: count });
                RefreshOutcome::Fetched { articles: count }
            }
            Err(e) => {
                let message = e.to_string();
                state.replace_articles(Vec::new());
                state.status = FetchStatus::Failed(message.clone());
                self.events.emit(DigestEvent::FetchFailed { key, request, error: message.clone() });
                RefreshOutcome::Failed(message)
            }
        }
    }

    /// Run the analyzer on the article at `index` of the current list.
    ///
    /// Only one analysis per article may be outstanding. The result is cached
    /// unless the list was replaced in the meantime.
    pub async fn analyze(&self, index: usize) -> Result<AnalysisOutcome> {
        let (version, text) = {
            let mut state = self.lock();
            let text = state
                .articles
                .get(index)
                .map(|a| a.analysis_text().to_string())
                .ok_or_else(|| Error::InvalidInput(format!("No article at position {}", index)))?;
            if matches!(state.analyses.get(&index), Some(AnalysisSlot::Pending)) {
                return Err(Error::InvalidInput(format!(
                    "Analysis already in progress for article {}",
                    index
                )));
            }
            state.analyses.insert(index, AnalysisSlot::Pending);
            (state.version, text)
        };
        self.events.emit(DigestEvent::AnalysisStarted { index, version });

        let mut guard = AnalysisGuard { state: &self.state, index, version, armed: true };
        let result = self.analyzer.analyze(&text).await;
        guard.disarm();

        let mut state = self.lock();
        if state.version != version {
            self.events.emit(DigestEvent::AnalysisDiscarded { index, version });
            return Ok(AnalysisOutcome::Discarded(result));
        }
        state.analyses.insert(index, AnalysisSlot::Done(result.clone()));
        self.events.emit(DigestEvent::AnalysisCompleted {
            index,
            version,
            emotion: result.emotion,
            truth_percentage: result.truth_percentage,
        });
        Ok(AnalysisOutcome::Applied(result))
    }

    pub async fn snapshot(&self) -> DigestSnapshot {
        let state = self.lock();
        let articles = state
            .articles
            .iter()
            .enumerate()
            .map(|(index, article)| {
                let slot = state.analyses.get(&index);
                ArticleCard {
                    index,
                    published: article.published_display(),
                    link: http_url(&article.url),
                    image: article.url_to_image.as_deref().and_then(http_url),
                    article: article.clone(),
                    analyzing: matches!(slot, Some(AnalysisSlot::Pending)),
                    analysis: match slot {
                        Some(AnalysisSlot::Done(result)) => Some(result.clone().into()),
                        _ => None,
                    },
                }
            })
            .collect::<Vec<_>>();

        DigestSnapshot {
            key: state.key.clone(),
            version: state.version,
            loading: state.status == FetchStatus::Loading,
            error: match &state.status {
                FetchStatus::Failed(message) => Some(message.clone()),
                _ => None,
            },
            empty: state.status == FetchStatus::Loaded && articles.is_empty(),
            articles,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DigestState> {
        DigestState::lock(&self.state)
    }

    pub fn analyzer(&self) -> &Arc<dyn ToneAnalyzer> {
        &self.analyzer
    }
}
