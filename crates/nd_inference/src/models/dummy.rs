use std::fmt;

use nd_core::{AnalysisResult, Emotion, ToneAnalyzer};

/// Offline analyzer: neutral verdict, first twenty words as the summary.
pub struct DummyAnalyzer;

impl fmt::Debug for DummyAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyAnalyzer").finish()
    }
}

impl DummyAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ToneAnalyzer for DummyAnalyzer {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn analyze(&self, text: &str) -> AnalysisResult {
        let words: Vec<&str> = text.split_whitespace().take(20).collect();
        AnalysisResult {
            truth_percentage: 50.0,
            emotion: Emotion::Neutral,
            explanation: "No model was consulted; this is a placeholder verdict.".to_string(),
            summary: (!words.is_empty()).then(|| words.join(" ")),
            raw: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_analyzer() {
        let analyzer = DummyAnalyzer::new();
        let result = analyzer.analyze("This is a test article. It has multiple sentences.").await;
        assert_eq!(result.truth_percentage, 50.0);
        assert_eq!(result.emotion, Emotion::Neutral);
        assert_eq!(result.summary.as_deref(), Some("This is a test article. It has multiple sentences."));

        let empty = analyzer.analyze("   ").await;
        assert!(empty.summary.is_none());
    }
}
