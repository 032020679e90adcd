use async_trait::async_trait;
use crate::types::AnalysisResult;

#[async_trait]
pub trait ToneAnalyzer: Send + Sync {
    /// Short name used in logs and the CLI.
    fn name(&self) -> &str;

    /// Assess the tone and credibility of one block of article text.
    ///
    /// Never fails: transport problems, bad status codes and unparsable model
    /// output all come back as a degraded result.
    async fn analyze(&self, text: &str) -> AnalysisResult;
}
