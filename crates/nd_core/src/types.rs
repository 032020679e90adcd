use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Source,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_at: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

// The search API sends `null` for fields it has redacted.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Article {
    /// Text handed to the analyzer: the description, or the title when there is none.
    pub fn analysis_text(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description,
            _ => &self.title,
        }
    }

    pub fn published_display(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.published_at) {
            Ok(ts) => ts.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string(),
            Err(_) => self.published_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Positive,
    Negative,
    Neutral,
    Mixed,
    Unknown,
    Error,
}

impl Emotion {
    /// Maps a model-supplied label onto the closed set. Anything outside it is `Unknown`.
    ///
    /// `Error` is reserved for failure results, so a model answering "error" is `Unknown` too.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "neutral" => Self::Neutral,
            "mixed" => Self::Mixed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Mixed => "mixed",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }

    /// `Unknown` and `Error` only come out of failure paths.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Unknown | Self::Error)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub truth_percentage: f64,
    pub emotion: Emotion,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl AnalysisResult {
    /// Zero-score result with emotion `error`.
    pub fn error(explanation: impl Into<String>) -> Self {
        Self {
            truth_percentage: 0.0,
            emotion: Emotion::Error,
            explanation: explanation.into(),
            summary: None,
            raw: None,
        }
    }

    /// Zero-score result with emotion `unknown`, keeping the model text around.
    pub fn unknown(explanation: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            truth_percentage: 0.0,
            emotion: Emotion::Unknown,
            explanation: explanation.into(),
            summary: None,
            raw: Some(raw.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.emotion.is_degraded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(description: Option<&str>) -> Article {
        Article {
            title: "Chip maker posts record quarter".to_string(),
            description: description.map(str::to_string),
            url: "https://example.com/chips".to_string(),
            url_to_image: None,
            source: Source { id: None, name: "Example Wire".to_string() },
            published_at: "2024-05-01T12:30:00Z".to_string(),
            author: None,
            content: None,
        }
    }

    #[test]
    fn test_article_deserializes_upstream_shape() {
        let json = r#"{
            "source": {"id": null, "name": "The Verge"},
            "author": "Jane Doe",
            "title": "A new phone",
            "description": "It folds.",
            "url": "https://example.com/phone",
            "urlToImage": "https://example.com/phone.jpg",
            "publishedAt": "2024-05-01T12:30:00Z",
            "content": "It folds twice [+1200 chars]"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.source.name, "The Verge");
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/phone.jpg"));
        assert_eq!(article.author.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_article_tolerates_nulls() {
        let json = r#"{"source": {"id": null, "name": null}, "title": null, "url": "https://removed.com", "publishedAt": null}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.source.name, "");
        assert!(article.description.is_none());
    }

    #[test]
    fn test_analysis_text_prefers_description() {
        assert_eq!(article(Some("Revenue doubled.")).analysis_text(), "Revenue doubled.");
        assert_eq!(article(Some("   ")).analysis_text(), "Chip maker posts record quarter");
        assert_eq!(article(None).analysis_text(), "Chip maker posts record quarter");
    }

    #[test]
    fn test_published_display() {
        assert_eq!(article(None).published_display(), "2024-05-01 12:30 UTC");
        let mut odd = article(None);
        odd.published_at = "yesterday".to_string();
        assert_eq!(odd.published_display(), "yesterday");
    }

    #[test]
    fn test_emotion_labels() {
        assert_eq!(Emotion::from_label("Positive"), Emotion::Positive);
        assert_eq!(Emotion::from_label(" MIXED "), Emotion::Mixed);
        assert_eq!(Emotion::from_label("furious"), Emotion::Unknown);
        assert_eq!(Emotion::from_label("error"), Emotion::Unknown);
        assert_eq!(serde_json::to_string(&Emotion::Neutral).unwrap(), "\"neutral\"");
    }

    #[test]
    fn test_analysis_result_wire_names() {
        let result = AnalysisResult::error("Cannot connect");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["truthPercentage"], 0.0);
        assert_eq!(json["emotion"], "error");
        assert!(json.get("raw").is_none());
        assert!(result.is_degraded());
    }
}
