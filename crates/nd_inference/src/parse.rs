//! Turning free-form model text into an [`AnalysisResult`].
//!
//! The model is asked for a bare JSON object but routinely wraps it in prose,
//! so the reply is treated as untrusted text: the outermost `{...}` span is
//! pulled out, parsed, and its `truthPercentage` coerced into `[0, 100]`
//! whatever shape it arrived in.

use nd_core::{AnalysisResult, Emotion};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

pub const NO_JSON_EXPLANATION: &str = "No valid JSON response found";
pub const PARSE_FAILED_EXPLANATION: &str = "Failed to parse AI response";

// Greedy: first `{` through the last `}`.
static JSON_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid JSON span pattern"));

// Leading number the way a lenient float parser reads it ("82.5 percent" -> 82.5).
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number pattern")
});

/// Outcome of reading one model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// A JSON object was found and normalized.
    Parsed(AnalysisResult),
    /// A `{...}` span was found but is not a JSON object.
    Malformed(String),
    /// No `{...}` span at all.
    Empty(String),
}

impl ModelReply {
    pub fn into_result(self) -> AnalysisResult {
        match self {
            ModelReply::Parsed(result) => result,
            ModelReply::Malformed(raw) => AnalysisResult::unknown(PARSE_FAILED_EXPLANATION, raw),
            ModelReply::Empty(raw) => AnalysisResult::unknown(NO_JSON_EXPLANATION, raw),
        }
    }
}

pub fn extract_json_span(text: &str) -> Option<&str> {
    JSON_SPAN.find(text).map(|m| m.as_str())
}

pub fn parse_reply(text: &str) -> ModelReply {
    let Some(span) = extract_json_span(text) else {
        return ModelReply::Empty(text.to_string());
    };

    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(fields)) => ModelReply::Parsed(from_fields(&fields)),
        Ok(_) | Err(_) => ModelReply::Malformed(text.to_string()),
    }
}

fn from_fields(fields: &Map<String, Value>) -> AnalysisResult {
    let emotion = fields
        .get("emotion")
        .and_then(Value::as_str)
        .map(Emotion::from_label)
        .unwrap_or(Emotion::Unknown);

    let explanation = fields
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let summary = fields
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string);

    AnalysisResult {
        truth_percentage: normalize_truth_percentage(fields.get("truthPercentage")),
        emotion,
        explanation,
        summary,
        raw: None,
    }
}

/// Coerce whatever the model put in `truthPercentage` into `[0, 100]`.
///
/// Strings lose a trailing `%` and surrounding whitespace before parsing.
/// Anything that does not yield a number becomes 0.
pub fn normalize_truth_percentage(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_percentage(s),
        _ => 0.0,
    };
    clamp_percentage(raw)
}

fn parse_percentage(text: &str) -> f64 {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    LEADING_NUMBER
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub fn clamp_percentage(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
