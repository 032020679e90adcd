use nd_core::AnalysisResult;

const NOT_FOUND_MARKERS: [&str; 2] = ["not found", "no such model"];
const CONNECT_MARKERS: [&str; 6] = [
    "fetch",
    "connect",
    "connection refused",
    "error sending request",
    "dns error",
    "timed out",
];

/// Which kind of transport failure an error message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ModelNotFound,
    Unreachable,
    Other,
}

pub fn classify_message(message: &str) -> FailureKind {
    let lowered = message.to_lowercase();
    if NOT_FOUND_MARKERS.iter().any(|m| lowered.contains(m)) {
        FailureKind::ModelNotFound
    } else if CONNECT_MARKERS.iter().any(|m| lowered.contains(m)) {
        FailureKind::Unreachable
    } else {
        FailureKind::Other
    }
}

/// Degraded result for a request that never produced a usable HTTP response.
pub fn transport_failure(message: &str, server: &str, model: &str) -> AnalysisResult {
    match classify_message(message) {
        FailureKind::ModelNotFound => AnalysisResult::error(format!(
            "Model '{model}' was not found. Check that the Ollama server at {server} is running \
             and the model is installed (ollama pull {model})."
        )),
        FailureKind::Unreachable => AnalysisResult::error(format!(
            "Cannot connect to the Ollama server at {server}. Make sure it is running (ollama serve)."
        )),
        FailureKind::Other => AnalysisResult::error(format!("Analysis failed: {message}")),
    }
}

/// Degraded result for a non-success status from the model server.
pub fn status_failure(status: u16, detail: Option<&str>, server: &str, model: &str) -> AnalysisResult {
    if status == 404 {
        return transport_failure("model not found", server, model);
    }
    match detail {
        Some(detail) => AnalysisResult::error(format!("Model server returned HTTP {status}: {detail}")),
        None => AnalysisResult::error(format!("Model server returned HTTP {status}")),
    }
}
