use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use nd_core::{Emotion, Error, ModelConfig, ToneAnalyzer};
use nd_inference::OllamaAnalyzer;
use serde_json::{json, Value};

#[derive(Clone)]
struct FakeOllama {
    status: StatusCode,
    body: Value,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn generate(State(fake): State<FakeOllama>, Json(request): Json<Value>) -> impl IntoResponse {
    fake.requests.lock().unwrap().push(request);
    (fake.status, Json(fake.body.clone()))
}

async fn spawn_ollama(status: StatusCode, body: Value) -> (SocketAddr, Arc<Mutex<Vec<Value>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeOllama { status, body, requests: requests.clone() };
    let app = Router::new().route("/api/generate", post(generate)).with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, requests)
}

fn analyzer_for(addr: SocketAddr) -> OllamaAnalyzer {
    let config = ModelConfig::default().with_url(&format!("http://{}", addr)).unwrap();
    OllamaAnalyzer::new(&config).unwrap()
}

#[tokio::test]
async fn test_reply_wrapped_in_prose_is_extracted() {
    let reply = r#"Sure! {"truthPercentage": "82%", "emotion": "positive", "explanation": "Multiple named sources.", "summary": "A chip maker beat estimates."}"#;
    let (addr, requests) = spawn_ollama(StatusCode::OK, json!({"model": "llama3", "response": reply, "done": true})).await;
    let analyzer = analyzer_for(addr);

    let result = analyzer.analyze("Chip maker beats estimates").await;
    assert_eq!(result.truth_percentage, 82.0);
    assert_eq!(result.emotion, Emotion::Positive);
    assert_eq!(result.explanation, "Multiple named sources.");
    assert_eq!(result.summary.as_deref(), Some("A chip maker beat estimates."));
    assert!(result.raw.is_none());

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["model"], "llama3");
    assert_eq!(requests[0]["stream"], false);
    assert!(requests[0]["prompt"].as_str().unwrap().contains("Chip maker beats estimates"));
}

#[tokio::test]
async fn test_reply_without_json_is_unknown() {
    let reply = "I'm not able to judge this.";
    let (addr, _) = spawn_ollama(StatusCode::OK, json!({"response": reply})).await;
    let result = analyzer_for(addr).analyze("text").await;

    assert_eq!(result.emotion, Emotion::Unknown);
    assert_eq!(result.explanation, "No valid JSON response found");
    assert_eq!(result.raw.as_deref(), Some(reply));
}

#[tokio::test]
async fn test_out_of_range_percentage_is_clamped() {
    let reply = r#"{"truthPercentage": 180, "emotion": "negative", "explanation": "x", "summary": "y"}"#;
    let (addr, _) = spawn_ollama(StatusCode::OK, json!({"response": reply})).await;
    let result = analyzer_for(addr).analyze("text").await;

    assert_eq!(result.truth_percentage, 100.0);
    assert_eq!(result.emotion, Emotion::Negative);
}

#[tokio::test]
async fn test_missing_response_field_is_empty_reply() {
    let (addr, _) = spawn_ollama(StatusCode::OK, json!({"done": true})).await;
    let result = analyzer_for(addr).analyze("text").await;

    assert_eq!(result.emotion, Emotion::Unknown);
    assert_eq!(result.explanation, "No valid JSON response found");
}

#[tokio::test]
async fn test_non_success_status_from_generate_is_remote_error() {
    let (addr, _) = spawn_ollama(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "out of memory"})).await;
    let analyzer = analyzer_for(addr);

    let err = analyzer.generate("prompt").await.unwrap_err();
    match err {
        Error::Remote { status, message, .. } => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("out of memory"));
        }
        other => panic!("expected remote error, got {other:?}"),
    }

    // The analyzer absorbs it into a degraded result.
    let result = analyzer.analyze("text").await;
    assert_eq!(result.emotion, Emotion::Error);
    assert_eq!(result.truth_percentage, 0.0);
    assert_eq!(result.explanation, "Model server returned HTTP 500: out of memory");
}

#[tokio::test]
async fn test_missing_model_points_at_pull() {
    let (addr, _) = spawn_ollama(StatusCode::NOT_FOUND, json!({"error": "model 'llama3' not found"})).await;
    let result = analyzer_for(addr).analyze("text").await;

    assert_eq!(result.emotion, Emotion::Error);
    assert!(result.explanation.contains("ollama pull llama3"));
}

#[tokio::test]
async fn test_unreachable_server_is_error_result() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let analyzer = analyzer_for(addr);
    let err = analyzer.generate("prompt").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));

    let result = analyzer.analyze("text").await;
    assert_eq!(result.truth_percentage, 0.0);
    assert_eq!(result.emotion, Emotion::Error);
    assert!(result.explanation.contains("Cannot connect to the Ollama server"));
}
