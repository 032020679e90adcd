use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod digest;
pub mod error;
pub mod handlers;
pub mod state;
pub mod views;

pub use digest::{AnalysisOutcome, DigestSnapshot, DigestView, RefreshOutcome};
pub use error::ApiError;
pub use state::AppState;
pub use views::Views;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::home))
        .route("/preferences", get(handlers::preferences_page).post(handlers::save_preferences))
        .route("/digest", get(handlers::digest_page))
        .route("/digest/articles/:index/analyze", post(handlers::analyze_article))
        .route("/api/topics", get(handlers::list_topics).delete(handlers::clear_topics))
        .route("/api/topics/:topic", put(handlers::add_topic).delete(handlers::remove_topic))
        .route("/api/digest", get(handlers::get_digest))
        .route("/api/digest/articles/:index/analysis", post(handlers::analyze_digest_article))
        .route("/api/analyze", post(handlers::analyze_text))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
