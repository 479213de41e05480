//! HTTP surface: router, handlers, auth, rate limiting, usage counters.

mod auth;
mod error;
mod handlers;
mod rate_limit;
mod stats;

use crate::analyze::Analyzer;
use crate::classify::WordClassifier;
use crate::config::{RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS};
use crate::lexicon::Lexicon;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use auth::{hash_token, Auth};
pub use error::ApiError;
pub use handlers::{AnalyzeTextRequest, AnalyzeTextResponse, StatsResponse};
pub use rate_limit::RateLimiter;
pub use stats::{CounterSnapshot, UsageCounters};

/// Shared state behind every handler. The lexicon and the classifier cache
/// are the only cross-request state; both are safe for concurrent use.
pub struct AppState {
    pub lexicon: Arc<Lexicon>,
    pub analyzer: Analyzer,
    pub auth: Auth,
    pub rate_limiter: RateLimiter,
    pub counters: UsageCounters,
}

impl AppState {
    pub fn new(
        lexicon: Arc<Lexicon>,
        classifier: Arc<dyn WordClassifier>,
        token_hashes: Vec<String>,
    ) -> Self {
        Self {
            lexicon: lexicon.clone(),
            analyzer: Analyzer::new(lexicon, classifier),
            auth: Auth::new(token_hashes),
            rate_limiter: RateLimiter::new(
                RATE_LIMIT_MAX_REQUESTS,
                Duration::from_secs(RATE_LIMIT_WINDOW_SECS),
            ),
            counters: UsageCounters::default(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/analyze-text", post(handlers::analyze_text))
        .route("/api/analyze-audio", post(handlers::analyze_audio))
        .route("/api/stats", get(handlers::stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
