use crate::config::{CONFIDENCE_THRESHOLD, MAX_TEXT_LEN, MAX_UNKNOWN_WORDS_PER_REQUEST};
use crate::emotion::PhraseAnalysis;
use crate::service::error::ApiError;
use crate::service::stats::CounterSnapshot;
use crate::service::AppState;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub api_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeTextResponse {
    pub success: bool,
    pub result: AnalyzeTextResult,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeTextResult {
    pub transcription: String,
    pub confidence: f64,
    pub emotion_analysis: PhraseAnalysis,
    pub processing_time: f64,
    pub input_stats: InputStats,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct InputStats {
    pub character_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
}

/// The audio pipeline is deliberately absent from this deployment; callers
/// are redirected to the text endpoint instead of getting a silent failure.
#[derive(Debug, Serialize)]
pub struct AudioUnsupportedResponse {
    pub success: bool,
    pub error: String,
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub word_database_size: usize,
    pub classified_words_cached: usize,
    pub system_status: String,
    pub features: Features,
    pub capabilities: Capabilities,
    pub counters: CounterSnapshot,
}

#[derive(Debug, Serialize)]
pub struct Features {
    pub emotion_analysis: bool,
    pub speech_recognition: bool,
    pub laughter_detection: bool,
    pub music_detection: bool,
}

#[derive(Debug, Serialize)]
pub struct Capabilities {
    pub max_text_length: usize,
    pub max_unknown_words_per_request: usize,
    pub confidence_threshold: f64,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Auth then rate limit, keyed by the caller's token hash.
fn guard(state: &AppState, headers: &HeaderMap, query: &TokenQuery) -> Result<(), ApiError> {
    let result = state
        .auth
        .authorize(bearer_token(headers), query.api_token.as_deref())
        .and_then(|key| {
            state
                .rate_limiter
                .check(&key)
                .map_err(|retry_after| ApiError::RateLimit { retry_after })
        });
    if result.is_err() {
        state.counters.record_rejection();
    }
    result
}

fn count_sentences(text: &str) -> usize {
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    sentences.max(1)
}

pub fn input_stats(text: &str) -> InputStats {
    InputStats {
        character_count: text.chars().count(),
        word_count: text.split_whitespace().count(),
        sentence_count: count_sentences(text),
    }
}

pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeTextResponse>, ApiError> {
    state.counters.record_text_request();
    guard(&state, &headers, &query)?;

    let started = Instant::now();
    let emotion_analysis = state.analyzer.analyze_text(&request.text).await?;
    let processing_time = started.elapsed().as_secs_f64();

    tracing::info!(
        overall = ?emotion_analysis.overall_emotion,
        confidence = emotion_analysis.confidence,
        words = emotion_analysis.word_count,
        "text analyzed"
    );

    Ok(Json(AnalyzeTextResponse {
        success: true,
        result: AnalyzeTextResult {
            transcription: request.text.clone(),
            confidence: 1.0,
            emotion_analysis,
            processing_time,
            input_stats: input_stats(&request.text),
        },
    }))
}

pub async fn analyze_audio(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Result<Json<AudioUnsupportedResponse>, ApiError> {
    state.counters.record_audio_request();
    guard(&state, &headers, &query)?;

    Ok(Json(AudioUnsupportedResponse {
        success: false,
        error: "audio analysis is not available in this deployment; \
                transcribe client-side and POST the text instead"
            .to_owned(),
        redirect: "/api/analyze-text".to_owned(),
    }))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    state.counters.record_stats_request();
    guard(&state, &headers, &query)?;

    Ok(Json(StatsResponse {
        word_database_size: state.lexicon.len(),
        classified_words_cached: state.analyzer.cached_words().await,
        system_status: "operational".to_owned(),
        features: Features {
            emotion_analysis: true,
            speech_recognition: false,
            laughter_detection: false,
            music_detection: false,
        },
        capabilities: Capabilities {
            max_text_length: MAX_TEXT_LEN,
            max_unknown_words_per_request: MAX_UNKNOWN_WORDS_PER_REQUEST,
            confidence_threshold: CONFIDENCE_THRESHOLD,
        },
        counters: state.counters.snapshot(),
    }))
}
