//! HTTP routes.
//!
//! Request bodies are read as raw bytes and decoded leniently, so a missing
//! or malformed body reports the missing field rather than a JSON rejection.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use lectern_core::{ImportResponse, Reader, Translation, Translator};
use serde::Deserialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, panic_response};

/// Shared per-process handles. Both are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub reader: Reader,
    pub translator: Translator,
}

#[derive(Debug, Default, Deserialize)]
struct FetchArticleRequest {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TranslateRequest {
    #[serde(default)]
    word: String,
    #[serde(default)]
    context: String,
}

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/api/fetch-article", post(fetch_article))
        .route("/api/translate", post(translate))
        .route("/health", get(health))
        .with_state(state);
    with_layers(routes)
}

/// Boundary middleware. Panics become the generic failure response.
fn with_layers(routes: Router) -> Router {
    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn fetch_article(State(state): State<AppState>, body: Bytes) -> Result<Json<ImportResponse>, ApiError> {
    let request: FetchArticleRequest = serde_json::from_slice(&body).unwrap_or_default();
    let url = request.url.unwrap_or_default();

    let response = state.reader.import_url(&url).await?;
    tracing::info!(url = %response.source, images = response.images.len(), "article imported");
    Ok(Json(response))
}

async fn translate(State(state): State<AppState>, body: Bytes) -> Result<Json<Translation>, ApiError> {
    let request: TranslateRequest = serde_json::from_slice(&body).unwrap_or_default();
    let word = request.word.trim();
    if word.is_empty() {
        return Err(ApiError::Missing("Word"));
    }

    Ok(Json(state.translator.translate(word, &request.context).await))
}

async fn health() -> &'static str {
    "ok"
}
