//! Wordbridge - English-learning backend: OCR, translation, and dictionary
//! aggregation behind a small JSON API.

mod config;
mod dictionary;
mod error;
mod ocr;
mod translate;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{SecondsFormat, Utc};
use config::AppConfig;
use dictionary::{DictionaryRecord, DictionaryService};
use error::ApiError;
use ocr::{tesseract::TesseractEngine, OcrEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers. Read-only after startup; no
/// state survives a request.
#[derive(Clone)]
struct AppState {
    ocr: Arc<dyn OcrEngine>,
    translator: Arc<translate::BaiduTranslator>,
    dictionary: Arc<DictionaryService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "wordbridge=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Resolve configuration, failing fast on missing credentials
    let config = AppConfig::from_env()?;

    // One HTTP client shared by every upstream adapter
    let client = reqwest::Client::new();

    let translator = Arc::new(translate::BaiduTranslator::new(
        client.clone(),
        config.baidu_app_id.clone(),
        config.baidu_secret_key.clone(),
    ));

    let ocr: Arc<dyn OcrEngine> = Arc::new(TesseractEngine::new(client.clone()));
    info!("OCR engine: {}", ocr.name());

    let state = AppState {
        ocr,
        translator: translator.clone(),
        dictionary: Arc::new(DictionaryService::new(client, translator)),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server listening on http://0.0.0.0:{}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ocr", post(ocr_image))
        .route("/api/translate", post(translate_text))
        .route("/api/dictionary/:word", get(dictionary_lookup))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB images
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Serialize)]
struct OcrResponse {
    success: bool,
    text: String,
}

/// Upload an image and extract its text.
async fn ocr_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>, ApiError> {
    let mut image = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("image") {
            image = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("Failed to read image: {e}")))?
                .to_vec();
            break;
        }
    }

    if image.is_empty() {
        return Err(ApiError::Validation("没有上传图片".to_string()));
    }

    info!("OCR request: {} bytes", image.len());

    let text = state
        .ocr
        .recognize(&image, "eng")
        .await
        .map_err(ApiError::Ocr)?;

    Ok(Json(OcrResponse {
        success: true,
        text: text.trim().to_string(),
    }))
}

#[derive(Deserialize)]
struct TranslateBody {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct TranslateResponse {
    success: bool,
    original: String,
    translation: String,
}

/// Translate text from English to Chinese.
async fn translate_text(
    State(state): State<AppState>,
    Json(body): Json<TranslateBody>,
) -> Result<Json<TranslateResponse>, ApiError> {
    // Empty text is caught inside the client, before any network call.
    let translation = state.translator.translate(&body.text).await?;

    Ok(Json(TranslateResponse {
        success: true,
        original: body.text,
        translation,
    }))
}

#[derive(Serialize)]
struct DictionaryResponse {
    success: bool,
    #[serde(flatten)]
    record: DictionaryRecord,
}

/// Look up a word. Always 200: upstream failures inside the aggregation
/// degrade individual fields instead of failing the request.
async fn dictionary_lookup(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Json<DictionaryResponse> {
    info!("Dictionary lookup: {}", word);
    let record = state.dictionary.lookup(&word).await;
    Json(DictionaryResponse {
        success: true,
        record,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
