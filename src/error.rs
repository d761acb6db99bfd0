//! Request-level error taxonomy and its HTTP mapping.
//!
//! Validation failures are reported before any upstream call; upstream
//! failures on the direct endpoints surface as 500 with the underlying
//! message attached. Failures inside dictionary aggregation never reach
//! this type (they are recovered locally, see `dictionary`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::translate::TranslateError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or empty required input.
    #[error("{0}")]
    Validation(String),

    /// OCR engine failure.
    #[error(transparent)]
    Ocr(anyhow::Error),

    /// Translation provider failure (network or protocol).
    #[error(transparent)]
    Translation(TranslateError),
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::EmptyText => ApiError::Validation("没有提供文本".to_string()),
            other => ApiError::Translation(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg }),
            ),
            ApiError::Ocr(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "OCR 识别失败", "message": format!("{err:#}") }),
            ),
            ApiError::Translation(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "翻译失败", "message": err.to_string() }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_maps_to_validation() {
        let api: ApiError = TranslateError::EmptyText.into();
        assert!(matches!(api, ApiError::Validation(_)));
    }

    #[test]
    fn protocol_error_maps_to_translation() {
        let api: ApiError = TranslateError::Protocol("54001: invalid sign".to_string()).into();
        assert!(matches!(api, ApiError::Translation(_)));
    }

    #[test]
    fn validation_renders_as_400() {
        let response = ApiError::Validation("没有上传图片".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_errors_render_as_500() {
        let ocr = ApiError::Ocr(anyhow::anyhow!("engine unavailable")).into_response();
        assert_eq!(ocr.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let translation =
            ApiError::Translation(TranslateError::Protocol("54001".to_string())).into_response();
        assert_eq!(translation.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
