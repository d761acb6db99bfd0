//! OCR engine abstraction.
//!
//! Defines the [`OcrEngine`] trait so the recognition backend (currently a
//! Tesseract sidecar) can be swapped without touching the handlers.

pub mod tesseract;

/// Async trait implemented by each OCR backend.
///
/// Input is the raw image bytes plus a language hint (`"eng"` for this
/// service); output is the recognized text, untrimmed.
#[async_trait::async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;
    async fn recognize(&self, image: &[u8], lang: &str) -> anyhow::Result<String>;
}
