//! Tesseract sidecar OCR engine.

use super::OcrEngine;
use serde::Deserialize;
use tracing::{debug, info};

/// Sidecar response (private deserialization types).
#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    text: String,
    /// Recognition progress statuses, observability only.
    #[serde(default)]
    status: Vec<String>,
}

pub struct TesseractEngine {
    url: String,
    client: reqwest::Client,
}

impl TesseractEngine {
    pub fn new(client: reqwest::Client) -> Self {
        let url =
            std::env::var("TESSERACT_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());
        Self { url, client }
    }
}

#[async_trait::async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &[u8], lang: &str) -> anyhow::Result<String> {
        use reqwest::multipart::{Form, Part};

        info!("TesseractEngine: recognizing {} bytes (lang={})", image.len(), lang);

        let part = Part::bytes(image.to_vec())
            .file_name("upload")
            .mime_str("application/octet-stream")?;

        let form = Form::new()
            .part("image", part)
            .text("lang", lang.to_string());

        let response = self
            .client
            .post(format!("{}/recognize", self.url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Tesseract sidecar error ({}): {}", status, text);
        }

        let recognized: RecognizeResponse = response.json().await?;
        for status in &recognized.status {
            debug!("TesseractEngine: {}", status);
        }
        info!("TesseractEngine: recognized {} chars", recognized.text.chars().count());

        Ok(recognized.text)
    }
}
