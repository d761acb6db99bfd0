//! Baidu Fanyi translation client.
//!
//! The provider authenticates each call with an MD5 signature over
//! `appid ‖ query ‖ salt ‖ secret` rendered as lowercase hex. The salt is a
//! fresh timestamp per request, so the signature is recomputed every call;
//! the secret itself never leaves the process. Direction is fixed en→zh.

use chrono::Utc;
use md5::{Digest, Md5};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const BAIDU_TRANSLATE_URL: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";

#[derive(Debug, Error)]
pub enum TranslateError {
    /// Rejected before any network call is made.
    #[error("没有提供文本")]
    EmptyText,

    #[error("translation provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered but the response carried no `trans_result`.
    #[error("翻译响应错误: {0}")]
    Protocol(String),
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    trans_result: Option<Vec<TransSegment>>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransSegment {
    dst: String,
}

pub struct BaiduTranslator {
    client: reqwest::Client,
    endpoint: String,
    app_id: String,
    secret_key: String,
}

impl BaiduTranslator {
    pub fn new(
        client: reqwest::Client,
        app_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: BAIDU_TRANSLATE_URL.to_string(),
            app_id: app_id.into(),
            secret_key: secret_key.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Signature for one call: MD5(appid ‖ text ‖ salt ‖ secret) as hex.
    fn sign(&self, text: &str, salt: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.app_id.as_bytes());
        hasher.update(text.as_bytes());
        hasher.update(salt.as_bytes());
        hasher.update(self.secret_key.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Translate English text to Chinese. Multi-segment results are joined
    /// with newlines. No retry; the transport's default timeout applies.
    pub async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        if text.is_empty() {
            return Err(TranslateError::EmptyText);
        }

        let salt = Utc::now().timestamp_millis().to_string();
        let sign = self.sign(text, &salt);

        debug!("BaiduTranslator: translating {} chars", text.chars().count());

        let response: TranslateResponse = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", text),
                ("from", "en"),
                ("to", "zh"),
                ("appid", self.app_id.as_str()),
                ("salt", salt.as_str()),
                ("sign", sign.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        extract_translation(response)
    }
}

/// Join translated segments, or report the provider's own error detail
/// when the result field is missing.
fn extract_translation(response: TranslateResponse) -> Result<String, TranslateError> {
    match response.trans_result {
        Some(segments) if !segments.is_empty() => Ok(segments
            .into_iter()
            .map(|s| s.dst)
            .collect::<Vec<_>>()
            .join("\n")),
        _ => {
            let detail = match (response.error_code, response.error_msg) {
                (Some(code), Some(msg)) => format!("{code}: {msg}"),
                (Some(code), None) => code,
                (None, Some(msg)) => msg,
                (None, None) => "missing trans_result".to_string(),
            };
            Err(TranslateError::Protocol(detail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> BaiduTranslator {
        BaiduTranslator::new(reqwest::Client::new(), "20240001", "secret")
    }

    #[test]
    fn signature_is_deterministic() {
        let t = translator();
        let a = t.sign("hello", "1700000000000");
        let b = t.sign("hello", "1700000000000");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn signature_changes_with_any_input() {
        let t = translator();
        let base = t.sign("hello", "1700000000000");
        assert_ne!(base, t.sign("hello!", "1700000000000"));
        assert_ne!(base, t.sign("hello", "1700000000001"));

        let other_creds = BaiduTranslator::new(reqwest::Client::new(), "20240002", "secret");
        assert_ne!(base, other_creds.sign("hello", "1700000000000"));
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_network_call() {
        // Unroutable endpoint: reaching the network would fail differently.
        let t = translator().with_endpoint("http://127.0.0.1:1/translate");
        let err = t.translate("").await.unwrap_err();
        assert!(matches!(err, TranslateError::EmptyText));
    }

    #[test]
    fn segments_are_joined_with_newlines() {
        let response: TranslateResponse = serde_json::from_value(serde_json::json!({
            "trans_result": [{"dst": "你好"}, {"dst": "世界"}]
        }))
        .unwrap();
        assert_eq!(extract_translation(response).unwrap(), "你好\n世界");
    }

    #[test]
    fn single_segment_scenario() {
        let response: TranslateResponse = serde_json::from_value(serde_json::json!({
            "trans_result": [{"dst": "你好"}]
        }))
        .unwrap();
        assert_eq!(extract_translation(response).unwrap(), "你好");
    }

    #[test]
    fn missing_trans_result_is_a_protocol_error() {
        let response: TranslateResponse = serde_json::from_value(serde_json::json!({
            "error_code": "54001",
            "error_msg": "Invalid Sign"
        }))
        .unwrap();
        let err = extract_translation(response).unwrap_err();
        assert!(matches!(err, TranslateError::Protocol(ref d) if d == "54001: Invalid Sign"));
    }
}
