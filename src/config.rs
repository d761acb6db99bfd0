//! Process configuration, resolved once at startup from the environment.

use anyhow::{Context, Result};
use std::env;

/// Read-only configuration shared by the whole process.
///
/// Provider credentials are required; startup fails fast when either is
/// missing rather than discovering it on the first translation request.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub baidu_app_id: String,
    pub baidu_secret_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {raw:?}"))?,
            Err(_) => 3000,
        };

        let baidu_app_id = env::var("BAIDU_APP_ID")
            .context("BAIDU_APP_ID environment variable not set")?;
        let baidu_secret_key = env::var("BAIDU_SECRET_KEY")
            .context("BAIDU_SECRET_KEY environment variable not set")?;

        Ok(Self {
            port,
            baidu_app_id,
            baidu_secret_key,
        })
    }
}
