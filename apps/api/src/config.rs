use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub pdftoppm_path: String,
    pub preview_dpi: u32,
    pub max_upload_bytes: usize,
    /// Idle time after which a session is discarded.
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL", "gemini-pro"),
            pdftoppm_path: optional_env("PDFTOPPM_PATH", "pdftoppm"),
            preview_dpi: optional_env("PREVIEW_DPI", "100")
                .parse::<u32>()
                .context("PREVIEW_DPI must be a positive integer")?,
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            session_ttl: optional_env("SESSION_TTL_SECS", "3600")
                .parse::<u64>()
                .map(Duration::from_secs)
                .context("SESSION_TTL_SECS must be a number of seconds")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
