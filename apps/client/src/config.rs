use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Client configuration loaded from environment variables.
/// Every setting has a default; only malformed values are errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token_file: PathBuf,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let request_timeout = match std::env::var("JOBALIGN_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("JOBALIGN_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_url: std::env::var("JOBALIGN_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token_file: std::env::var("JOBALIGN_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_token_file(std::env::var_os("HOME").map(PathBuf::from))),
            request_timeout: Duration::from_secs(request_timeout),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn default_token_file(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) => home.join(".jobalign").join("access_token"),
        None => PathBuf::from(".jobalign_token"),
    }
}
