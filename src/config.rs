use crate::codegen::{DEFAULT_CODE_LENGTH, MAX_CODE_LENGTH};
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string, e.g. "sqlite:./shortener.db"
    pub database_url: String,

    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Public base URL used when building short links, e.g. "https://go.example.com"
    /// Must NOT have a trailing slash.
    pub base_url: String,

    /// Length of newly generated short codes. `SHORT_CODE_LENGTH` must be a
    /// whole integer: any integer is clamped to 1..=64 ("0" and "-5" give 1),
    /// anything else ("5abc", "five") falls back to 10.
    pub short_code_length: usize,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3010".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let base_url = lookup("BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_owned();

        // Unset or non-integer falls back to the default
        let short_code_length = lookup("SHORT_CODE_LENGTH")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|n| n.clamp(1, MAX_CODE_LENGTH as i64) as usize)
            .unwrap_or(DEFAULT_CODE_LENGTH);

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite:./shortener.db".into()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            base_url,
            short_code_length,
        })
    }

    /// Full public URL for a short code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
