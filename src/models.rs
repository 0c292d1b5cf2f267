use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A shortened URL record from the `urls` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShortLink {
    pub code: String,
    pub original_url: String,
    pub created_at: NaiveDateTime,
}

/// Body of `POST /api/shorten`.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub code: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
