use crate::{
    error::ShortenError,
    handlers::error_response,
    models::{ShortenRequest, ShortenResponse},
    shortener, AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// POST /api/shorten
///
/// 1. Validate the submitted URL (presence, then syntax).
/// 2. Derive the code and store the mapping (a no-op if already stored).
/// 3. Return the public short URL.
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("Rejected shorten body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let url = match request.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_owned(),
        _ => return error_response(StatusCode::BAD_REQUEST, "Please provide a URL"),
    };

    if !shortener::validate_url(&url) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid URL format");
    }

    match shortener::shorten(&state.store, &url, state.config.short_code_length).await {
        Ok(link) => Json(ShortenResponse {
            short_url: state.config.short_url(&link.code),
            code: link.code,
            created_at: link.created_at,
        })
        .into_response(),
        Err(ShortenError::Collision { .. }) => {
            error_response(StatusCode::CONFLICT, "Short code collision")
        }
        Err(e) => {
            tracing::error!("Failed to shorten '{}': {:?}", url, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to shorten URL")
        }
    }
}
