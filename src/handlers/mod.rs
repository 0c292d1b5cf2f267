pub mod redirect;
pub mod shorten;

use crate::models::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// GET /
pub async fn index() -> &'static str {
    "URL Shortener API"
}

/// JSON `{ "error": ... }` body with the given status.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_owned(),
        }),
    )
        .into_response()
}
