use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod codegen;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod shortener;

use db::UrlStore;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub store: UrlStore,
    pub config: config::AppConfig,
}

// ── Router ─────────────────────────────────────────────────────────────────

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(|| async { StatusCode::OK }))
        .route("/api/shorten", post(handlers::shorten::shorten))
        // Short-code redirect; static routes above take priority
        .route("/:code", get(handlers::redirect::redirect))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent; env vars may already be set)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hashlink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::AppConfig::from_env()?;
    tracing::info!("Starting hashlink on {}:{}", config.host, config.port);
    tracing::info!("Base URL: {}", config.base_url);
    tracing::info!("Short code length: {}", config.short_code_length);

    let store = UrlStore::connect(&config.database_url).await?;
    tracing::info!("{} short link(s) stored", store.count().await?);

    let bind_addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState { store, config });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        db::tests::temp_store,
        models::{ErrorResponse, ShortenResponse},
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, Response},
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BASE_URL: &str = "http://localhost:3010";

    async fn test_app() -> (Router, TempDir) {
        let (store, dir) = temp_store().await;
        let config = AppConfig::from_lookup(|_| None).unwrap();
        (router(Arc::new(AppState { store, config })), dir)
    }

    fn shorten_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/shorten")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_url_is_rejected() {
        let (app, _dir) = test_app().await;
        let response = app.oneshot(shorten_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.error, "Please provide a URL");
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let (app, _dir) = test_app().await;
        let response = app
            .oneshot(shorten_request(r#"{"url":"not-a-url"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.error, "Invalid URL format");
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (app, _dir) = test_app().await;
        let response = app.oneshot(shorten_request("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.error, "Invalid request body");
    }

    #[tokio::test]
    async fn shorten_returns_short_url() {
        let (app, _dir) = test_app().await;
        let response = app
            .oneshot(shorten_request(r#"{"url":"https://example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ShortenResponse = json(response).await;
        assert_eq!(body.code, codegen::generate("https://example.com", 10));
        assert_eq!(body.short_url, format!("{BASE_URL}/{}", body.code));
    }

    #[tokio::test]
    async fn short_url_redirects_to_original() {
        let (app, _dir) = test_app().await;
        let response = app
            .clone()
            .oneshot(shorten_request(r#"{"url":"https://example.com"}"#))
            .await
            .unwrap();
        let body: ShortenResponse = json(response).await;

        let response = app.oneshot(get(&format!("/{}", body.code))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn url_with_newline_is_rejected() {
        let (app, _dir) = test_app().await;
        let response = app
            .oneshot(shorten_request(r#"{"url":"https://example.com/a\nb"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.error, "Invalid URL format");
    }

    #[tokio::test]
    async fn unsendable_stored_url_is_500() {
        let (store, _dir) = temp_store().await;
        store.put("badloc", "https://example.com/a\nb").await.unwrap();
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let app = router(Arc::new(AppState { store, config }));

        let response = app.oneshot(get("/badloc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[tokio::test]
    async fn unknown_code_is_404() {
        let (app, _dir) = test_app().await;
        let response = app.oneshot(get("/nonexistent")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"URL not found");
    }

    #[tokio::test]
    async fn resubmission_returns_same_code() {
        let (app, _dir) = test_app().await;
        let mut codes = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(shorten_request(r#"{"url":"https://example.com?foo=bar"}"#))
                .await
                .unwrap();
            let body: ShortenResponse = json(response).await;
            codes.push(body.code);
        }

        assert_eq!(codes[0], codes[1]);
    }

    #[tokio::test]
    async fn index_and_health() {
        let (app, _dir) = test_app().await;

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"URL Shortener API");

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let (app, _dir) = test_app().await;
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/shorten")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
