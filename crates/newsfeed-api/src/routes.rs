use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use newsfeed_core::{AppError, NewsFeed};

#[derive(Clone)]
pub struct AppState {
    pub feed: NewsFeed,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/news", get(get_news))
        .route("/api/news/featured", get(get_featured_news))
        .route("/health", get(health))
        .with_state(state)
}

/// GET /api/news
pub async fn get_news(State(state): State<AppState>) -> Response {
    match query(&state, NewsFeed::get_all_articles).await {
        Ok(articles) => json_ok(articles),
        Err(resp) => resp,
    }
}

/// GET /api/news/featured
pub async fn get_featured_news(State(state): State<AppState>) -> Response {
    match query(&state, NewsFeed::get_featured_articles).await {
        Ok(Some(articles)) => json_ok(articles),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(resp) => resp,
    }
}

/// GET /health
pub async fn health() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}

/// Run a feed query on the blocking pool; store reads block.
async fn query<T, F>(state: &AppState, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&NewsFeed) -> newsfeed_core::Result<T> + Send + 'static,
{
    let feed = state.feed.clone();
    match tokio::task::spawn_blocking(move || f(&feed)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Newsfeed query failed");
            Err(error_response(&e))
        }
        Err(e) => {
            tracing::error!(error = %e, "Newsfeed query task failed");
            Err(error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))
        }
    }
}

fn json_ok<T: serde::Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        Json(body),
    )
        .into_response()
}

fn error_response(e: &AppError) -> Response {
    match e {
        AppError::FormatError(_) => {
            error_body(StatusCode::BAD_GATEWAY, "Stored article data is malformed")
        }
        AppError::DatastoreUnavailable(_) => {
            error_body(StatusCode::SERVICE_UNAVAILABLE, "Datastore unavailable")
        }
        _ => error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({"error": message}))).into_response()
}
