//! HTTP transport: routes and request extraction.

use axum::{
    Json, Router,
    extract::{RawQuery, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};
use crate::handler::SearchHandler;
use crate::models::{EssentialPaper, SearchParams, SearchRequest};

/// Plain-text body of the liveness route.
pub const LIVENESS_MESSAGE: &str = "Literature Review AI Backend is running!";

/// Create the HTTP router.
pub fn create_router(handler: SearchHandler) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/search", post(handle_search))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

async fn home() -> &'static str {
    tracing::info!("Root endpoint accessed");
    LIVENESS_MESSAGE
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "litreview-backend",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handle POST /search.
async fn handle_search(
    State(handler): State<SearchHandler>,
    RawQuery(query): RawQuery,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResult<Json<Vec<EssentialPaper>>> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::warn!(reason = %rejection.body_text(), "Search request without JSON payload");
            return Err(ApiError::InvalidRequest);
        }
    };

    let params = SearchParams::from_query(query.as_deref());
    let request = SearchRequest::from_json(&body, params.require_pdf()).inspect_err(|e| {
        tracing::warn!(error = %e, "Rejected search request");
    })?;

    handler.handle(&request).await.map(Json)
}
