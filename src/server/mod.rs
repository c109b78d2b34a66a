//! HTTP transport: `POST /api/analyze` and `GET /api/health`.

use crate::analyzer::DependencyAnalyzer;
use crate::error::DepScanError;
use crate::models::{AnalyzeRequest, AnalyzeResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<DependencyAnalyzer>,
}

pub fn router(analyzer: Arc<DependencyAnalyzer>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/analyze", post(analyze_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { analyzer })
}

pub async fn serve(analyzer: Arc<DependencyAnalyzer>, addr: SocketAddr) -> Result<(), DepScanError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("depscan server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(analyzer)).await?;
    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> (StatusCode, Json<AnalyzeResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AnalyzeResponse::failure(rejection.body_text())),
            );
        }
    };

    if request.content.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AnalyzeResponse::failure("content must not be empty")),
        );
    }

    match state.analyzer.analyze_manifest(&request.content).await {
        Ok(result) => (StatusCode::OK, Json(AnalyzeResponse::ok(result))),
        Err(e) if e.is_client_error() => {
            tracing::info!(error = %e, "rejected manifest");
            (StatusCode::BAD_REQUEST, Json(AnalyzeResponse::failure(e.public_message())))
        }
        Err(e) => {
            tracing::error!(error = %e, "analysis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalyzeResponse::failure(e.public_message())),
            )
        }
    }
}
