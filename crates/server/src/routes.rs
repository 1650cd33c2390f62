use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::{types::Health, utils::route_path::HEALTH_PATH, Stats};
use service::{Document, DocumentLocator, NewDocument};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub locator: Arc<dyn DocumentLocator>,
    pub stats: Arc<Stats>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// 创建文档，id 由 curator 分配
async fn create_document(
    State(state): State<AppState>,
    Json(input): Json<NewDocument>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    state.stats.http_requests.inc();
    let doc = state.locator.create_document(input).await?;
    Ok((StatusCode::CREATED, Json(doc.as_ref().clone())))
}

async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    state.stats.http_requests.inc();
    let doc = state.locator.find_document(&id).await?;
    Ok(Json(doc.as_ref().clone()))
}

/// Build the document API router, nested under `base_path`.
pub fn build_router(state: AppState, base_path: &str, cors: CorsLayer) -> Router {
    let documents = Router::new()
        .route("/documents", post(create_document))
        .route("/documents/:id", get(get_document));

    let base = base_path.trim_end_matches('/');
    let api = if base.is_empty() {
        documents
    } else {
        Router::new().nest(base, documents)
    };

    Router::new()
        .route(HEALTH_PATH, get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx 以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
