use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::cache::CacheStats;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    cache: CacheStats,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.service.cache_stats().await,
    })
}
