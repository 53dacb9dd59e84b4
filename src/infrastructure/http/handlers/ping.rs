//! Ping Handler
//!
//! 健康检查，附带生成式后端状态

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::PingResponse;
use crate::infrastructure::http::state::AppState;

/// Ping endpoint - 健康检查
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let healthy = state.backend.health_check().await;

    Json(PingResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.backend.name().to_string(),
    })
}
