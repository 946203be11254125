//! 상태 확인 API 핸들러.

use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;

use crate::error::ApiError;
use crate::AppState;

/// 상태 확인 응답
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    /// 전체 습관 수 (비활성 포함)
    pub habits_count: u64,
    /// 응답 시각 (로컬, RFC3339)
    pub timestamp: String,
}

/// 서버/저장소 상태 확인
///
/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let habits_count = state.store.count_habits().await?;

    Ok(Json(HealthResponse {
        status: "healthy",
        database: "connected",
        habits_count,
        timestamp: Local::now().to_rfc3339(),
    }))
}
