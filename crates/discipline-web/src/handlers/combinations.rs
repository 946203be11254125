//! 습관 조합 API 핸들러.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use discipline_core::models::combination::{Combination, NewCombination};
use serde::Serialize;
use tracing::info;

use super::{DataResponse, STATUS_SUCCESS};
use crate::error::ApiError;
use crate::AppState;

/// 조합 생성 응답
#[derive(Debug, Serialize)]
pub struct CreateCombinationResponse {
    pub status: &'static str,
    pub id: i64,
}

/// 활성 조합 목록 (최신 순)
///
/// GET /api/combinations
pub async fn list_combinations(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Combination>>>, ApiError> {
    let combinations = state.store.list_active_combinations().await?;
    Ok(Json(DataResponse::success(combinations)))
}

/// 조합 생성
///
/// POST /api/combinations
pub async fn create_combination(
    State(state): State<AppState>,
    Json(req): Json<NewCombination>,
) -> Result<(StatusCode, Json<CreateCombinationResponse>), ApiError> {
    let id = state.store.create_combination(&req).await?;
    info!(
        "조합 생성: id={}, habits=({}, {})",
        id, req.habit_a, req.habit_b
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateCombinationResponse {
            status: STATUS_SUCCESS,
            id,
        }),
    ))
}
