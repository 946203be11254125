//! 습관 카탈로그 API 핸들러.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use discipline_core::models::habit::{Habit, HabitFilter, HabitPatch, NewHabit};
use serde::Serialize;
use tracing::info;

use super::{Ack, DataResponse, STATUS_SUCCESS};
use crate::error::ApiError;
use crate::AppState;

/// 습관 생성 응답
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub status: &'static str,
    pub habit_id: i64,
}

/// 활성 습관 목록
///
/// GET /api/habits?category=&search=
pub async fn list_habits(
    State(state): State<AppState>,
    Query(filter): Query<HabitFilter>,
) -> Result<Json<DataResponse<Vec<Habit>>>, ApiError> {
    let habits = state.store.list_habits(&filter).await?;
    Ok(Json(DataResponse::success(habits)))
}

/// 카테고리 목록
///
/// GET /api/habits/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<String>>>, ApiError> {
    let categories = state.store.list_categories().await?;
    Ok(Json(DataResponse::success(categories)))
}

/// 습관 생성
///
/// POST /api/habits
pub async fn create_habit(
    State(state): State<AppState>,
    Json(req): Json<NewHabit>,
) -> Result<(StatusCode, Json<CreateHabitResponse>), ApiError> {
    let habit_id = state.store.create_habit(&req).await?;
    info!("습관 생성: id={}, name={}", habit_id, req.name);

    Ok((
        StatusCode::CREATED,
        Json(CreateHabitResponse {
            status: STATUS_SUCCESS,
            habit_id,
        }),
    ))
}

/// 습관 부분 수정
///
/// PUT /api/habits/{id}
pub async fn update_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<i64>,
    Json(patch): Json<HabitPatch>,
) -> Result<Json<Ack>, ApiError> {
    if !state.store.update_habit(habit_id, &patch).await? {
        return Err(ApiError::NotFound(format!("습관 ID: {habit_id}")));
    }
    Ok(Json(Ack::success()))
}

/// 습관 소프트 삭제
///
/// DELETE /api/habits/{id}
pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    if !state.store.deactivate_habit(habit_id).await? {
        return Err(ApiError::NotFound(format!("습관 ID: {habit_id}")));
    }
    info!("습관 비활성화: id={}", habit_id);
    Ok(Json(Ack::success()))
}
