//! 통계 API 핸들러.

use axum::extract::{Query, State};
use axum::Json;
use discipline_core::models::day::DayCounts;
use discipline_core::models::stats::{DailyComparison, Period, PeriodStats};
use discipline_core::models::streak::StreakEntry;
use discipline_engine::day::resolve_date;
use discipline_engine::{period, streak};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{today, DataResponse, StatusResponse, STATUS_SUCCESS};
use crate::error::ApiError;
use crate::AppState;

/// 기간 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// week | month | all (기본: week)
    pub period: Option<String>,
}

/// 날짜 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// YYYY-MM-DD (기본: 오늘)
    pub date: Option<String>,
}

/// 스트릭 재계산 응답
#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub status: &'static str,
    /// 재계산한 습관 수
    pub rebuilt: usize,
}

/// 활성 습관 전체 스트릭
///
/// GET /api/stats/streaks
pub async fn get_streaks(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<StreakEntry>>>, ApiError> {
    let board = state.store.streak_board().await?;
    Ok(Json(DataResponse::success(board)))
}

/// 스트릭 전체 재계산
///
/// POST /api/stats/streaks/rebuild
pub async fn rebuild_streaks(
    State(state): State<AppState>,
) -> Result<Json<RebuildResponse>, ApiError> {
    let streaks = streak::rebuild_all(state.store.as_ref()).await?;
    info!("스트릭 재계산 요청 처리: {}개", streaks.len());

    Ok(Json(RebuildResponse {
        status: STATUS_SUCCESS,
        rebuilt: streaks.len(),
    }))
}

/// 기간 통계
///
/// GET /api/stats/period?period=week|month|all
pub async fn get_period_stats(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<StatusResponse<PeriodStats>>, ApiError> {
    let requested = query
        .period
        .as_deref()
        .map_or(Period::Week, Period::parse);

    let stats = period::period_stats(state.store.as_ref(), requested, today()).await?;
    Ok(Json(StatusResponse::success(stats)))
}

/// 전날 대비 비교
///
/// GET /api/stats/daily_comparison?date=
pub async fn get_daily_comparison(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<StatusResponse<DailyComparison>>, ApiError> {
    let date = resolve_date(query.date.as_deref(), today())?;
    let comparison = period::daily_comparison(state.store.as_ref(), date).await?;
    Ok(Json(StatusResponse::success(comparison)))
}

/// 누적 일수
///
/// GET /api/stats/total_days
pub async fn get_total_days(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse<DayCounts>>, ApiError> {
    let counts = state.store.day_counts().await?;
    Ok(Json(StatusResponse::success(counts)))
}
