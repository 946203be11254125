//! 일일 완료 기록 API 핸들러.

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use discipline_core::models::completion::{CompletionView, DaySubmission, SkippedEntry};
use discipline_core::models::day::DaySummary;
use discipline_core::models::streak::StreakSnapshot;
use discipline_engine::day::resolve_date;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use super::{today, STATUS_SUCCESS};
use crate::error::ApiError;
use crate::AppState;

/// 하루치 저장 응답
#[derive(Debug, Serialize)]
pub struct SaveDayResponse {
    pub status: &'static str,
    pub date: NaiveDate,
    /// 적용된 마찰 배율
    pub friction_multiplier: f64,
    /// 저장된 완료 기록 수
    pub saved: usize,
    /// 건너뛴 항목
    pub skipped: Vec<SkippedEntry>,
}

/// 날짜 조회 응답
#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub status: &'static str,
    pub date: NaiveDate,
    pub completions: Vec<CompletionView>,
    /// 일일 요약 (없으면 null)
    pub day: Option<DaySummary>,
    /// habit_id → 스트릭
    pub streaks: HashMap<i64, StreakSnapshot>,
}

/// 하루치 완료 기록 저장
///
/// POST /api/completions
pub async fn save_day(
    State(state): State<AppState>,
    Json(submission): Json<DaySubmission>,
) -> Result<Json<SaveDayResponse>, ApiError> {
    let outcome = state.recorder.record_day(submission, today()).await?;

    Ok(Json(SaveDayResponse {
        status: STATUS_SUCCESS,
        date: outcome.date,
        friction_multiplier: outcome.friction_multiplier,
        saved: outcome.saved,
        skipped: outcome.skipped,
    }))
}

/// 날짜별 완료 기록, 요약, 스트릭 조회
///
/// GET /api/completions/{date}
pub async fn get_day(
    State(state): State<AppState>,
    Path(raw_date): Path<String>,
) -> Result<Json<DayResponse>, ApiError> {
    let date = resolve_date(Some(&raw_date), today())?;

    let completions = state.store.get_completions(date).await?;
    let day = state.store.get_day_summary(date).await?;

    let habit_ids: Vec<i64> = completions
        .iter()
        .map(|c| c.habit_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let streaks = state.store.streaks_for(&habit_ids).await?;

    Ok(Json(DayResponse {
        status: STATUS_SUCCESS,
        date,
        completions,
        day,
        streaks,
    }))
}
