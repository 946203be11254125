//! 로컬 저장소 포트.
//!
//! 구현: `discipline-storage` crate (rusqlite)

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::CoreError;
use crate::models::combination::{Combination, NewCombination};
use crate::models::completion::{CompletionRecord, CompletionView};
use crate::models::day::{DayCounts, DaySummary};
use crate::models::habit::{Habit, HabitFilter, HabitPatch, NewHabit};
use crate::models::streak::{StreakEntry, StreakSnapshot, StreakState};

/// 습관 카탈로그 저장소
#[async_trait]
pub trait HabitStorage: Send + Sync {
    /// 활성 습관 목록 (카테고리, 이름 순, composite 습관은 하위 작업 포함)
    async fn list_habits(&self, filter: &HabitFilter) -> Result<Vec<Habit>, CoreError>;

    /// 습관 조회 (비활성 포함)
    async fn get_habit(&self, habit_id: i64) -> Result<Option<Habit>, CoreError>;

    /// 활성 습관의 카테고리 목록
    async fn list_categories(&self) -> Result<Vec<String>, CoreError>;

    /// 습관 생성: (name, category) 중복 시 `CoreError::Conflict`
    async fn create_habit(&self, habit: &NewHabit) -> Result<i64, CoreError>;

    /// 습관 부분 수정 (존재하지 않으면 false)
    async fn update_habit(&self, habit_id: i64, patch: &HabitPatch) -> Result<bool, CoreError>;

    /// 소프트 삭제 (존재하지 않으면 false)
    async fn deactivate_habit(&self, habit_id: i64) -> Result<bool, CoreError>;

    /// 활성 습관 ID 목록
    async fn active_habit_ids(&self) -> Result<Vec<i64>, CoreError>;

    /// 전체 습관 수 (비활성 포함)
    async fn count_habits(&self) -> Result<u64, CoreError>;
}

/// 습관 조합 저장소
#[async_trait]
pub trait CombinationStorage: Send + Sync {
    /// 활성 조합 목록 (최신 순, 습관 이름 포함)
    async fn list_active_combinations(&self) -> Result<Vec<Combination>, CoreError>;

    /// 조합 생성: 같은 쌍이 이미 있으면 `CoreError::Conflict`
    async fn create_combination(&self, combination: &NewCombination) -> Result<i64, CoreError>;
}

/// 완료 기록 저장소
#[async_trait]
pub trait CompletionStorage: Send + Sync {
    /// 하루치 저장
    ///
    /// 해당 날짜의 완료 기록 삭제, 새 기록 삽입, 일일 요약 upsert를
    /// 하나의 트랜잭션으로 커밋한다.
    async fn save_day(
        &self,
        summary: &DaySummary,
        records: &[CompletionRecord],
    ) -> Result<(), CoreError>;

    /// 날짜별 완료 기록 (습관 정보 조인, 카테고리/이름 순)
    async fn get_completions(&self, date: NaiveDate) -> Result<Vec<CompletionView>, CoreError>;

    /// 습관의 성공 날짜 목록 (중복 제거, 오름차순)
    async fn successful_dates(&self, habit_id: i64) -> Result<Vec<NaiveDate>, CoreError>;
}

/// 일일 요약 저장소
#[async_trait]
pub trait DaySummaryStorage: Send + Sync {
    /// 날짜별 요약
    async fn get_day_summary(&self, date: NaiveDate) -> Result<Option<DaySummary>, CoreError>;

    /// 기간 내 요약 (양 끝 포함, 날짜 순)
    async fn day_summaries_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DaySummary>, CoreError>;

    /// 가장 이른 요약 날짜
    async fn earliest_day(&self) -> Result<Option<NaiveDate>, CoreError>;

    /// 지정 날짜 이전의 가장 최근 요약
    async fn previous_day_summary(
        &self,
        before: NaiveDate,
    ) -> Result<Option<DaySummary>, CoreError>;

    /// 누적 일수, 최대 N일차
    async fn day_counts(&self) -> Result<DayCounts, CoreError>;
}

/// 스트릭 저장소
#[async_trait]
pub trait StreakStorage: Send + Sync {
    /// 스트릭 행 일괄 교체 (습관당 1행, 한 번에 커밋)
    async fn replace_streaks(&self, streaks: &[StreakState]) -> Result<(), CoreError>;

    /// 활성 습관 전체 스트릭 (현재 desc, 최장 desc, 카테고리, 이름)
    async fn streak_board(&self) -> Result<Vec<StreakEntry>, CoreError>;

    /// 지정 습관들의 스트릭 (행이 없는 습관은 제외)
    async fn streaks_for(
        &self,
        habit_ids: &[i64],
    ) -> Result<HashMap<i64, StreakSnapshot>, CoreError>;
}

/// 전체 저장소: 모든 포트를 구현한 어댑터
pub trait DisciplineStore:
    HabitStorage + CombinationStorage + CompletionStorage + DaySummaryStorage + StreakStorage
{
}

impl<T> DisciplineStore for T where
    T: HabitStorage + CombinationStorage + CompletionStorage + DaySummaryStorage + StreakStorage
{
}
