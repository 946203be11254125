//! 연속 기록(스트릭) 모델.
//!
//! 완료 기록에서 언제든 다시 계산할 수 있는 파생 상태다.

use chrono::NaiveDate;
use serde::Serialize;

/// 습관 하나의 스트릭 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakState {
    pub habit_id: i64,
    /// 마지막 성공일에서 끝나는 연속 일수
    pub current_streak: u32,
    /// 전체 이력 중 최장 연속 일수
    pub longest_streak: u32,
    /// 마지막 성공일
    pub last_date: Option<NaiveDate>,
}

impl StreakState {
    /// 성공 이력이 없는 습관
    pub fn empty(habit_id: i64) -> Self {
        Self {
            habit_id,
            current_streak: 0,
            longest_streak: 0,
            last_date: None,
        }
    }
}

/// 스트릭 보드 항목 (활성 습관 전체, 기록 없으면 0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakEntry {
    pub habit_id: i64,
    pub name: String,
    pub category: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_date: Option<NaiveDate>,
}

/// 날짜 조회 응답에 포함되는 간단한 스트릭 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakSnapshot {
    pub current: u32,
    pub longest: u32,
}
