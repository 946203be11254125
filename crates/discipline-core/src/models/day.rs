//! 일일 요약 모델.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::completion::DayMeta;
use super::stat::StatVector;

/// 날짜별 집계 레코드 (날짜당 1개)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub meta: DayMeta,
    /// 최종 스탯 합계 (조합 보너스, 마찰 배율 반영)
    pub totals: StatVector,
    /// 성공한 습관 수
    pub completed_count: i64,
    /// 전체 습관 수
    pub total_count: i64,
}

/// 누적 일수 통계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCounts {
    /// 요약이 존재하는 날짜 수
    pub total_days: i64,
    /// 최대 N일차
    pub max_day: i64,
}
