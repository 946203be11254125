//! 기간 통계 모델.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::stat::StatVector;

/// 통계 기간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// 최근 7일
    Week,
    /// 최근 30일
    Month,
    /// 전체 기간
    All,
}

impl Period {
    /// 쿼리 토큰 해석 (알 수 없는 값은 `All`)
    pub fn parse(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::All,
        }
    }

    /// 고정 길이 기간의 일수
    pub fn fixed_days(&self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::All => None,
        }
    }
}

/// 이전 구간 대비 추세
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Flat,
    Down,
}

/// 기간 합계/평균
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAggregate {
    /// 요약이 있는 날짜 수
    pub days_count: i64,
    pub sums: StatVector,
    pub averages: StatVector,
}

/// 차트용 일별 데이터
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: StatVector,
}

/// 기간 통계 응답
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStats {
    pub period: Period,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub stats: PeriodAggregate,
    pub days_data: Vec<DayPoint>,
    /// 필드 레이블 → 추세
    pub comparison: BTreeMap<String, Trend>,
}

/// 전날 대비 비교
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyComparison {
    pub comparison: BTreeMap<String, Trend>,
    pub prev_date: Option<NaiveDate>,
}

impl DailyComparison {
    /// 비교 대상이 없는 날
    pub fn empty() -> Self {
        Self {
            comparison: BTreeMap::new(),
            prev_date: None,
        }
    }
}
