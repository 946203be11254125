//! 기간 통계와 추세 비교.
//!
//! 기간 합계/평균은 일일 요약만으로 계산한다. 추세는 직전 같은 길이 구간의
//! 평균과 비교해 ±5% 이내면 `flat`이다.

use chrono::{Duration, NaiveDate};
use discipline_core::error::CoreError;
use discipline_core::models::day::DaySummary;
use discipline_core::models::stat::StatVector;
use discipline_core::models::stats::{
    DailyComparison, DayPoint, Period, PeriodAggregate, PeriodStats, Trend,
};
use discipline_core::ports::storage::DisciplineStore;
use std::collections::BTreeMap;
use tracing::debug;

/// 추세 판정 임계값 (%)
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// 기간 → (시작일, 종료일), 양 끝 포함
///
/// `all`은 가장 이른 요약일부터. 요약이 없으면 오늘 하루.
pub fn period_window(
    period: Period,
    today: NaiveDate,
    earliest: Option<NaiveDate>,
) -> (NaiveDate, NaiveDate) {
    let start = match period.fixed_days() {
        Some(days) => today - Duration::days(days),
        None => earliest.map_or(today, |d| d.min(today)),
    };
    (start, today)
}

/// 직전 같은 길이 구간
pub fn previous_window(start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
    let prev_end = start - Duration::days(1);
    let prev_start = prev_end - (end - start);
    (prev_start, prev_end)
}

/// 요약 목록 → 합계/평균
pub fn aggregate(summaries: &[DaySummary]) -> PeriodAggregate {
    let days_count = summaries.len() as i64;
    let sums: StatVector = summaries.iter().map(|s| s.totals).sum();
    let averages = if days_count > 0 {
        sums.scaled(1.0 / days_count as f64)
    } else {
        StatVector::ZERO
    };
    PeriodAggregate {
        days_count,
        sums,
        averages,
    }
}

/// 기간 추세 (이전 값 0이면 `flat`)
pub fn period_trend(current: f64, previous: f64) -> Trend {
    if previous == 0.0 {
        return Trend::Flat;
    }
    percent_trend(current, previous)
}

/// 전날 대비 추세 (이전 값 0이면 오늘 값의 부호)
pub fn daily_trend(today: f64, previous: f64) -> Trend {
    if previous == 0.0 {
        return if today > 0.0 {
            Trend::Up
        } else if today < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        };
    }
    percent_trend(today, previous)
}

fn percent_trend(current: f64, previous: f64) -> Trend {
    let change = (current - previous) / previous.abs() * 100.0;
    if change > TREND_THRESHOLD_PERCENT {
        Trend::Up
    } else if change < -TREND_THRESHOLD_PERCENT {
        Trend::Down
    } else {
        Trend::Flat
    }
}

/// 필드별 추세 맵 (레이블 → 추세)
pub fn compare_fields(
    current: &StatVector,
    previous: &StatVector,
    rule: fn(f64, f64) -> Trend,
) -> BTreeMap<String, Trend> {
    current
        .labeled()
        .zip(previous.to_array())
        .map(|((label, cur), prev)| (label.to_string(), rule(cur, prev)))
        .collect()
}

/// 기간 통계 조회
pub async fn period_stats(
    store: &dyn DisciplineStore,
    period: Period,
    today: NaiveDate,
) -> Result<PeriodStats, CoreError> {
    let earliest = match period {
        Period::All => store.earliest_day().await?,
        _ => None,
    };
    let (start_date, end_date) = period_window(period, today, earliest);
    let summaries = store.day_summaries_between(start_date, end_date).await?;
    let stats = aggregate(&summaries);

    let (prev_start, prev_end) = previous_window(start_date, end_date);
    let previous = aggregate(&store.day_summaries_between(prev_start, prev_end).await?);
    let comparison = compare_fields(&stats.averages, &previous.averages, period_trend);

    debug!(
        "기간 통계: period={:?}, {}~{}, days={}",
        period, start_date, end_date, stats.days_count
    );

    let days_data = summaries
        .iter()
        .map(|s| DayPoint {
            date: s.date,
            totals: s.totals,
        })
        .collect();

    Ok(PeriodStats {
        period,
        start_date,
        end_date,
        stats,
        days_data,
        comparison,
    })
}

/// 전날 대비 비교
///
/// 해당 날짜 요약이나 그 이전 요약이 없으면 빈 맵.
pub async fn daily_comparison(
    store: &dyn DisciplineStore,
    date: NaiveDate,
) -> Result<DailyComparison, CoreError> {
    let Some(today) = store.get_day_summary(date).await? else {
        return Ok(DailyComparison::empty());
    };
    let Some(previous) = store.previous_day_summary(date).await? else {
        return Ok(DailyComparison::empty());
    };

    Ok(DailyComparison {
        comparison: compare_fields(&today.totals, &previous.totals, daily_trend),
        prev_date: Some(previous.date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use discipline_core::models::completion::DayMeta;
    use discipline_core::models::stat::STAT_LABELS;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn summary(date: &str, i: f64) -> DaySummary {
        DaySummary {
            date: d(date),
            meta: DayMeta::default(),
            totals: StatVector {
                i,
                ..Default::default()
            },
            completed_count: 1,
            total_count: 1,
        }
    }

    fn all_labels(map: &BTreeMap<String, Trend>, trend: Trend) -> bool {
        map.len() == STAT_LABELS.len() && map.values().all(|t| *t == trend)
    }

    // ============================================================
    // 기간 구간
    // ============================================================

    #[test]
    fn week_and_month_windows() {
        let today = d("2024-03-31");
        assert_eq!(
            period_window(Period::Week, today, None),
            (d("2024-03-24"), today)
        );
        assert_eq!(
            period_window(Period::Month, today, Some(d("2020-01-01"))),
            (d("2024-03-01"), today)
        );
    }

    #[test]
    fn all_window_starts_at_earliest_summary() {
        let today = d("2024-03-31");
        assert_eq!(
            period_window(Period::All, today, Some(d("2024-01-15"))),
            (d("2024-01-15"), today)
        );
        assert_eq!(period_window(Period::All, today, None), (today, today));
    }

    #[test]
    fn previous_window_has_equal_length() {
        let (start, end) = (d("2024-03-24"), d("2024-03-31"));
        let (prev_start, prev_end) = previous_window(start, end);
        assert_eq!(prev_end, d("2024-03-23"));
        assert_eq!(prev_start, d("2024-03-16"));
        assert_eq!(end - start, prev_end - prev_start);
    }

    // ============================================================
    // 집계, 추세
    // ============================================================

    #[test]
    fn aggregate_sums_and_averages() {
        let agg = aggregate(&[summary("2024-01-01", 10.0), summary("2024-01-02", 20.0)]);
        assert_eq!(agg.days_count, 2);
        assert_eq!(agg.sums.i, 30.0);
        assert_eq!(agg.averages.i, 15.0);

        let empty = aggregate(&[]);
        assert_eq!(empty.days_count, 0);
        assert_eq!(empty.averages, StatVector::ZERO);
    }

    #[test]
    fn period_trend_thresholds() {
        assert_eq!(period_trend(106.0, 100.0), Trend::Up);
        assert_eq!(period_trend(104.0, 100.0), Trend::Flat);
        assert_eq!(period_trend(96.0, 100.0), Trend::Flat);
        assert_eq!(period_trend(94.0, 100.0), Trend::Down);
        assert_eq!(period_trend(50.0, 0.0), Trend::Flat);
        // 음수 기준값은 절대값으로 나눈다
        assert_eq!(period_trend(-5.0, -10.0), Trend::Up);
    }

    #[test]
    fn daily_trend_uses_sign_when_previous_is_zero() {
        assert_eq!(daily_trend(3.0, 0.0), Trend::Up);
        assert_eq!(daily_trend(-1.0, 0.0), Trend::Down);
        assert_eq!(daily_trend(0.0, 0.0), Trend::Flat);
        assert_eq!(daily_trend(90.0, 100.0), Trend::Down);
    }

    #[test]
    fn comparison_covers_every_label() {
        let map = compare_fields(&StatVector::ZERO, &StatVector::ZERO, period_trend);
        assert!(all_labels(&map, Trend::Flat));
        assert!(map.contains_key("$"));
        assert!(map.contains_key("ST"));
    }
}
