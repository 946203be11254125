//! 하루치 완료 저장 트랜잭션.
//!
//! 처리 순서:
//! 1. 입력 검증, 배율 적용 → 완료 기록 생성 (habit_id 없는 항목은 건너뜀)
//! 2. 성공 습관 집합 → 조합 보너스
//! 3. 일일 합계 계산
//! 4. 완료 기록 교체 + 일일 요약 upsert (단일 트랜잭션)
//! 5. 활성 습관 전체 스트릭 재계산
//!
//! 보너스 계산과 스트릭 재계산 실패는 경고만 남기고 저장 결과를 유지한다.

use chrono::NaiveDate;
use discipline_core::error::CoreError;
use discipline_core::models::completion::{CompletionRecord, DaySubmission, SkippedEntry};
use discipline_core::models::day::DaySummary;
use discipline_core::models::stat::StatVector;
use discipline_core::ports::storage::DisciplineStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::combination::{completed_habit_ids, resolve_bonus};
use crate::streak;
use crate::totals::{aggregate_day_totals, award, friction_multiplier};

/// 날짜 문자열 형식
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 저장 결과
#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    pub date: NaiveDate,
    pub friction_multiplier: f64,
    /// 저장된 완료 기록 수
    pub saved: usize,
    pub skipped: Vec<SkippedEntry>,
    /// 적용된 조합 보너스 (배율 적용 전)
    pub bonus: StatVector,
    /// 저장된 일일 합계
    pub totals: StatVector,
    /// 스트릭 재계산 성공 여부
    pub streaks_rebuilt: bool,
}

/// 날짜 문자열 해석 (비어 있으면 `today`)
pub fn resolve_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, CoreError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(today),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| {
            CoreError::validation("date", format!("YYYY-MM-DD 형식이 아닙니다: {s}"))
        }),
    }
}

/// 하루치 완료 기록 저장 서비스
#[derive(Clone)]
pub struct DayRecorder {
    store: Arc<dyn DisciplineStore>,
}

impl DayRecorder {
    pub fn new(store: Arc<dyn DisciplineStore>) -> Self {
        Self { store }
    }

    /// 하루치 완료 기록 저장
    ///
    /// `today`는 요청에 날짜가 없을 때 사용한다.
    pub async fn record_day(
        &self,
        submission: DaySubmission,
        today: NaiveDate,
    ) -> Result<DayOutcome, CoreError> {
        let date = resolve_date(submission.date.as_deref(), today)?;
        let multiplier = friction_multiplier(submission.friction_index.as_ref());

        let (records, skipped) = build_records(&submission, date, multiplier);
        for entry in &skipped {
            warn!(
                "완료 항목 건너뜀: date={}, index={}, reason={}",
                date, entry.index, entry.reason
            );
        }

        let completed = completed_habit_ids(records.iter().map(|r| (r.habit_id, r.success)));
        let bonus = self.combination_bonus(&completed).await;
        let totals = aggregate_day_totals(submission.totals.as_ref(), &bonus, multiplier);

        let success_rows = records.iter().filter(|r| r.success).count() as i64;
        let summary = DaySummary {
            date,
            meta: submission.meta.clone(),
            totals,
            completed_count: submission.completed_count.unwrap_or(success_rows),
            total_count: submission.total_count.unwrap_or(records.len() as i64),
        };

        self.store.save_day(&summary, &records).await?;
        info!(
            "일일 기록 저장: date={}, saved={}, skipped={}, multiplier={:.3}",
            date,
            records.len(),
            skipped.len(),
            multiplier
        );

        let streaks_rebuilt = match streak::rebuild_all(self.store.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                warn!("스트릭 재계산 실패 (저장은 유지): date={}, error={}", date, e);
                false
            }
        };

        Ok(DayOutcome {
            date,
            friction_multiplier: multiplier,
            saved: records.len(),
            skipped,
            bonus,
            totals,
            streaks_rebuilt,
        })
    }

    /// 조합 보너스 (조회 실패 시 0)
    async fn combination_bonus(&self, completed: &HashSet<i64>) -> StatVector {
        if completed.len() < 2 {
            return StatVector::ZERO;
        }
        match self.store.list_active_combinations().await {
            Ok(combinations) => resolve_bonus(completed, &combinations),
            Err(e) => {
                warn!("조합 보너스 계산 실패, 보너스 없이 진행: {}", e);
                StatVector::ZERO
            }
        }
    }
}

/// 입력 항목 → 저장할 기록, 건너뛴 항목
///
/// 같은 (habit_id, subtask_id) 항목이 반복되면 첫 항목만 저장한다.
fn build_records(
    submission: &DaySubmission,
    date: NaiveDate,
    multiplier: f64,
) -> (Vec<CompletionRecord>, Vec<SkippedEntry>) {
    let mut records = Vec::with_capacity(submission.habits.len());
    let mut skipped = Vec::new();
    let mut seen = HashSet::new();

    for (index, input) in submission.habits.iter().enumerate() {
        let Some(habit_id) = input.habit_id else {
            skipped.push(SkippedEntry {
                index,
                reason: "habit_id 누락 또는 잘못된 값".to_string(),
            });
            continue;
        };
        if !seen.insert((habit_id, input.subtask_id)) {
            skipped.push(SkippedEntry {
                index,
                reason: format!("중복 항목: habit_id={habit_id}"),
            });
            continue;
        }

        records.push(CompletionRecord {
            habit_id,
            subtask_id: input.subtask_id,
            date,
            quantity: input.quantity,
            success: input.success,
            awarded: award(&input.stats, multiplier),
            meta: submission.meta.clone(),
        });
    }

    (records, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use discipline_core::models::completion::CompletionInput;
    use serde_json::json;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn date_defaults_to_today() {
        let today = d("2024-03-10");
        assert_eq!(resolve_date(None, today).unwrap(), today);
        assert_eq!(resolve_date(Some("  "), today).unwrap(), today);
        assert_eq!(resolve_date(Some("2024-01-05"), today).unwrap(), d("2024-01-05"));
    }

    #[test]
    fn bad_date_is_validation_error() {
        let err = resolve_date(Some("05.01.2024"), d("2024-03-10")).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "date"));
    }

    #[test]
    fn records_are_scaled_and_invalid_entries_skipped() {
        let submission: DaySubmission = serde_json::from_value(json!({
            "habits": [
                {"habit_id": 1, "success": true, "i": 2, "money": 1},
                {"success": true, "i": 100},
                {"habit_id": 2, "success": false, "w": 3},
                {"habit_id": 1, "success": true, "i": 9}
            ],
            "state": "calm"
        }))
        .unwrap();

        let (records, skipped) = build_records(&submission, d("2024-01-05"), 3.0);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].awarded.i, 6.0);
        assert_eq!(records[0].awarded.money, 3.0);
        assert_eq!(records[0].meta.state.as_deref(), Some("calm"));
        assert_eq!(records[1].awarded.w, 9.0);
        assert!(!records[1].success);

        let indices: Vec<usize> = skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn subtasks_of_same_habit_are_distinct_rows() {
        let mut first = CompletionInput::success(1, StatVector::ZERO);
        first.subtask_id = Some(10);
        let mut second = CompletionInput::success(1, StatVector::ZERO);
        second.subtask_id = Some(11);
        let submission = DaySubmission {
            habits: vec![first, second],
            ..Default::default()
        };

        let (records, skipped) = build_records(&submission, d("2024-01-05"), 1.0);
        assert_eq!(records.len(), 2);
        assert!(skipped.is_empty());
    }
}
