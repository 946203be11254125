//! 습관 완료 기록 모델.
//!
//! 하루치 완료 기록은 저장할 때마다 통째로 교체된다.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::stat::StatVector;

/// 일일 메타데이터 (완료 기록과 일일 요약에 함께 저장)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayMeta {
    /// 순번 (N일차)
    #[serde(default)]
    pub day_number: Option<i64>,
    /// 하루 상태
    #[serde(default)]
    pub state: Option<String>,
    /// 아침 감정
    #[serde(default)]
    pub emotion_morning: Option<String>,
    /// 자유 메모
    #[serde(default)]
    pub thoughts: Option<String>,
}

/// 클라이언트가 보낸 습관 완료 항목
///
/// `habit_id`가 없거나 해석할 수 없으면 `None`이 되고, 저장 시 건너뛴다.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionInput {
    #[serde(default, deserialize_with = "lenient_id")]
    pub habit_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub subtask_id: Option<i64>,
    /// 숫자가 아니면 `None`
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub success: bool,
    /// 배율 적용 전 원시 스탯
    #[serde(flatten)]
    pub stats: StatVector,
}

impl CompletionInput {
    /// 성공한 항목 생성 (테스트, 시드 데이터용)
    pub fn success(habit_id: i64, stats: StatVector) -> Self {
        Self {
            habit_id: Some(habit_id),
            subtask_id: None,
            quantity: Some(1.0),
            success: true,
            stats,
        }
    }

    /// 실패한 항목 생성
    pub fn failure(habit_id: i64) -> Self {
        Self {
            habit_id: Some(habit_id),
            subtask_id: None,
            quantity: None,
            success: false,
            stats: StatVector::ZERO,
        }
    }
}

/// 저장할 완료 기록 (배율 적용 후)
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRecord {
    pub habit_id: i64,
    pub subtask_id: Option<i64>,
    pub date: NaiveDate,
    pub quantity: Option<f64>,
    pub success: bool,
    /// 실제 부여된 스탯
    pub awarded: StatVector,
    pub meta: DayMeta,
}

/// 조회용 완료 기록 (습관 이름/카테고리 조인)
#[derive(Debug, Clone, Serialize)]
pub struct CompletionView {
    pub id: i64,
    pub habit_id: i64,
    pub subtask_id: Option<i64>,
    pub date: NaiveDate,
    pub quantity: Option<f64>,
    pub success: bool,
    #[serde(flatten)]
    pub stats: StatVector,
    #[serde(flatten)]
    pub meta: DayMeta,
    pub habit_name: String,
    pub category: String,
    pub is_composite: bool,
}

/// 하루치 완료 저장 요청
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaySubmission {
    /// 날짜 (YYYY-MM-DD, 기본: 오늘)
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub habits: Vec<CompletionInput>,
    /// 마찰 지수 (1~10, 숫자가 아니면 1)
    #[serde(default)]
    pub friction_index: Option<Value>,
    #[serde(flatten)]
    pub meta: DayMeta,
    /// 클라이언트 집계 원시 합계
    #[serde(default)]
    pub totals: Option<StatVector>,
    #[serde(default)]
    pub completed_count: Option<i64>,
    #[serde(default)]
    pub total_count: Option<i64>,
}

/// 저장하지 못하고 건너뛴 항목
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntry {
    /// 요청 내 위치
    pub index: usize,
    /// 사유
    pub reason: String,
}

/// 양의 정수 ID만 인정 (숫자 문자열 허용, 0/음수/기타 → None)
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(id.filter(|id| *id > 0))
}

/// 수량 해석 (숫자, 숫자 문자열만 인정, 나머지는 None)
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let quantity = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(quantity.filter(|q| q.is_finite()))
}

/// 참/거짓 해석 (bool, 0이 아닌 숫자, "true"/"1")
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim(), "true" | "1"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_submission() {
        let sub: DaySubmission = serde_json::from_str(
            r#"{
                "date": "2024-01-05",
                "habits": [
                    {"habit_id": 3, "quantity": 1, "success": true, "i": 2},
                    {"habit_id": "7", "success": 1, "money": "10"},
                    {"quantity": 2, "success": true},
                    {"habit_id": null, "success": true},
                    {"habit_id": 0, "success": true}
                ],
                "friction_index": 10,
                "day_number": 12,
                "state": "ok",
                "totals": {"I": 10}
            }"#,
        )
        .unwrap();

        assert_eq!(sub.date.as_deref(), Some("2024-01-05"));
        assert_eq!(sub.habits.len(), 5);
        assert_eq!(sub.habits[0].habit_id, Some(3));
        assert_eq!(sub.habits[0].stats.i, 2.0);
        assert_eq!(sub.habits[1].habit_id, Some(7));
        assert!(sub.habits[1].success);
        assert_eq!(sub.habits[1].stats.money, 10.0);
        assert_eq!(sub.habits[2].habit_id, None);
        assert_eq!(sub.habits[3].habit_id, None);
        assert_eq!(sub.habits[4].habit_id, None);
        assert_eq!(sub.meta.day_number, Some(12));
        assert_eq!(sub.meta.state.as_deref(), Some("ok"));
        assert_eq!(sub.totals.unwrap().i, 10.0);
    }

    #[test]
    fn bad_quantity_does_not_reject_batch() {
        let sub: DaySubmission = serde_json::from_str(
            r#"{
                "habits": [
                    {"habit_id": 1, "quantity": 2, "success": true},
                    {"habit_id": 2, "quantity": "two", "success": true},
                    {"habit_id": 3, "quantity": "1.5", "success": true},
                    {"habit_id": 4, "quantity": [1], "success": true}
                ]
            }"#,
        )
        .unwrap();

        let quantities: Vec<Option<f64>> = sub.habits.iter().map(|c| c.quantity).collect();
        assert_eq!(quantities, vec![Some(2.0), None, Some(1.5), None]);
        assert_eq!(sub.habits[1].habit_id, Some(2));
    }

    #[test]
    fn empty_submission() {
        let sub: DaySubmission = serde_json::from_str("{}").unwrap();
        assert!(sub.date.is_none());
        assert!(sub.habits.is_empty());
        assert!(sub.friction_index.is_none());
        assert!(sub.totals.is_none());
    }

    #[test]
    fn success_flag_variants() {
        let items: Vec<CompletionInput> = serde_json::from_str(
            r#"[
                {"habit_id": 1, "success": false},
                {"habit_id": 1, "success": 0},
                {"habit_id": 1, "success": "true"},
                {"habit_id": 1}
            ]"#,
        )
        .unwrap();
        let flags: Vec<bool> = items.iter().map(|c| c.success).collect();
        assert_eq!(flags, vec![false, false, true, false]);
    }
}
