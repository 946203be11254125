//! 마찰 배율과 일일 합계.
//!
//! 마찰 지수(1~10)는 그날의 난이도다. 배율은 `1 + (지수 - 1) * 2/9`로
//! 1.0에서 3.0까지 선형 증가한다.
//!
//! 배율은 두 번 적용된다. 완료 기록에 부여되는 습관별 스탯에 한 번,
//! 일일 합계(원시 합계 + 조합 보너스)에 한 번. 두 값은 서로 독립적으로 저장된다.

use discipline_core::models::stat::StatVector;
use serde_json::Value;

/// 마찰 지수 하한
pub const MIN_FRICTION_INDEX: f64 = 1.0;
/// 마찰 지수 상한
pub const MAX_FRICTION_INDEX: f64 = 10.0;

/// 요청 값 → 마찰 지수 (범위 제한 적용)
///
/// 값이 없거나 숫자로 해석되지 않으면 1. 숫자 문자열은 파싱한다.
pub fn friction_index(raw: Option<&Value>) -> f64 {
    let index = match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(MIN_FRICTION_INDEX),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(MIN_FRICTION_INDEX),
        _ => MIN_FRICTION_INDEX,
    };
    if !index.is_finite() {
        return MIN_FRICTION_INDEX;
    }
    index.clamp(MIN_FRICTION_INDEX, MAX_FRICTION_INDEX)
}

/// 마찰 지수 → 배율
pub fn multiplier_for_index(index: f64) -> f64 {
    let index = index.clamp(MIN_FRICTION_INDEX, MAX_FRICTION_INDEX);
    1.0 + (index - 1.0) * 2.0 / 9.0
}

/// 요청 값에서 바로 배율 계산
pub fn friction_multiplier(raw: Option<&Value>) -> f64 {
    multiplier_for_index(friction_index(raw))
}

/// 습관별 부여 스탯 (원시 값 × 배율)
pub fn award(raw: &StatVector, multiplier: f64) -> StatVector {
    raw.scaled(multiplier)
}

/// 일일 최종 합계 = (원시 합계 + 조합 보너스) × 배율
///
/// 원시 합계가 없으면 0으로 본다.
pub fn aggregate_day_totals(
    raw_totals: Option<&StatVector>,
    bonus: &StatVector,
    multiplier: f64,
) -> StatVector {
    let raw = raw_totals.copied().unwrap_or(StatVector::ZERO);
    (raw + *bonus) * multiplier
}
