//! 조합 보너스 계산.
//!
//! 같은 날 두 습관을 모두 성공하면 조합 보너스를 부여한다.
//! 판정은 완료 행 수가 아니라 서로 다른 습관 ID 기준이다.

use discipline_core::models::combination::{Combination, HabitPair};
use discipline_core::models::stat::StatVector;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// 성공 습관 집합과 활성 조합으로 하루치 보너스 합계 계산
///
/// - 비활성 조합은 무시
/// - 같은 쌍(순서 무관)은 하루에 한 번만 적용
/// - 한 습관이 여러 조합에 속하면 각각 더한다
pub fn resolve_bonus(completed: &HashSet<i64>, combinations: &[Combination]) -> StatVector {
    let mut applied: BTreeSet<HabitPair> = BTreeSet::new();
    let mut bonus = StatVector::ZERO;

    for combo in combinations.iter().filter(|c| c.is_active) {
        let Ok(pair) = HabitPair::new(combo.habit_a, combo.habit_b) else {
            continue;
        };
        if !completed.contains(&pair.first()) || !completed.contains(&pair.second()) {
            continue;
        }
        if !applied.insert(pair) {
            continue;
        }

        debug!(
            "조합 보너스 적용: id={}, habits=({}, {})",
            combo.id,
            pair.first(),
            pair.second()
        );
        bonus += combo.bonus;
    }

    bonus
}

/// 완료 항목에서 성공 습관 ID 집합 추출 (중복 제거)
pub fn completed_habit_ids(entries: impl IntoIterator<Item = (i64, bool)>) -> HashSet<i64> {
    entries
        .into_iter()
        .filter(|(_, success)| *success)
        .map(|(habit_id, _)| habit_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(id: i64, a: i64, b: i64, bonus: StatVector) -> Combination {
        Combination {
            id,
            name: None,
            habit_a: a,
            habit_b: b,
            bonus,
            is_active: true,
            created_at: "2024-01-01 00:00:00".to_string(),
            name_a: None,
            name_b: None,
        }
    }

    fn i(v: f64) -> StatVector {
        StatVector {
            i: v,
            ..Default::default()
        }
    }

    fn set(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn both_members_required() {
        let combos = vec![combo(1, 1, 2, i(5.0))];
        assert_eq!(resolve_bonus(&set(&[1, 2]), &combos), i(5.0));
        assert_eq!(resolve_bonus(&set(&[1]), &combos), StatVector::ZERO);
        assert_eq!(resolve_bonus(&set(&[2, 3]), &combos), StatVector::ZERO);
        assert_eq!(resolve_bonus(&set(&[]), &combos), StatVector::ZERO);
    }

    #[test]
    fn reversed_storage_order_matches() {
        // (B, A)로 저장된 조합도 (A, B) 완료에 매칭
        let combos = vec![combo(1, 9, 4, i(5.0))];
        assert_eq!(resolve_bonus(&set(&[4, 9]), &combos), i(5.0));
    }

    #[test]
    fn same_pair_applies_once() {
        let combos = vec![combo(1, 1, 2, i(5.0)), combo(2, 2, 1, i(5.0))];
        assert_eq!(resolve_bonus(&set(&[1, 2]), &combos), i(5.0));
    }

    #[test]
    fn independent_pairs_are_additive() {
        let combos = vec![
            combo(1, 1, 2, i(5.0)),
            combo(
                2,
                1,
                3,
                StatVector {
                    i: 1.0,
                    w: 2.0,
                    ..Default::default()
                },
            ),
        ];
        let bonus = resolve_bonus(&set(&[1, 2, 3]), &combos);
        assert_eq!(bonus.i, 6.0);
        assert_eq!(bonus.w, 2.0);
    }

    #[test]
    fn inactive_and_degenerate_combinations_ignored() {
        let mut inactive = combo(1, 1, 2, i(5.0));
        inactive.is_active = false;
        let degenerate = combo(2, 3, 3, i(7.0));
        let bonus = resolve_bonus(&set(&[1, 2, 3]), &[inactive, degenerate]);
        assert_eq!(bonus, StatVector::ZERO);
    }

    #[test]
    fn completed_ids_only_successes_deduplicated() {
        let ids = completed_habit_ids(vec![(1, true), (1, true), (2, false), (3, true)]);
        assert_eq!(ids, set(&[1, 3]));
    }
}
