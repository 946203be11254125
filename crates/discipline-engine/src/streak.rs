//! 스트릭 재계산.
//!
//! 스트릭은 습관별 성공 날짜 집합의 순수 함수다. 저장 시마다 활성 습관 전체를
//! 처음부터 다시 계산해 덮어쓰므로, 쓰기 순서나 부분 실패와 무관하게
//! 완료 기록과 일치한다. 독립 실행(일관성 복구)도 같은 경로를 쓴다.

use chrono::NaiveDate;
use discipline_core::error::CoreError;
use discipline_core::models::streak::StreakState;
use discipline_core::ports::storage::DisciplineStore;
use tracing::{debug, info};

/// 성공 날짜 목록에서 스트릭 계산
///
/// 입력 순서와 중복은 상관없다. 정렬 후 인접 날짜 차이가 정확히 1일이면
/// 연속으로 본다.
pub fn recalculate(habit_id: i64, dates: &[NaiveDate]) -> StreakState {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let Some(&last_date) = sorted.last() else {
        return StreakState::empty(habit_id);
    };

    let consecutive = |pair: &[NaiveDate]| (pair[1] - pair[0]).num_days() == 1;

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in sorted.windows(2) {
        if consecutive(pair) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }

    // 마지막 날짜가 속한 구간 길이 (뒤에서부터 끊길 때까지)
    let current = 1 + sorted
        .windows(2)
        .rev()
        .take_while(|pair| consecutive(*pair))
        .count() as u32;

    StreakState {
        habit_id,
        current_streak: current,
        longest_streak: longest,
        last_date: Some(last_date),
    }
}

/// 활성 습관 전체 스트릭 재계산 후 저장
///
/// 비활성 습관은 건너뛴다. 결과는 한 번에 교체된다.
pub async fn rebuild_all(store: &dyn DisciplineStore) -> Result<Vec<StreakState>, CoreError> {
    let habit_ids = store.active_habit_ids().await?;

    let mut states = Vec::with_capacity(habit_ids.len());
    for habit_id in habit_ids {
        let dates = store.successful_dates(habit_id).await?;
        let state = recalculate(habit_id, &dates);
        debug!(
            "스트릭 계산: habit_id={}, current={}, longest={}",
            habit_id, state.current_streak, state.longest_streak
        );
        states.push(state);
    }

    store.replace_streaks(&states).await?;
    info!("스트릭 재계산 완료: {}개 습관", states.len());
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn triple(state: &StreakState) -> (u32, u32, Option<NaiveDate>) {
        (state.current_streak, state.longest_streak, state.last_date)
    }

    #[test]
    fn empty_history() {
        let state = recalculate(1, &[]);
        assert_eq!(triple(&state), (0, 0, None));
        assert_eq!(state, StreakState::empty(1));
    }

    #[test]
    fn single_date() {
        let state = recalculate(1, &[d("2024-01-05")]);
        assert_eq!(triple(&state), (1, 1, Some(d("2024-01-05"))));
    }

    #[test]
    fn two_consecutive_dates() {
        let state = recalculate(1, &[d("2024-01-05"), d("2024-01-06")]);
        assert_eq!(triple(&state), (2, 2, Some(d("2024-01-06"))));
    }

    #[test]
    fn gap_resets_run() {
        let state = recalculate(1, &[d("2024-01-05"), d("2024-01-10")]);
        assert_eq!(triple(&state), (1, 1, Some(d("2024-01-10"))));
    }

    #[test]
    fn longest_run_in_the_past() {
        let state = recalculate(
            1,
            &[
                d("2024-01-01"),
                d("2024-01-02"),
                d("2024-01-03"),
                d("2024-01-10"),
            ],
        );
        assert_eq!(triple(&state), (1, 3, Some(d("2024-01-10"))));
    }

    #[test]
    fn unordered_and_duplicate_input() {
        let state = recalculate(
            7,
            &[
                d("2024-02-03"),
                d("2024-02-01"),
                d("2024-02-02"),
                d("2024-02-02"),
            ],
        );
        assert_eq!(state.habit_id, 7);
        assert_eq!(triple(&state), (3, 3, Some(d("2024-02-03"))));
    }

    #[test]
    fn isolated_dates_count_one_each() {
        let state = recalculate(1, &[d("2024-03-01"), d("2024-03-03"), d("2024-03-05")]);
        assert_eq!(triple(&state), (1, 1, Some(d("2024-03-05"))));
    }

    #[test]
    fn trailing_run_across_month_boundary() {
        let state = recalculate(
            1,
            &[
                d("2024-01-20"),
                d("2024-01-31"),
                d("2024-02-01"),
                d("2024-02-02"),
            ],
        );
        assert_eq!(triple(&state), (3, 3, Some(d("2024-02-02"))));
    }

    #[test]
    fn idempotent() {
        let dates = [d("2024-01-01"), d("2024-01-02"), d("2024-01-04")];
        assert_eq!(recalculate(3, &dates), recalculate(3, &dates));
    }

    /// 직접 열거로 구한 (trailing, maximal) 구간 길이
    fn brute_force(dates: &[NaiveDate]) -> (u32, u32) {
        let set: std::collections::BTreeSet<_> = dates.iter().copied().collect();
        let run_ending_at = |day: NaiveDate| {
            let mut len = 0u32;
            let mut cursor = day;
            while set.contains(&cursor) {
                len += 1;
                cursor = cursor.pred_opt().unwrap();
            }
            len
        };
        let longest = set.iter().map(|d| run_ending_at(*d)).max().unwrap_or(0);
        let current = set.iter().next_back().map(|d| run_ending_at(*d)).unwrap_or(0);
        (current, longest)
    }

    #[test]
    fn matches_enumeration_on_generated_histories() {
        let base = d("2023-12-25");
        // 결정적 의사 난수로 날짜 부분집합 생성
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..200 {
            let mut dates = Vec::new();
            for offset in 0..40 {
                seed ^= seed << 13;
                seed ^= seed >> 7;
                seed ^= seed << 17;
                if seed % 3 != 0 {
                    dates.push(base + chrono::Duration::days(offset));
                }
            }

            let state = recalculate(1, &dates);
            let (current, longest) = brute_force(&dates);
            assert_eq!(state.current_streak, current);
            assert_eq!(state.longest_streak, longest);
            assert!(state.longest_streak >= state.current_streak);
            assert_eq!(state.last_date, dates.iter().max().copied());
        }
    }
}
