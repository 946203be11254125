//! 스트릭 캐시 (StreakStorage 포트 구현).

use async_trait::async_trait;
use discipline_core::error::CoreError;
use discipline_core::models::streak::{StreakEntry, StreakSnapshot, StreakState};
use discipline_core::ports::storage::StreakStorage;
use std::collections::HashMap;
use tracing::debug;

use super::{date_from_sql, date_to_sql, storage_err, SqliteStorage};

#[async_trait]
impl StreakStorage for SqliteStorage {
    async fn replace_streaks(&self, streaks: &[StreakState]) -> Result<(), CoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(storage_err("트랜잭션 시작 실패"))?;

        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO streaks (habit_id, current_streak, longest_streak, last_date)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(habit_id) DO UPDATE SET
                        current_streak = excluded.current_streak,
                        longest_streak = excluded.longest_streak,
                        last_date = excluded.last_date",
                )
                .map_err(storage_err("쿼리 준비 실패"))?;

            for streak in streaks {
                stmt.execute(rusqlite::params![
                    streak.habit_id,
                    streak.current_streak,
                    streak.longest_streak,
                    streak.last_date.map(date_to_sql),
                ])
                .map_err(storage_err("스트릭 저장 실패"))?;
            }
        }

        tx.commit().map_err(storage_err("트랜잭션 커밋 실패"))?;

        debug!("스트릭 교체: {}개", streaks.len());
        Ok(())
    }

    async fn streak_board(&self) -> Result<Vec<StreakEntry>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT h.id, h.name, h.category,
                        COALESCE(s.current_streak, 0) AS current_streak,
                        COALESCE(s.longest_streak, 0) AS longest_streak,
                        s.last_date
                 FROM habits h
                 LEFT JOIN streaks s ON s.habit_id = h.id
                 WHERE h.is_active = 1
                 ORDER BY current_streak DESC, longest_streak DESC, h.category, h.name",
            )
            .map_err(storage_err("쿼리 준비 실패"))?;

        let entries = stmt
            .query_map([], |row| {
                let last_date: Option<String> = row.get(5)?;
                Ok(StreakEntry {
                    habit_id: row.get(0)?,
                    name: row.get(1)?,
                    category: row.get(2)?,
                    current_streak: row.get(3)?,
                    longest_streak: row.get(4)?,
                    last_date: last_date.map(|s| date_from_sql(5, &s)).transpose()?,
                })
            })
            .map_err(storage_err("쿼리 실행 실패"))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(entries)
    }

    async fn streaks_for(
        &self,
        habit_ids: &[i64],
    ) -> Result<HashMap<i64, StreakSnapshot>, CoreError> {
        if habit_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; habit_ids.len()].join(", ");
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT habit_id, current_streak, longest_streak
                 FROM streaks WHERE habit_id IN ({placeholders})"
            ))
            .map_err(storage_err("쿼리 준비 실패"))?;

        let streaks = stmt
            .query_map(rusqlite::params_from_iter(habit_ids.iter()), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    StreakSnapshot {
                        current: row.get(1)?,
                        longest: row.get(2)?,
                    },
                ))
            })
            .map_err(storage_err("쿼리 실행 실패"))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(streaks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use discipline_core::models::habit::NewHabit;
    use discipline_core::models::stat::StatVector;
    use discipline_core::ports::storage::HabitStorage;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state(habit_id: i64, current: u32, longest: u32, last: Option<&str>) -> StreakState {
        StreakState {
            habit_id,
            current_streak: current,
            longest_streak: longest,
            last_date: last.map(d),
        }
    }

    async fn storage_with(habits: &[(&str, &str)]) -> (SqliteStorage, Vec<i64>) {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut ids = Vec::new();
        for (name, category) in habits {
            ids.push(
                storage
                    .create_habit(&NewHabit::named(name, category, StatVector::ZERO))
                    .await
                    .unwrap(),
            );
        }
        (storage, ids)
    }

    #[tokio::test]
    async fn board_is_zero_filled_and_ordered() {
        let (storage, ids) =
            storage_with(&[("Бег", "Спорт"), ("Анки", "Ум"), ("Душ", "Утро")]).await;

        storage
            .replace_streaks(&[
                state(ids[0], 2, 5, Some("2024-01-05")),
                state(ids[1], 2, 7, Some("2024-01-05")),
            ])
            .await
            .unwrap();

        let board = storage.streak_board().await.unwrap();
        let order: Vec<i64> = board.iter().map(|e| e.habit_id).collect();
        assert_eq!(order, vec![ids[1], ids[0], ids[2]]);
        assert_eq!(board[2].current_streak, 0);
        assert_eq!(board[2].longest_streak, 0);
        assert!(board[2].last_date.is_none());
        assert_eq!(board[0].last_date, Some(d("2024-01-05")));
    }

    #[tokio::test]
    async fn replace_overwrites_existing_rows() {
        let (storage, ids) = storage_with(&[("Бег", "Спорт")]).await;

        storage
            .replace_streaks(&[state(ids[0], 3, 3, Some("2024-01-03"))])
            .await
            .unwrap();
        storage
            .replace_streaks(&[state(ids[0], 0, 0, None)])
            .await
            .unwrap();

        let map = storage.streaks_for(&ids).await.unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&ids[0]], StreakSnapshot { current: 0, longest: 0 });
    }

    #[tokio::test]
    async fn streaks_for_subset() {
        let (storage, ids) = storage_with(&[("Бег", "Спорт"), ("Анки", "Ум")]).await;
        storage
            .replace_streaks(&[state(ids[0], 1, 4, Some("2024-01-05"))])
            .await
            .unwrap();

        let map = storage.streaks_for(&[ids[0], ids[1], 999]).await.unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&ids[0]].longest, 4);
        assert!(storage.streaks_for(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inactive_habits_leave_the_board() {
        let (storage, ids) = storage_with(&[("Бег", "Спорт"), ("Анки", "Ум")]).await;
        storage.deactivate_habit(ids[0]).await.unwrap();

        let board = storage.streak_board().await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].habit_id, ids[1]);
    }
}
