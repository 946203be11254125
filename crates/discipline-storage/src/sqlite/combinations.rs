//! 습관 조합 (CombinationStorage 포트 구현).

use async_trait::async_trait;
use discipline_core::error::CoreError;
use discipline_core::models::combination::{Combination, NewCombination};
use discipline_core::ports::storage::CombinationStorage;
use tracing::info;

use super::{is_unique_violation, stats_from_row, storage_err, SqliteStorage, STAT_COLUMNS};

#[async_trait]
impl CombinationStorage for SqliteStorage {
    async fn list_active_combinations(&self) -> Result<Vec<Combination>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT c.id, c.name, c.habit_a, c.habit_b,
                        c.i, c.s, c.w, c.e, c.c, c.h, c.st, c.money,
                        c.is_active, c.created_at, ha.name, hb.name
                 FROM combinations c
                 LEFT JOIN habits ha ON ha.id = c.habit_a
                 LEFT JOIN habits hb ON hb.id = c.habit_b
                 WHERE c.is_active = 1
                 ORDER BY c.id DESC",
            )
            .map_err(storage_err("쿼리 준비 실패"))?;

        let combinations = stmt
            .query_map([], |row| {
                Ok(Combination {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    habit_a: row.get(2)?,
                    habit_b: row.get(3)?,
                    bonus: stats_from_row(row, 4)?,
                    is_active: row.get(12)?,
                    created_at: row.get(13)?,
                    name_a: row.get(14)?,
                    name_b: row.get(15)?,
                })
            })
            .map_err(storage_err("쿼리 실행 실패"))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(combinations)
    }

    async fn create_combination(&self, combination: &NewCombination) -> Result<i64, CoreError> {
        let pair = combination.pair()?;
        let b = &combination.bonus;

        let conn = self.lock()?;

        // 두 습관 모두 존재해야 한다
        for habit_id in [pair.first(), pair.second()] {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM habits WHERE id = ?1)",
                    rusqlite::params![habit_id],
                    |row| row.get(0),
                )
                .map_err(storage_err("습관 조회 실패"))?;
            if !exists {
                return Err(CoreError::not_found("Habit", habit_id));
            }
        }

        conn.execute(
            &format!(
                "INSERT INTO combinations (name, habit_a, habit_b, {STAT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            rusqlite::params![
                combination.name,
                pair.first(),
                pair.second(),
                b.i,
                b.s,
                b.w,
                b.e,
                b.c,
                b.h,
                b.st,
                b.money,
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                CoreError::Conflict(format!(
                    "이미 존재하는 조합입니다: ({}, {})",
                    pair.first(),
                    pair.second()
                ))
            } else {
                CoreError::Storage(format!("조합 생성 실패: {e}"))
            }
        })?;

        let id = conn.last_insert_rowid();
        info!(
            "조합 생성: id={}, habits=({}, {})",
            id,
            pair.first(),
            pair.second()
        );
        Ok(id)
    }
}
