//! 습관 카탈로그 (HabitStorage 포트 구현).
//!
//! 습관 생성/수정/소프트 삭제, composite 습관의 하위 작업 관리.

use async_trait::async_trait;
use discipline_core::error::CoreError;
use discipline_core::models::habit::{
    Habit, HabitFilter, HabitPatch, HabitSubtask, NewHabit, DEFAULT_CATEGORY,
};
use discipline_core::ports::storage::HabitStorage;
use rusqlite::{Connection, Row};
use tracing::{debug, info};

use super::{is_unique_violation, stats_from_row, storage_err, SqliteStorage, STAT_COLUMNS};

/// 습관 조회 컬럼 (habit_from_row 순서)
fn habit_columns() -> String {
    format!(
        "id, name, category, description, default_quantity, unit, {STAT_COLUMNS}, \
         is_composite, is_active, created_at, updated_at"
    )
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        default_quantity: row.get(4)?,
        unit: row.get(5)?,
        stats: stats_from_row(row, 6)?,
        is_composite: row.get(14)?,
        is_active: row.get(15)?,
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
        subtasks: Vec::new(),
    })
}

/// 하위 작업 조회 (표시 순서)
fn load_subtasks(conn: &Connection, habit_id: i64) -> Result<Vec<HabitSubtask>, CoreError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT id, habit_id, name, default_quantity, unit, {STAT_COLUMNS}, order_index
             FROM habit_subtasks WHERE habit_id = ?1 ORDER BY order_index, id"
        ))
        .map_err(storage_err("쿼리 준비 실패"))?;

    let subtasks = stmt
        .query_map(rusqlite::params![habit_id], |row| {
            Ok(HabitSubtask {
                id: row.get(0)?,
                habit_id: row.get(1)?,
                name: row.get(2)?,
                default_quantity: row.get(3)?,
                unit: row.get(4)?,
                stats: stats_from_row(row, 5)?,
                order_index: row.get(13)?,
            })
        })
        .map_err(storage_err("쿼리 실행 실패"))?
        .filter_map(|r| r.ok())
        .collect();

    Ok(subtasks)
}

/// composite 습관에 하위 작업 채움
fn attach_subtasks(conn: &Connection, habits: &mut [Habit]) -> Result<(), CoreError> {
    for habit in habits.iter_mut().filter(|h| h.is_composite) {
        habit.subtasks = load_subtasks(conn, habit.id)?;
    }
    Ok(())
}

/// 빈 문자열 필터는 없는 것으로 취급
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[async_trait]
impl HabitStorage for SqliteStorage {
    async fn list_habits(&self, filter: &HabitFilter) -> Result<Vec<Habit>, CoreError> {
        let category = non_empty(&filter.category);
        let search = non_empty(&filter.search).map(|s| format!("%{s}%"));

        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM habits
                 WHERE is_active = 1
                   AND (?1 IS NULL OR category = ?1)
                   AND (?2 IS NULL OR name LIKE ?2 OR description LIKE ?2)
                 ORDER BY category, name",
                habit_columns()
            ))
            .map_err(storage_err("쿼리 준비 실패"))?;

        let mut habits: Vec<Habit> = stmt
            .query_map(rusqlite::params![category, search], habit_from_row)
            .map_err(storage_err("쿼리 실행 실패"))?
            .filter_map(|r| r.ok())
            .collect();

        attach_subtasks(&conn, &mut habits)?;
        Ok(habits)
    }

    async fn get_habit(&self, habit_id: i64) -> Result<Option<Habit>, CoreError> {
        let conn = self.lock()?;

        let result = conn.query_row(
            &format!("SELECT {} FROM habits WHERE id = ?1", habit_columns()),
            rusqlite::params![habit_id],
            habit_from_row,
        );

        match result {
            Ok(mut habit) => {
                if habit.is_composite {
                    habit.subtasks = load_subtasks(&conn, habit.id)?;
                }
                Ok(Some(habit))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CoreError::Storage(format!("습관 조회 실패: {e}"))),
        }
    }

    async fn list_categories(&self) -> Result<Vec<String>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare("SELECT DISTINCT category FROM habits WHERE is_active = 1 ORDER BY category")
            .map_err(storage_err("쿼리 준비 실패"))?;

        let categories = stmt
            .query_map([], |row| row.get(0))
            .map_err(storage_err("쿼리 실행 실패"))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(categories)
    }

    async fn create_habit(&self, habit: &NewHabit) -> Result<i64, CoreError> {
        let name = habit.name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("name", "습관 이름이 비어 있습니다"));
        }
        let category = match habit.category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };
        let s = &habit.stats;

        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(storage_err("트랜잭션 시작 실패"))?;

        tx.execute(
            &format!(
                "INSERT INTO habits (name, category, description, default_quantity, unit, {STAT_COLUMNS}, is_composite)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            ),
            rusqlite::params![
                name,
                category,
                habit.description,
                habit.default_quantity,
                habit.unit,
                s.i,
                s.s,
                s.w,
                s.e,
                s.c,
                s.h,
                s.st,
                s.money,
                habit.is_composite,
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                CoreError::Conflict(format!("이미 존재하는 습관입니다: {name} ({category})"))
            } else {
                CoreError::Storage(format!("습관 생성 실패: {e}"))
            }
        })?;

        let habit_id = tx.last_insert_rowid();

        if habit.is_composite {
            let mut stmt = tx
                .prepare_cached(&format!(
                    "INSERT INTO habit_subtasks (habit_id, name, default_quantity, unit, {STAT_COLUMNS}, order_index)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                ))
                .map_err(storage_err("쿼리 준비 실패"))?;

            for (order_index, subtask) in habit.subtasks.iter().enumerate() {
                let st = &subtask.stats;
                stmt.execute(rusqlite::params![
                    habit_id,
                    subtask.name.trim(),
                    subtask.default_quantity,
                    subtask.unit,
                    st.i,
                    st.s,
                    st.w,
                    st.e,
                    st.c,
                    st.h,
                    st.st,
                    st.money,
                    order_index as i64,
                ])
                .map_err(storage_err("하위 작업 생성 실패"))?;
            }
        }

        tx.commit().map_err(storage_err("트랜잭션 커밋 실패"))?;

        info!("습관 생성: id={}, name={}, category={}", habit_id, name, category);
        Ok(habit_id)
    }

    async fn update_habit(&self, habit_id: i64, patch: &HabitPatch) -> Result<bool, CoreError> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(CoreError::validation("name", "습관 이름이 비어 있습니다"));
        }

        let conn = self.lock()?;

        let updated = conn
            .execute(
                "UPDATE habits SET
                    name = COALESCE(?1, name),
                    category = COALESCE(?2, category),
                    description = COALESCE(?3, description),
                    default_quantity = COALESCE(?4, default_quantity),
                    unit = COALESCE(?5, unit),
                    i = COALESCE(?6, i),
                    s = COALESCE(?7, s),
                    w = COALESCE(?8, w),
                    e = COALESCE(?9, e),
                    c = COALESCE(?10, c),
                    h = COALESCE(?11, h),
                    st = COALESCE(?12, st),
                    money = COALESCE(?13, money),
                    updated_at = datetime('now')
                 WHERE id = ?14",
                rusqlite::params![
                    patch.name.as_deref().map(str::trim),
                    patch.category.as_deref().map(str::trim),
                    patch.description,
                    patch.default_quantity,
                    patch.unit,
                    patch.i,
                    patch.s,
                    patch.w,
                    patch.e,
                    patch.c,
                    patch.h,
                    patch.st,
                    patch.money,
                    habit_id,
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CoreError::Conflict(format!(
                        "같은 이름/카테고리의 습관이 이미 있습니다: id={habit_id}"
                    ))
                } else {
                    CoreError::Storage(format!("습관 수정 실패: {e}"))
                }
            })?;

        debug!("습관 수정: id={}, affected={}", habit_id, updated);
        Ok(updated > 0)
    }

    async fn deactivate_habit(&self, habit_id: i64) -> Result<bool, CoreError> {
        let conn = self.lock()?;

        let updated = conn
            .execute(
                "UPDATE habits SET is_active = 0, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![habit_id],
            )
            .map_err(storage_err("습관 비활성화 실패"))?;

        info!("습관 비활성화: id={}, affected={}", habit_id, updated);
        Ok(updated > 0)
    }

    async fn active_habit_ids(&self) -> Result<Vec<i64>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare("SELECT id FROM habits WHERE is_active = 1 ORDER BY id")
            .map_err(storage_err("쿼리 준비 실패"))?;

        let ids = stmt
            .query_map([], |row| row.get(0))
            .map_err(storage_err("쿼리 실행 실패"))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(ids)
    }

    async fn count_habits(&self) -> Result<u64, CoreError> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))
            .map_err(storage_err("습관 수 조회 실패"))?;

        Ok(count.max(0) as u64)
    }
}
