//! 완료 기록 (CompletionStorage 포트 구현).
//!
//! 하루치 저장은 완료 기록 삭제, 새 기록 삽입, 일일 요약 upsert를
//! 하나의 트랜잭션으로 묶는다.

use async_trait::async_trait;
use chrono::NaiveDate;
use discipline_core::error::CoreError;
use discipline_core::models::completion::{CompletionRecord, CompletionView, DayMeta};
use discipline_core::models::day::DaySummary;
use discipline_core::ports::storage::CompletionStorage;
use tracing::debug;

use super::{
    date_from_sql, date_to_sql, is_unique_violation, stats_from_row, storage_err,
    SqliteStorage, STAT_COLUMNS,
};

#[async_trait]
impl CompletionStorage for SqliteStorage {
    async fn save_day(
        &self,
        summary: &DaySummary,
        records: &[CompletionRecord],
    ) -> Result<(), CoreError> {
        let date = date_to_sql(summary.date);

        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(storage_err("트랜잭션 시작 실패"))?;

        let deleted = tx
            .execute(
                "DELETE FROM completed_habits WHERE date = ?1",
                rusqlite::params![date],
            )
            .map_err(storage_err("완료 기록 삭제 실패"))?;

        {
            let mut stmt = tx
                .prepare_cached(&format!(
                    "INSERT INTO completed_habits
                        (habit_id, subtask_id, date, quantity, success, {STAT_COLUMNS},
                         day_number, state, emotion_morning, thoughts)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
                ))
                .map_err(storage_err("쿼리 준비 실패"))?;

            for record in records {
                let a = &record.awarded;
                stmt.execute(rusqlite::params![
                    record.habit_id,
                    record.subtask_id,
                    date_to_sql(record.date),
                    record.quantity,
                    record.success,
                    a.i,
                    a.s,
                    a.w,
                    a.e,
                    a.c,
                    a.h,
                    a.st,
                    a.money,
                    record.meta.day_number,
                    record.meta.state,
                    record.meta.emotion_morning,
                    record.meta.thoughts,
                ])
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        CoreError::Conflict(format!(
                            "중복 완료 기록: habit_id={}, date={}",
                            record.habit_id, date
                        ))
                    } else {
                        CoreError::Storage(format!("완료 기록 저장 실패: {e}"))
                    }
                })?;
            }
        }

        let t = &summary.totals;
        tx.execute(
            "INSERT INTO discipline_days
                (date, day_number, state, emotion_morning, thoughts,
                 total_i, total_s, total_w, total_e, total_c, total_h, total_st, total_money,
                 completed_count, total_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
             ON CONFLICT(date) DO UPDATE SET
                day_number = excluded.day_number,
                state = excluded.state,
                emotion_morning = excluded.emotion_morning,
                thoughts = excluded.thoughts,
                total_i = excluded.total_i,
                total_s = excluded.total_s,
                total_w = excluded.total_w,
                total_e = excluded.total_e,
                total_c = excluded.total_c,
                total_h = excluded.total_h,
                total_st = excluded.total_st,
                total_money = excluded.total_money,
                completed_count = excluded.completed_count,
                total_count = excluded.total_count",
            rusqlite::params![
                date,
                summary.meta.day_number,
                summary.meta.state,
                summary.meta.emotion_morning,
                summary.meta.thoughts,
                t.i,
                t.s,
                t.w,
                t.e,
                t.c,
                t.h,
                t.st,
                t.money,
                summary.completed_count,
                summary.total_count,
            ],
        )
        .map_err(storage_err("일일 요약 저장 실패"))?;

        tx.commit().map_err(storage_err("트랜잭션 커밋 실패"))?;

        debug!(
            "하루치 저장: date={}, deleted={}, inserted={}",
            date,
            deleted,
            records.len()
        );
        Ok(())
    }

    async fn get_completions(&self, date: NaiveDate) -> Result<Vec<CompletionView>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT ch.id, ch.habit_id, ch.subtask_id, ch.date, ch.quantity, ch.success,
                        ch.i, ch.s, ch.w, ch.e, ch.c, ch.h, ch.st, ch.money,
                        ch.day_number, ch.state, ch.emotion_morning, ch.thoughts,
                        COALESCE(h.name, ''), COALESCE(h.category, ''), COALESCE(h.is_composite, 0)
                 FROM completed_habits ch
                 LEFT JOIN habits h ON h.id = ch.habit_id
                 WHERE ch.date = ?1
                 ORDER BY h.category, h.name, ch.id",
            )
            .map_err(storage_err("쿼리 준비 실패"))?;

        let completions = stmt
            .query_map(rusqlite::params![date_to_sql(date)], |row| {
                let raw_date: String = row.get(3)?;
                Ok(CompletionView {
                    id: row.get(0)?,
                    habit_id: row.get(1)?,
                    subtask_id: row.get(2)?,
                    date: date_from_sql(3, &raw_date)?,
                    quantity: row.get(4)?,
                    success: row.get(5)?,
                    stats: stats_from_row(row, 6)?,
                    meta: DayMeta {
                        day_number: row.get(14)?,
                        state: row.get(15)?,
                        emotion_morning: row.get(16)?,
                        thoughts: row.get(17)?,
                    },
                    habit_name: row.get(18)?,
                    category: row.get(19)?,
                    is_composite: row.get(20)?,
                })
            })
            .map_err(storage_err("쿼리 실행 실패"))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(completions)
    }

    async fn successful_dates(&self, habit_id: i64) -> Result<Vec<NaiveDate>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare_cached(
                "SELECT DISTINCT date FROM completed_habits
                 WHERE habit_id = ?1 AND success = 1
                 ORDER BY date",
            )
            .map_err(storage_err("쿼리 준비 실패"))?;

        let dates = stmt
            .query_map(rusqlite::params![habit_id], |row| {
                let raw: String = row.get(0)?;
                date_from_sql(0, &raw)
            })
            .map_err(storage_err("쿼리 실행 실패"))?
            // 날짜 하나라도 깨지면 스트릭이 짧아지므로 버리지 않고 실패시킨다
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage_err("완료 날짜 변환 실패"))?;

        Ok(dates)
    }
}
