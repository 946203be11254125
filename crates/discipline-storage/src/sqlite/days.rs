//! 일일 요약 조회 (DaySummaryStorage 포트 구현).
//!
//! 저장은 `completions::save_day` 트랜잭션에서 함께 처리한다.

use async_trait::async_trait;
use chrono::NaiveDate;
use discipline_core::error::CoreError;
use discipline_core::models::completion::DayMeta;
use discipline_core::models::day::{DayCounts, DaySummary};
use discipline_core::ports::storage::DaySummaryStorage;
use rusqlite::{OptionalExtension, Row};

use super::{date_from_sql, date_to_sql, stats_from_row, storage_err, SqliteStorage};

const SUMMARY_COLUMNS: &str = "date, day_number, state, emotion_morning, thoughts,
     total_i, total_s, total_w, total_e, total_c, total_h, total_st, total_money,
     completed_count, total_count";

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<DaySummary> {
    let raw_date: String = row.get(0)?;
    Ok(DaySummary {
        date: date_from_sql(0, &raw_date)?,
        meta: DayMeta {
            day_number: row.get(1)?,
            state: row.get(2)?,
            emotion_morning: row.get(3)?,
            thoughts: row.get(4)?,
        },
        totals: stats_from_row(row, 5)?,
        completed_count: row.get::<_, Option<i64>>(13)?.unwrap_or(0),
        total_count: row.get::<_, Option<i64>>(14)?.unwrap_or(0),
    })
}

#[async_trait]
impl DaySummaryStorage for SqliteStorage {
    async fn get_day_summary(&self, date: NaiveDate) -> Result<Option<DaySummary>, CoreError> {
        let conn = self.lock()?;

        conn.query_row(
            &format!("SELECT {SUMMARY_COLUMNS} FROM discipline_days WHERE date = ?1"),
            rusqlite::params![date_to_sql(date)],
            summary_from_row,
        )
        .optional()
        .map_err(storage_err("일일 요약 조회 실패"))
    }

    async fn day_summaries_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DaySummary>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SUMMARY_COLUMNS} FROM discipline_days
                 WHERE date >= ?1 AND date <= ?2
                 ORDER BY date"
            ))
            .map_err(storage_err("쿼리 준비 실패"))?;

        let summaries = stmt
            .query_map(
                rusqlite::params![date_to_sql(from), date_to_sql(to)],
                summary_from_row,
            )
            .map_err(storage_err("쿼리 실행 실패"))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(summaries)
    }

    async fn earliest_day(&self) -> Result<Option<NaiveDate>, CoreError> {
        let conn = self.lock()?;

        let raw: Option<String> = conn
            .query_row("SELECT MIN(date) FROM discipline_days", [], |row| row.get(0))
            .map_err(storage_err("최초 날짜 조회 실패"))?;

        Ok(raw.and_then(|s| date_from_sql(0, &s).ok()))
    }

    async fn previous_day_summary(
        &self,
        before: NaiveDate,
    ) -> Result<Option<DaySummary>, CoreError> {
        let conn = self.lock()?;

        conn.query_row(
            &format!(
                "SELECT {SUMMARY_COLUMNS} FROM discipline_days
                 WHERE date < ?1 ORDER BY date DESC LIMIT 1"
            ),
            rusqlite::params![date_to_sql(before)],
            summary_from_row,
        )
        .optional()
        .map_err(storage_err("이전 요약 조회 실패"))
    }

    async fn day_counts(&self) -> Result<DayCounts, CoreError> {
        let conn = self.lock()?;

        conn.query_row(
            "SELECT COUNT(DISTINCT date), COALESCE(MAX(day_number), 0) FROM discipline_days",
            [],
            |row| {
                Ok(DayCounts {
                    total_days: row.get(0)?,
                    max_day: row.get(1)?,
                })
            },
        )
        .map_err(storage_err("누적 일수 조회 실패"))
    }
}
