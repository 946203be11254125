//! SQLite 저장소 어댑터.
//!
//! `discipline-core`의 모든 저장소 포트 구현.
//!
//! # 모듈 구조
//! - `habits`: 습관 카탈로그, 하위 작업 (HabitStorage)
//! - `combinations`: 습관 조합 (CombinationStorage)
//! - `completions`: 완료 기록, 하루치 저장 트랜잭션 (CompletionStorage)
//! - `days`: 일일 요약 조회 (DaySummaryStorage)
//! - `streaks`: 스트릭 캐시 (StreakStorage)

mod combinations;
mod completions;
mod days;
mod habits;
mod streaks;

use chrono::NaiveDate;
use discipline_core::error::CoreError;
use discipline_core::models::stat::StatVector;
use rusqlite::types::Type;
use rusqlite::{ffi, Connection, ErrorCode, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::migration;

/// 저장 형식 (YYYY-MM-DD)
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite 저장소: 모든 저장소 포트 구현
pub struct SqliteStorage {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        Self::prepare(&conn)?;

        info!("SQLite 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;

        Self::prepare(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 외래 키 검사 해제 후 마이그레이션
    ///
    /// bundled SQLite는 외래 키 검사가 기본으로 켜져 있다. 완료 기록은
    /// 카탈로그에 없는 habit_id/subtask_id도 그대로 보존한다.
    fn prepare(conn: &Connection) -> Result<(), CoreError> {
        conn.execute_batch("PRAGMA foreign_keys=OFF;")
            .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))
    }

    /// 연결 잠금
    pub(super) fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))
    }
}

/// 스탯 컬럼 목록 (STAT_LABELS 순서)
pub(super) const STAT_COLUMNS: &str = "i, s, w, e, c, h, st, money";

/// 날짜 → 저장 문자열
pub(super) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 저장 문자열 → 날짜
pub(super) fn date_from_sql(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// `start`부터 연속된 8개 컬럼을 스탯 벡터로 읽음
pub(super) fn stats_from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<StatVector> {
    let mut values = [0.0f64; 8];
    for (offset, value) in values.iter_mut().enumerate() {
        *value = row.get::<_, Option<f64>>(start + offset)?.unwrap_or(0.0);
    }
    Ok(StatVector::from_array(values))
}

/// UNIQUE/PRIMARY KEY 위반 여부 (NOT NULL, CHECK 등 다른 제약은 제외)
pub(super) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
    )
}

/// 쿼리 실패 → 저장소 에러
pub(super) fn storage_err(context: &'static str) -> impl Fn(rusqlite::Error) -> CoreError {
    move |e| CoreError::Storage(format!("{context}: {e}"))
}
