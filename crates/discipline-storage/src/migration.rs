//! 스키마 마이그레이션.
//!
//! 버전 기반 SQLite 스키마 관리.

use rusqlite::Connection;
use tracing::{debug, info};

/// 현재 스키마 버전
const CURRENT_VERSION: u32 = 2;

/// 스키마 마이그레이션 실행
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    // schema_version 테이블 생성
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current = get_version(conn)?;
    info!("현재 스키마 버전: {current}, 목표: {CURRENT_VERSION}");

    if current < 1 {
        migrate_v1(conn)?;
    }

    if current < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// 현재 스키마 버전 조회
fn get_version(conn: &Connection) -> Result<u32, rusqlite::Error> {
    let result: Result<u32, _> = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    );
    result.or(Ok(0))
}

/// V1: 습관, 하위 작업, 완료 기록, 일일 요약, 스트릭, 조합 테이블
fn migrate_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    debug!("마이그레이션 V1 실행: 기본 테이블");

    conn.execute_batch(
        "
        -- 습관 카탈로그 (name, category 쌍이 식별자)
        CREATE TABLE IF NOT EXISTS habits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT 'Без категории',
            description TEXT,
            default_quantity REAL,
            unit TEXT,
            i REAL NOT NULL DEFAULT 0,
            s REAL NOT NULL DEFAULT 0,
            w REAL NOT NULL DEFAULT 0,
            e REAL NOT NULL DEFAULT 0,
            c REAL NOT NULL DEFAULT 0,
            h REAL NOT NULL DEFAULT 0,
            st REAL NOT NULL DEFAULT 0,
            money REAL NOT NULL DEFAULT 0,
            is_composite INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(name, category)
        );

        -- composite 습관의 하위 작업
        CREATE TABLE IF NOT EXISTS habit_subtasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            default_quantity REAL,
            unit TEXT,
            i REAL NOT NULL DEFAULT 0,
            s REAL NOT NULL DEFAULT 0,
            w REAL NOT NULL DEFAULT 0,
            e REAL NOT NULL DEFAULT 0,
            c REAL NOT NULL DEFAULT 0,
            h REAL NOT NULL DEFAULT 0,
            st REAL NOT NULL DEFAULT 0,
            money REAL NOT NULL DEFAULT 0,
            order_index INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        );

        -- 완료 기록 (날짜 단위로 통째 교체)
        CREATE TABLE IF NOT EXISTS completed_habits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id INTEGER NOT NULL,
            subtask_id INTEGER,
            date TEXT NOT NULL,
            quantity REAL,
            success INTEGER NOT NULL DEFAULT 0,
            i REAL NOT NULL DEFAULT 0,
            s REAL NOT NULL DEFAULT 0,
            w REAL NOT NULL DEFAULT 0,
            e REAL NOT NULL DEFAULT 0,
            c REAL NOT NULL DEFAULT 0,
            h REAL NOT NULL DEFAULT 0,
            st REAL NOT NULL DEFAULT 0,
            money REAL NOT NULL DEFAULT 0,
            day_number INTEGER,
            state TEXT,
            emotion_morning TEXT,
            thoughts TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (habit_id) REFERENCES habits (id),
            FOREIGN KEY (subtask_id) REFERENCES habit_subtasks (id),
            UNIQUE(habit_id, subtask_id, date)
        );

        -- 일일 요약 (날짜당 1행)
        CREATE TABLE IF NOT EXISTS discipline_days (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,
            day_number INTEGER,
            state TEXT,
            emotion_morning TEXT,
            thoughts TEXT,
            total_i REAL NOT NULL DEFAULT 0,
            total_s REAL NOT NULL DEFAULT 0,
            total_w REAL NOT NULL DEFAULT 0,
            total_e REAL NOT NULL DEFAULT 0,
            total_c REAL NOT NULL DEFAULT 0,
            total_h REAL NOT NULL DEFAULT 0,
            total_st REAL NOT NULL DEFAULT 0,
            total_money REAL NOT NULL DEFAULT 0,
            completed_count INTEGER NOT NULL DEFAULT 0,
            total_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- 스트릭 캐시 (완료 기록에서 재계산)
        CREATE TABLE IF NOT EXISTS streaks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id INTEGER NOT NULL,
            current_streak INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,
            last_date TEXT,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        );

        -- 습관 조합 (habit_a < habit_b로 정규화)
        CREATE TABLE IF NOT EXISTS combinations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            habit_a INTEGER NOT NULL,
            habit_b INTEGER NOT NULL,
            i REAL NOT NULL DEFAULT 0,
            s REAL NOT NULL DEFAULT 0,
            w REAL NOT NULL DEFAULT 0,
            e REAL NOT NULL DEFAULT 0,
            c REAL NOT NULL DEFAULT 0,
            h REAL NOT NULL DEFAULT 0,
            st REAL NOT NULL DEFAULT 0,
            money REAL NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(habit_a, habit_b),
            FOREIGN KEY (habit_a) REFERENCES habits (id) ON DELETE CASCADE,
            FOREIGN KEY (habit_b) REFERENCES habits (id) ON DELETE CASCADE
        );

        -- 버전 기록
        INSERT INTO schema_version (version) VALUES (1);
        ",
    )?;

    info!("마이그레이션 V1 완료");
    Ok(())
}

/// V2: 조회 인덱스 + 습관당 스트릭 1행 보장
fn migrate_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    debug!("마이그레이션 V2 실행: 인덱스");

    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_combinations_habits ON combinations(habit_a, habit_b);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_streaks_habit ON streaks(habit_id);
        CREATE INDEX IF NOT EXISTS idx_completed_date ON completed_habits(date);
        CREATE INDEX IF NOT EXISTS idx_completed_habit ON completed_habits(habit_id);
        CREATE INDEX IF NOT EXISTS idx_habits_category ON habits(category);
        CREATE INDEX IF NOT EXISTS idx_subtasks_habit ON habit_subtasks(habit_id, order_index);

        -- 버전 기록
        INSERT INTO schema_version (version) VALUES (2);
        ",
    )?;

    info!("마이그레이션 V2 완료");
    Ok(())
}
