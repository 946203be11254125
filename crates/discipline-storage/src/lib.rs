//! # discipline-storage
//!
//! 로컬 저장소 어댑터.
//! SQLite 기반 습관 카탈로그, 완료 기록, 일일 요약, 스트릭 저장과
//! 스키마 마이그레이션을 관리한다.
//!
//! ## 모듈
//! - `sqlite`: 저장소 포트 구현 (`SqliteStorage`)
//! - `migration`: 스키마 마이그레이션

pub mod migration;
pub mod sqlite;
