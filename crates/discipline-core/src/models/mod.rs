//! Discipline 도메인 모델.
//!
//! 저장소, 엔진, 웹 API가 공유하는 데이터 구조체를 정의한다.
//! 모든 모델은 `serde`로 직렬화된다.

pub mod combination;
pub mod completion;
pub mod day;
pub mod habit;
pub mod stat;
pub mod stats;
pub mod streak;
