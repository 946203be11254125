//! # discipline-engine
//!
//! 스트릭/합계 재계산 엔진.
//! 완료 이력에서 습관별 연속 기록을 처음부터 다시 계산하고,
//! 조합 보너스와 마찰 배율을 반영해 일일 합계를 만든다.
//!
//! - [`streak`]: 스트릭 재계산 (순수 함수 + 전체 재구축)
//! - [`combination`]: 조합 보너스
//! - [`totals`]: 마찰 배율, 일일 합계
//! - [`day`]: 하루치 저장 트랜잭션
//! - [`period`]: 기간 통계, 추세 비교

pub mod combination;
pub mod day;
pub mod period;
pub mod streak;
pub mod totals;
