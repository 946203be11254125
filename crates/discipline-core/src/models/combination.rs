//! 습관 조합(보너스 규칙) 모델.

use serde::{Deserialize, Serialize};

use super::stat::StatVector;
use crate::error::CoreError;

/// 정규화된 습관 쌍 (항상 `first < second`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HabitPair {
    first: i64,
    second: i64,
}

impl HabitPair {
    /// 입력 순서와 무관하게 정규화된 쌍 생성
    ///
    /// 같은 습관 두 개는 허용하지 않는다.
    pub fn new(a: i64, b: i64) -> Result<Self, CoreError> {
        if a == b {
            return Err(CoreError::validation(
                "habit_b",
                "habit_a와 habit_b는 서로 달라야 합니다",
            ));
        }
        Ok(Self {
            first: a.min(b),
            second: a.max(b),
        })
    }

    pub fn first(&self) -> i64 {
        self.first
    }

    pub fn second(&self) -> i64 {
        self.second
    }

    pub fn contains(&self, habit_id: i64) -> bool {
        self.first == habit_id || self.second == habit_id
    }
}

/// 저장된 조합
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combination {
    pub id: i64,
    pub name: Option<String>,
    pub habit_a: i64,
    pub habit_b: i64,
    /// 두 습관을 같은 날 모두 성공했을 때 부여되는 보너스
    #[serde(flatten)]
    pub bonus: StatVector,
    pub is_active: bool,
    pub created_at: String,
    /// 습관 A 이름 (조회 시 조인)
    pub name_a: Option<String>,
    /// 습관 B 이름
    pub name_b: Option<String>,
}

/// 조합 생성 요청
#[derive(Debug, Clone, Deserialize)]
pub struct NewCombination {
    #[serde(default)]
    pub name: Option<String>,
    pub habit_a: i64,
    pub habit_b: i64,
    #[serde(flatten)]
    pub bonus: StatVector,
}

impl NewCombination {
    /// 정규화된 습관 쌍
    pub fn pair(&self) -> Result<HabitPair, CoreError> {
        HabitPair::new(self.habit_a, self.habit_b)
    }
}
