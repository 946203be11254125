//! 습관 카탈로그 모델.
//!
//! 습관 식별자는 (name, category) 쌍이며, 삭제는 `is_active` 플래그로만 한다.

use serde::{Deserialize, Serialize};

use super::stat::StatVector;

/// 카테고리 미지정 시 기본값
pub const DEFAULT_CATEGORY: &str = "Без категории";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// 습관
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// 습관 ID
    pub id: i64,
    /// 이름
    pub name: String,
    /// 카테고리
    pub category: String,
    /// 설명
    pub description: Option<String>,
    /// 기본 수량
    pub default_quantity: Option<f64>,
    /// 수량 단위
    pub unit: Option<String>,
    /// 완료 1회당 스탯 기여량
    #[serde(flatten)]
    pub stats: StatVector,
    /// 하위 작업으로 구성된 습관인지
    pub is_composite: bool,
    /// 활성 여부 (false = 소프트 삭제)
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    /// 하위 작업 (composite 습관만)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<HabitSubtask>,
}

/// 습관 하위 작업
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitSubtask {
    pub id: i64,
    pub habit_id: i64,
    pub name: String,
    pub default_quantity: Option<f64>,
    pub unit: Option<String>,
    #[serde(flatten)]
    pub stats: StatVector,
    /// 표시 순서
    pub order_index: i64,
}

/// 습관 생성 요청
#[derive(Debug, Clone, Deserialize)]
pub struct NewHabit {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(flatten)]
    pub stats: StatVector,
    #[serde(default)]
    pub is_composite: bool,
    /// composite 습관일 때만 저장된다
    #[serde(default)]
    pub subtasks: Vec<NewSubtask>,
}

impl NewHabit {
    /// 이름/카테고리만으로 생성 (테스트, 시드 데이터용)
    pub fn named(name: &str, category: &str, stats: StatVector) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            description: None,
            default_quantity: None,
            unit: None,
            stats,
            is_composite: false,
            subtasks: Vec::new(),
        }
    }
}

/// 하위 작업 생성 요청
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubtask {
    pub name: String,
    #[serde(default)]
    pub default_quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(flatten)]
    pub stats: StatVector,
}

/// 습관 부분 수정 요청 (None 필드는 기존 값 유지)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub default_quantity: Option<f64>,
    pub unit: Option<String>,
    pub i: Option<f64>,
    pub s: Option<f64>,
    pub w: Option<f64>,
    pub e: Option<f64>,
    pub c: Option<f64>,
    pub h: Option<f64>,
    pub st: Option<f64>,
    pub money: Option<f64>,
}

/// 습관 목록 필터
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitFilter {
    /// 카테고리 일치
    pub category: Option<String>,
    /// 이름/설명 부분 일치
    pub search: Option<String>,
}
