//! 캐릭터 스탯 벡터.
//!
//! 습관, 조합, 완료 기록, 일일 요약이 공유하는 고정 스키마 수치 튜플
//! {I, S, W, E, C, H, ST, Money}.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// 필드 레이블 (표시/비교 키 순서)
pub const STAT_LABELS: [&str; 8] = ["I", "S", "W", "E", "C", "H", "ST", "$"];

/// 8개 필드 스탯 벡터
///
/// 역직렬화 시 소문자 키(`i`, `money`)와 대문자 키(`I`, `$`)를 모두 받는다.
/// 숫자가 아닌 값은 0으로 취급한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatVector {
    #[serde(default, alias = "I", deserialize_with = "lenient_f64")]
    pub i: f64,
    #[serde(default, alias = "S", deserialize_with = "lenient_f64")]
    pub s: f64,
    #[serde(default, alias = "W", deserialize_with = "lenient_f64")]
    pub w: f64,
    #[serde(default, alias = "E", deserialize_with = "lenient_f64")]
    pub e: f64,
    #[serde(default, alias = "C", deserialize_with = "lenient_f64")]
    pub c: f64,
    #[serde(default, alias = "H", deserialize_with = "lenient_f64")]
    pub h: f64,
    #[serde(default, alias = "ST", deserialize_with = "lenient_f64")]
    pub st: f64,
    #[serde(default, alias = "$", deserialize_with = "lenient_f64")]
    pub money: f64,
}

impl StatVector {
    /// 영벡터
    pub const ZERO: StatVector = StatVector {
        i: 0.0,
        s: 0.0,
        w: 0.0,
        e: 0.0,
        c: 0.0,
        h: 0.0,
        st: 0.0,
        money: 0.0,
    };

    /// 배열에서 생성 (STAT_LABELS 순서)
    pub fn from_array(v: [f64; 8]) -> Self {
        Self {
            i: v[0],
            s: v[1],
            w: v[2],
            e: v[3],
            c: v[4],
            h: v[5],
            st: v[6],
            money: v[7],
        }
    }

    /// 배열로 변환 (STAT_LABELS 순서)
    pub fn to_array(&self) -> [f64; 8] {
        [
            self.i, self.s, self.w, self.e, self.c, self.h, self.st, self.money,
        ]
    }

    /// 필드별 변환
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_array(self.to_array().map(f))
    }

    /// 모든 필드에 배율 적용
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// (레이블, 값) 쌍 반복자
    pub fn labeled(&self) -> impl Iterator<Item = (&'static str, f64)> {
        STAT_LABELS.into_iter().zip(self.to_array())
    }

    pub fn is_zero(&self) -> bool {
        self.to_array().iter().all(|v| *v == 0.0)
    }
}

impl Add for StatVector {
    type Output = StatVector;

    fn add(self, rhs: StatVector) -> StatVector {
        let (a, b) = (self.to_array(), rhs.to_array());
        StatVector::from_array(std::array::from_fn(|idx| a[idx] + b[idx]))
    }
}

impl AddAssign for StatVector {
    fn add_assign(&mut self, rhs: StatVector) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for StatVector {
    type Output = StatVector;

    fn mul(self, rhs: f64) -> StatVector {
        self.scaled(rhs)
    }
}

impl Sum for StatVector {
    fn sum<I: Iterator<Item = StatVector>>(iter: I) -> StatVector {
        iter.fold(StatVector::ZERO, |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a StatVector> for StatVector {
    fn sum<I: Iterator<Item = &'a StatVector>>(iter: I) -> StatVector {
        iter.fold(StatVector::ZERO, |acc, v| acc + *v)
    }
}

/// JSON 값 → f64 (숫자, 숫자 문자열만 인정, 나머지는 0)
pub fn number_or_zero(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// 관대한 f64 역직렬화 (null/문자열/잘못된 값 → 0)
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let n = number_or_zero(&value);
    Ok(if n.is_finite() { n } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_scale() {
        let a = StatVector {
            i: 10.0,
            money: 2.0,
            ..Default::default()
        };
        let b = StatVector {
            i: 5.0,
            st: 1.0,
            ..Default::default()
        };

        let sum = (a + b) * 3.0;
        assert_eq!(sum.i, 45.0);
        assert_eq!(sum.st, 3.0);
        assert_eq!(sum.money, 6.0);
        assert_eq!(sum.s, 0.0);
    }

    #[test]
    fn accepts_upper_and_lower_keys() {
        let upper: StatVector =
            serde_json::from_str(r#"{"I": 1, "ST": 2, "$": 3.5}"#).unwrap();
        assert_eq!(upper.i, 1.0);
        assert_eq!(upper.st, 2.0);
        assert_eq!(upper.money, 3.5);

        let lower: StatVector = serde_json::from_str(r#"{"w": 4, "money": 1}"#).unwrap();
        assert_eq!(lower.w, 4.0);
        assert_eq!(lower.money, 1.0);
    }

    #[test]
    fn non_numeric_values_become_zero() {
        let v: StatVector =
            serde_json::from_str(r#"{"I": "abc", "S": null, "W": "2.5", "E": true}"#).unwrap();
        assert_eq!(v.i, 0.0);
        assert_eq!(v.s, 0.0);
        assert_eq!(v.w, 2.5);
        assert_eq!(v.e, 0.0);
    }

    #[test]
    fn sum_of_vectors() {
        let vs = [
            StatVector {
                h: 1.0,
                ..Default::default()
            },
            StatVector {
                h: 2.0,
                ..Default::default()
            },
        ];
        let total: StatVector = vs.iter().sum();
        assert_eq!(total.h, 3.0);
        assert!(!total.is_zero());
        assert!(StatVector::ZERO.is_zero());
    }

    #[test]
    fn labeled_order() {
        let v = StatVector::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let labels: Vec<_> = v.labeled().map(|(l, _)| l).collect();
        assert_eq!(labels, STAT_LABELS.to_vec());
        assert_eq!(v.labeled().last(), Some(("$", 8.0)));
    }
}
