//! API 핸들러 모듈.

pub mod combinations;
pub mod completions;
pub mod habits;
pub mod health;
pub mod stats;

use chrono::{Local, NaiveDate};
use serde::Serialize;

/// 성공 응답 상태 값
pub const STATUS_SUCCESS: &str = "success";

/// 목록 응답 구조 (`{status, data}`)
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            data,
        }
    }
}

/// 본문을 펼친 응답 구조 (`{status, ...body}`)
#[derive(Debug, Serialize)]
pub struct StatusResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> StatusResponse<T> {
    pub fn success(body: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            body,
        }
    }
}

/// 본문 없는 성공 응답
#[derive(Debug, Serialize)]
pub struct Ack {
    pub status: &'static str,
}

impl Ack {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS,
        }
    }
}

/// 서버 로컬 기준 오늘 날짜
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
