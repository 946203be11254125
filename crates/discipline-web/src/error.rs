//! API 에러 처리.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use discipline_core::error::CoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 내부 서버 오류
    #[error("내부 서버 오류: {0}")]
    Internal(String),

    /// 리소스를 찾을 수 없음
    #[error("리소스를 찾을 수 없음: {0}")]
    NotFound(String),

    /// 잘못된 요청
    #[error("잘못된 요청: {0}")]
    BadRequest(String),

    /// 식별자 충돌
    #[error("충돌: {0}")]
    Conflict(String),
}

/// 에러 응답 본문
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// 에러 메시지
    pub error: String,
    /// HTTP 상태 코드
    pub status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        };

        if status.is_server_error() {
            error!("API 오류: {}", message);
        }

        let body = ErrorResponse {
            error: message,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { .. } => ApiError::BadRequest(err.to_string()),
            CoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CoreError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::NotFound("습관".to_string());
        assert!(err.to_string().contains("습관"));
    }

    #[test]
    fn core_error_mapping() {
        let cases = [
            (CoreError::validation("date", "형식 오류"), StatusCode::BAD_REQUEST),
            (CoreError::not_found("Habit", 7), StatusCode::NOT_FOUND),
            (CoreError::Conflict("중복".to_string()), StatusCode::CONFLICT),
            (
                CoreError::Storage("디스크".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (core, expected) in cases {
            let response = ApiError::from(core).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
