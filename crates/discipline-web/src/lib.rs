//! # discipline-web
//!
//! Discipline REST API 서버.
//! Axum 기반, 모든 엔드포인트는 `/api` 아래에 있다.
//!
//! ## 기능
//! - 습관 카탈로그, 카테고리
//! - 습관 조합 (보너스 규칙)
//! - 하루치 완료 기록 저장/조회
//! - 스트릭, 기간 통계, 전날 대비 비교

pub mod error;
pub mod handlers;
pub mod routes;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use discipline_core::config::WebConfig;
use discipline_core::ports::storage::DisciplineStore;
use discipline_engine::day::DayRecorder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::ErrorResponse;

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 저장소
    pub store: Arc<dyn DisciplineStore>,
    /// 하루치 저장 서비스
    pub recorder: DayRecorder,
}

impl AppState {
    pub fn new(store: Arc<dyn DisciplineStore>) -> Self {
        Self {
            recorder: DayRecorder::new(store.clone()),
            store,
        }
    }
}

/// 전체 라우터 구성 (API + CORS + 요청 추적)
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes())
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 알 수 없는 경로
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "경로를 찾을 수 없습니다".to_string(),
            status: StatusCode::NOT_FOUND.as_u16(),
        }),
    )
}

/// API 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(store: Arc<dyn DisciplineStore>, config: WebConfig) -> Self {
        Self {
            config,
            state: AppState::new(store),
        }
    }

    /// 서버 실행
    ///
    /// 기본 포트에서 시작하여, 포트가 이미 사용 중이면 다음 포트를 시도합니다.
    /// 최대 10개 포트를 시도한 후 실패하면 에러를 반환합니다.
    ///
    /// # Arguments
    /// * `shutdown_rx` - 종료 신호 수신 채널
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let app = build_router(self.state);

        // 포트 바인드 시도 (최대 MAX_PORT_ATTEMPTS번)
        let base_port = self.config.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            let port = base_port.saturating_add(attempt);

            // 포트 오버플로우 체크
            if port == u16::MAX && attempt > 0 && base_port.saturating_add(attempt - 1) == port {
                break;
            }

            let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {}:{}: {}", host, port, e);
                    continue;
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {} 사용 불가, 대체 포트 {} 사용", base_port, port);
                    }
                    info!("API 서버 시작: http://{}", addr);

                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            loop {
                                if *shutdown_rx.borrow() {
                                    info!("웹 서버 종료 신호 수신");
                                    break;
                                }
                                if shutdown_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        })
                        .await?;

                    info!("API 서버 종료");
                    return Ok(());
                }
                Err(e) => {
                    // AddrInUse 에러인 경우 다음 포트 시도
                    if e.kind() == std::io::ErrorKind::AddrInUse {
                        warn!("포트 {} 이미 사용 중, 다음 포트 시도...", port);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        // 모든 시도 실패
        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discipline_storage::sqlite::SqliteStorage;

    #[test]
    fn web_server_url() {
        let store = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let server = WebServer::new(store, WebConfig::default());
        assert_eq!(server.url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn shuts_down_on_signal() {
        let store = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let config = WebConfig {
            port: 0,
            ..Default::default()
        };
        let server = WebServer::new(store, config);

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(server.run(rx));
        tx.send(true).unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
