//! API 라우트 정의.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 상태 확인
        .route("/health", get(handlers::health::health_check))
        // 습관 카탈로그
        .route(
            "/habits",
            get(handlers::habits::list_habits).post(handlers::habits::create_habit),
        )
        .route(
            "/habits/categories",
            get(handlers::habits::list_categories),
        )
        .route(
            "/habits/{id}",
            put(handlers::habits::update_habit).delete(handlers::habits::delete_habit),
        )
        // 습관 조합
        .route(
            "/combinations",
            get(handlers::combinations::list_combinations)
                .post(handlers::combinations::create_combination),
        )
        // 완료 기록
        .route("/completions", post(handlers::completions::save_day))
        .route("/completions/{date}", get(handlers::completions::get_day))
        // 통계
        .route("/stats/streaks", get(handlers::stats::get_streaks))
        .route(
            "/stats/streaks/rebuild",
            post(handlers::stats::rebuild_streaks),
        )
        .route("/stats/period", get(handlers::stats::get_period_stats))
        .route(
            "/stats/daily_comparison",
            get(handlers::stats::get_daily_comparison),
        )
        .route("/stats/total_days", get(handlers::stats::get_total_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use discipline_storage::sqlite::SqliteStorage;
    use std::sync::Arc;

    #[test]
    fn routes_compile() {
        let store = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let state = AppState::new(store);
        let _app: Router<()> = api_routes().with_state(state);
    }
}
