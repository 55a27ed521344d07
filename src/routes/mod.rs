//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 워크플로/조회 호출로 옮기는 얇은 어댑터입니다.
//! 핸들러는 판단을 하지 않고, 결과와 에러를 그대로 응답으로 바꿉니다.
//!
//! 각 하위 모듈:
//! - `providers`: 공급사 / 자격 자료
//! - `games`: 게임 / 게임 버전
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod games;
pub mod health;
pub mod providers;

use crate::services::{ids::IdGenerator, GameWorkflow, Projector, ProviderWorkflow};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 안에 든 것은 모두 풀 핸들을 공유하므로 clone해도 연결이 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub providers: ProviderWorkflow,
    pub games: GameWorkflow,
    pub projector: Projector,
}

impl AppState {
    /// 풀과 ID 발급기를 주입해 워크플로와 조회기를 만듭니다.
    pub fn new(pool: SqlitePool, ids: Arc<dyn IdGenerator>, deadline: Duration) -> Self {
        Self {
            providers: ProviderWorkflow::new(pool.clone(), ids.clone()).with_deadline(deadline),
            games: GameWorkflow::new(pool.clone(), ids).with_deadline(deadline),
            projector: Projector::new(pool.clone()).with_deadline(deadline),
            pool,
        }
    }
}

/// `/api/v1` 아래의 모든 라우트
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        // 공급사 / 자격 자료
        .route("/cp", get(providers::list_providers))
        .route("/cp/materials", post(providers::create_material))
        .route("/cp/materials/review", post(providers::review_material))
        .route("/cp/materials/{id}", put(providers::update_material))
        .route("/cp/{cp_id}", get(providers::get_provider))
        .route("/cp/{cp_id}/draft", delete(providers::delete_draft))
        // 게임 / 게임 버전
        .route("/games", get(games::list_games).post(games::create_game))
        .route("/games/review", post(games::review_version))
        .route("/games/versions/{id}", put(games::update_draft))
        .route("/games/{id}", get(games::get_game).put(games::attach_version))
        .route("/games/{id}/draft", delete(games::delete_draft))
        .route("/health", get(health::health_check))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}
