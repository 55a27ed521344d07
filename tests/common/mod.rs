//! 통합 테스트 공용 헬퍼
//!
//! 워크플로/조회기 조립, 요청 본문 빌더, 라우터 호출 헬퍼를 모아둡니다.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use launchpad::models::*;
use launchpad::routes::{self, AppState};
use launchpad::services::ids::{IdGenerator, SequentialIds};
use launchpad::services::{GameWorkflow, Projector, ProviderWorkflow, DEFAULT_DEADLINE};

// ---------------------------------------------------------------------------
// 조립
// ---------------------------------------------------------------------------

/// 테스트마다 예측 가능한 ID (1, 2, 3, ...)
pub fn test_ids() -> Arc<dyn IdGenerator> {
    Arc::new(SequentialIds::starting_at(1))
}

pub fn provider_workflow(pool: &SqlitePool) -> ProviderWorkflow {
    ProviderWorkflow::new(pool.clone(), test_ids())
}

pub fn game_workflow(pool: &SqlitePool) -> GameWorkflow {
    GameWorkflow::new(pool.clone(), test_ids())
}

pub fn projector(pool: &SqlitePool) -> Projector {
    Projector::new(pool.clone())
}

/// `main.rs`와 같은 라우터 (미들웨어 제외)
pub fn build_test_app(pool: SqlitePool) -> Router {
    routes::router(AppState::new(pool, test_ids(), DEFAULT_DEADLINE))
}

// ---------------------------------------------------------------------------
// 요청 본문
// ---------------------------------------------------------------------------

pub fn material(cp_name: &str) -> MaterialContent {
    MaterialContent {
        cp_icon: format!("https://cdn.example.com/{cp_name}.png"),
        cp_name: cp_name.to_string(),
        verification_images: vec![
            "https://cdn.example.com/license-front.png".to_string(),
            "https://cdn.example.com/license-back.png".to_string(),
        ],
        business_license: "BL-0001".to_string(),
        website: "https://example.com".to_string(),
    }
}

pub fn create_material(cp_id: i64, cp_name: &str, submit_mode: SubmitMode) -> CreateMaterialRequest {
    CreateMaterialRequest {
        cp_id,
        material: material(cp_name),
        submit_mode,
    }
}

pub fn game_version(game_name: &str) -> GameVersionContent {
    GameVersionContent {
        game_name: game_name.to_string(),
        game_icon: format!("https://cdn.example.com/{game_name}/icon.png"),
        header_image: format!("https://cdn.example.com/{game_name}/header.png"),
        game_introduction: format!("{game_name} is a puzzle game"),
        game_introduction_images: vec!["https://cdn.example.com/shot-1.png".to_string()],
        platforms: vec![GamePlatform::Android, GamePlatform::Ios],
        package_name: "com.example.game".to_string(),
        download_url: "https://example.com/download".to_string(),
    }
}

pub fn save_game(cp_id: i64, game_name: &str, submit_mode: SubmitMode) -> SaveGameRequest {
    SaveGameRequest {
        game_id: 0,
        cp_id,
        version: game_version(game_name),
        submit_mode,
    }
}

pub fn review(decision: ReviewDecision, remark: &str) -> ReviewInput {
    ReviewInput {
        decision,
        operator: "reviewer-1".to_string(),
        remark: remark.to_string(),
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// 라우터를 한 번 호출하고 상태 코드와 JSON 본문을 돌려줍니다.
/// 본문이 비어 있으면 `Value::Null`입니다.
pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// ---------------------------------------------------------------------------
// 원시 행 조회
// ---------------------------------------------------------------------------

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
