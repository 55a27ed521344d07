//! # 게임 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/v1/games`                → 게임 + 첫 버전 생성 (`game_id`는 0)
//! - `PUT    /api/v1/games/{id}`           → 기존 게임에 새 버전 추가
//! - `PUT    /api/v1/games/versions/{id}`  → 초안 게임 버전 수정
//! - `POST   /api/v1/games/review`         → 게임 버전 심사
//! - `DELETE /api/v1/games/{id}/draft`     → 최신 초안 철회
//! - `GET    /api/v1/games/{id}`           → 게임 상세
//! - `GET    /api/v1/games`                → 게임 목록

use super::AppState;
use crate::{error::AppError, models::*};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

pub async fn create_game(
    State(state): State<AppState>,
    Json(req): Json<SaveGameRequest>,
) -> Result<(StatusCode, Json<SavedIds>), AppError> {
    let saved = state.games.create_game(&req).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// `PUT /games/{id}`: 본문의 `game_id`는 생략하거나 경로와 같아야 합니다.
pub async fn attach_version(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SaveGameRequest>,
) -> Result<(StatusCode, Json<SavedIds>), AppError> {
    let saved = state.games.attach_version(id, &req).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update_draft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateGameDraftRequest>,
) -> Result<StatusCode, AppError> {
    state.games.update_draft(id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn review_version(
    State(state): State<AppState>,
    Json(req): Json<ReviewGameRequest>,
) -> Result<StatusCode, AppError> {
    state.games.review_version(&req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_draft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.games.delete_draft(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(state.projector.game_detail(id).await?))
}

pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<GameSummary>>, AppError> {
    let page = state
        .projector
        .list_games(query.filter_text(), query.page_request())
        .await?;
    Ok(Json(page))
}
