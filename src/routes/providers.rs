//! # 공급사(CP) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/v1/cp/materials`        → 자격 자료 생성 (공급사가 없으면 함께 생성)
//! - `PUT    /api/v1/cp/materials/{id}`   → 초안 자격 자료 수정
//! - `POST   /api/v1/cp/materials/review` → 자격 자료 심사
//! - `GET    /api/v1/cp/{cp_id}`          → 공급사 상세
//! - `GET    /api/v1/cp`                  → 공급사 목록 (`?filter=&page=&page_size=`)
//! - `DELETE /api/v1/cp/{cp_id}/draft`    → 최신 초안 철회

use super::AppState;
use crate::{error::AppError, models::*};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// `POST /cp/materials`: 201과 `{ parent_id, version_id }`
pub async fn create_material(
    State(state): State<AppState>,
    Json(req): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<SavedIds>), AppError> {
    let saved = state.providers.create_material(&req).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMaterialRequest>,
) -> Result<StatusCode, AppError> {
    state.providers.update_material(id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn review_material(
    State(state): State<AppState>,
    Json(req): Json<ReviewMaterialRequest>,
) -> Result<StatusCode, AppError> {
    state.providers.review_material(&req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_provider(
    State(state): State<AppState>,
    Path(cp_id): Path<i64>,
) -> Result<Json<ProviderDetail>, AppError> {
    let detail = state.projector.provider_detail(cp_id).await?;
    Ok(Json(detail))
}

/// `GET /cp`: 필터에 맞는 공급사가 없으면 빈 목록과 `total: 0`
pub async fn list_providers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<ProviderSummary>>, AppError> {
    let page = state
        .projector
        .list_providers(query.filter_text(), query.page_request())
        .await?;
    Ok(Json(page))
}

/// `DELETE /cp/{cp_id}/draft`: 행을 지우지 않고 거절 상태로 바꿉니다.
pub async fn delete_draft(
    State(state): State<AppState>,
    Path(cp_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.providers.delete_draft(cp_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
