//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "database": "ok" }`
//!
//! 프로세스가 살아 있는지와 함께 DB 연결 풀에서 연결을 얻어 쿼리할 수 있는지 확인합니다.

use super::AppState;
use crate::error::AppError;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `GET /health`: DB에 `SELECT 1`을 보내고, 실패하면 500(database_error)을 돌려줍니다.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;
    Ok(Json(json!({
        "status": "ok",
        "database": "ok"
    })))
}
