//! # 에러 처리 모듈
//!
//! 워크플로 엔진에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 에러는 두 부류(class)로 나뉩니다:
//! - **Rejected**: 호출자의 입력이나 현재 상태 때문에 거절된 업무상 결과
//!   (검증 실패, 없음, 상태 충돌, 초안 아님)
//! - **Failed**: 호출자 탓이 아닌 예기치 못한 실패 (DB 연결, 제약 조건, 데드라인 초과)
//!
//! 성공은 `Ok`이므로, 호출자는 메시지 문자열을 파싱하지 않고
//! `Ok` / `Rejected` / `Failed` 세 갈래로 분기할 수 있습니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 에러 부류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 이름 붙은 업무상 이유로 거절됨
    Rejected,
    /// 예기치 못한 내부 실패
    Failed,
}

/// 엔진 전체에서 쓰는 에러 타입
#[derive(Debug, Error)]
pub enum AppError {
    /// 잘못되었거나 빠진 입력. 저장소에 접근하기 전에 감지됩니다.
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// 참조한 부모/버전 행이 없음
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// 현재 상태에서는 허용되지 않는 작업
    /// ("0행 갱신"도 성공이 아니라 충돌로 취급합니다)
    #[error("State conflict: {0}")]
    Conflict(String),

    /// Delete-Draft 대상의 최신 버전이 초안이 아님
    #[error("the newest version of {entity} {parent_id} is not a draft")]
    NotDraft { entity: &'static str, parent_id: i64 },

    /// 작업 데드라인 초과. 열린 트랜잭션은 롤백됩니다.
    #[error("operation {operation} exceeded its deadline")]
    Timeout { operation: &'static str },

    /// 어느 작업, 어느 ID에서 실패했는지를 담은 저장소 에러
    #[error("store error during {operation} (id {id}): {source}")]
    Store {
        operation: &'static str,
        id: i64,
        #[source]
        source: sqlx::Error,
    },

    /// 문맥이 붙기 전의 저장소 에러. `?`로 자동 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 목록 필드(JSON 배열) 인코딩/디코딩 실패
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl AppError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::Validation(_)
            | AppError::NotFound { .. }
            | AppError::Conflict(_)
            | AppError::NotDraft { .. } => ErrorClass::Rejected,
            AppError::Timeout { .. }
            | AppError::Store { .. }
            | AppError::Database(_)
            | AppError::Codec(_) => ErrorClass::Failed,
        }
    }

    /// 문맥 없는 저장소 에러에 작업 이름과 대상 ID를 붙입니다.
    /// 다른 variant는 그대로 통과합니다.
    pub fn in_operation(self, operation: &'static str, id: i64) -> Self {
        match self {
            AppError::Database(source) => AppError::Store {
                operation,
                id,
                source,
            },
            other => other,
        }
    }

    /// 응답 본문에 실리는 기계용 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "invalid_argument",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict(_) => "state_conflict",
            AppError::NotDraft { .. } => "not_a_draft",
            AppError::Timeout { .. } => "timeout",
            AppError::Codec(_) => "internal_error",
            AppError::Store { .. } | AppError::Database(_) => "database_error",
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 업무상 거절은 메시지를 그대로 돌려주고,
    /// 내부 실패는 로그에만 자세히 남긴 뒤 일반적인 메시지를 돌려줍니다.
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::NotDraft { .. } => StatusCode::CONFLICT,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self.class() {
            ErrorClass::Rejected => self.to_string(),
            ErrorClass::Failed => {
                tracing::error!(error = %self, "request failed");
                match self {
                    AppError::Timeout { .. } => "The operation timed out".to_string(),
                    AppError::Store { .. } | AppError::Database(_) => {
                        "A database error occurred".to_string()
                    }
                    _ => "An internal error occurred".to_string(),
                }
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "game 42 not found" } }
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn business_errors_are_rejected_class() {
        assert_eq!(AppError::Validation("x".into()).class(), ErrorClass::Rejected);
        assert_eq!(
            AppError::NotFound { entity: "game", id: 1 }.class(),
            ErrorClass::Rejected
        );
        assert_eq!(AppError::Conflict("x".into()).class(), ErrorClass::Rejected);
        assert_eq!(
            AppError::NotDraft { entity: "game", parent_id: 1 }.class(),
            ErrorClass::Rejected
        );
    }

    #[test]
    fn store_errors_are_failed_class_and_gain_context() {
        let err = AppError::from(sqlx::Error::RowNotFound).in_operation("review_version", 7);
        assert_eq!(err.class(), ErrorClass::Failed);
        assert_matches!(
            err,
            AppError::Store { operation: "review_version", id: 7, .. }
        );
    }

    #[test]
    fn in_operation_leaves_business_errors_alone() {
        let err = AppError::Conflict("busy".into()).in_operation("update_draft", 3);
        assert_matches!(err, AppError::Conflict(msg) if msg == "busy");
    }

    #[test]
    fn failed_responses_hide_store_details() {
        let response = AppError::from(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
