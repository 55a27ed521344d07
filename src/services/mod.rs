//! # 서비스 모듈
//!
//! - `ids`: 부모/버전 ID 발급
//! - `codec`: 목록 필드의 JSON 텍스트 인코딩
//! - `deadline`: 작업 단위 데드라인
//! - `provider_workflow`, `game_workflow`: 상태를 바꾸는 작업 (한 작업 = 한 트랜잭션)
//! - `projector`: 상세/목록 조회

pub mod codec;
pub mod deadline;
pub mod game_workflow;
pub mod ids;
pub mod projector;
pub mod provider_workflow;

pub use game_workflow::GameWorkflow;
pub use projector::Projector;
pub use provider_workflow::ProviderWorkflow;

use crate::error::{AppError, ErrorClass};
use crate::models::VersionStatus;
use std::future::Future;
use std::time::Duration;

/// 호출자가 따로 주지 않을 때 쓰는 작업 데드라인
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// 작업 하나를 데드라인 안에서 실행하고, 실패에 작업 이름과 대상 ID를 붙입니다.
///
/// 업무상 거절은 여기서 `warn`으로 남깁니다. 내부 실패는 HTTP 경계에서 한 번만 기록합니다.
pub(crate) async fn run_operation<T, F>(
    operation: &'static str,
    id: i64,
    limit: Duration,
    work: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    deadline::run(operation, limit, work).await.map_err(|err| {
        let err = err.in_operation(operation, id);
        if err.class() == ErrorClass::Rejected {
            tracing::warn!(operation, id, error = %err, "operation rejected");
        }
        err
    })
}

/// 상태 조건부 갱신이 0행이었을 때, 다시 읽은 현재 상태로 원인을 가립니다.
///
/// 행이 있으면 전이 표에서 막힌 전이를 충돌 사유로 씁니다.
pub(crate) fn missed_update(
    entity: &'static str,
    id: i64,
    current: Option<VersionStatus>,
    targets: &[VersionStatus],
) -> AppError {
    let Some(status) = current else {
        return AppError::NotFound { entity, id };
    };
    match status.ensure_can_reach(targets) {
        Err(AppError::Conflict(reason)) => AppError::Conflict(format!("{entity} {id}: {reason}")),
        Err(other) => other,
        // 같은 트랜잭션에서 다시 읽었으므로 가드와 어긋나는 경우는 없어야 합니다.
        Ok(()) => AppError::Conflict(format!("{entity} {id} is {}", status.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn missing_row_is_not_found() {
        assert_matches!(
            missed_update("material", 9, None, VersionStatus::EDIT_TARGETS),
            AppError::NotFound { entity: "material", id: 9 }
        );
    }

    #[test]
    fn present_row_is_a_conflict_naming_the_blocked_move() {
        let err = missed_update(
            "game version",
            3,
            Some(VersionStatus::Published),
            VersionStatus::EDIT_TARGETS,
        );
        assert_matches!(
            &err,
            AppError::Conflict(message) if message == "game version 3: cannot move from published to draft"
        );
        assert_eq!(err.class(), ErrorClass::Rejected);
    }

    #[test]
    fn reviewing_a_draft_names_the_publish_edge() {
        let err = missed_update(
            "material",
            4,
            Some(VersionStatus::Draft),
            VersionStatus::REVIEW_TARGETS,
        );
        assert_matches!(&err, AppError::Conflict(message) if message.ends_with("draft to published"));
    }
}
