//! 작업 데드라인
//!
//! 트랜잭션 하나를 통째로 `tokio::time::timeout`으로 감쌉니다.
//! 시간이 지나면 future가 drop되고, 그 안의 `sqlx::Transaction`도 drop되어 롤백됩니다.
//! 이 계층은 재시도하지 않습니다.

use crate::error::AppError;
use std::future::Future;
use std::time::Duration;

pub async fn run<T, F>(operation: &'static str, limit: Duration, work: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, ?limit, "deadline exceeded; transaction rolled back");
            Err(AppError::Timeout { operation })
        }
    }
}
