//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 부모 테이블(gp_cp, gp_game)과 버전 테이블(gp_cp_material, gp_game_version)에
//! 직접 SQL을 보내는 함수들을 모아둔 모듈입니다.
//!
//! 모든 함수는 `SqliteExecutor`를 받으므로, 풀(`&SqlitePool`)로도,
//! 트랜잭션 안의 연결(`&mut *tx`)로도 호출할 수 있습니다.
//! 함수 하나는 SQL 문 하나만 실행합니다. 여러 문을 묶는 일은 `services`의 워크플로가 합니다.
//!
//! - `providers`: 공급사 / 자격 자료
//! - `games`: 게임 / 게임 버전

pub mod games;
pub mod providers;

use crate::models::VersionStatus;
use sqlx::{QueryBuilder, Sqlite};

/// 밀리초 정밀도의 ISO-8601 UTC 현재 시각 (SQL 식)
pub(crate) const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// `LIKE` 부분 일치 패턴. `%`, `_`, `\`는 이스케이프하여 글자 그대로 찾습니다.
/// 쿼리에서는 `ESCAPE '\'`와 함께 사용합니다.
pub(crate) fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// `AND status IN (?, ?, ...)` 조건을 덧붙입니다. 상태 검사와 갱신이 한 문장 안에서 일어납니다.
pub(crate) fn push_status_guard(qb: &mut QueryBuilder<'_, Sqlite>, allowed: &[VersionStatus]) {
    if allowed.is_empty() {
        return;
    }
    qb.push(" AND status IN (");
    let mut separated = qb.separated(", ");
    for status in allowed {
        separated.push_bind(*status);
    }
    separated.push_unseparated(")");
}
