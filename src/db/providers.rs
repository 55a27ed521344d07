//! # 공급사 / 자격 자료 쿼리 모듈
//!
//! `gp_cp`(부모)와 `gp_cp_material`(버전) 테이블에 대한 쿼리 함수들입니다.
//!
//! ## 테이블 구조
//! - `gp_cp`: 공급사. `newest_material_id`(가장 최근에 만든 자료),
//!   `online_material_id`(게시 중인 자료) 두 포인터를 가집니다.
//! - `gp_cp_material`: 자격 자료 버전. 상태와 심사 정보를 가집니다.

use super::{like_pattern, push_status_guard, NOW};
use crate::models::*;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

const PROVIDER_COLUMNS: &str = "id, cp_name, newest_material_id, online_material_id, \
    verify_status, create_ts, modify_ts";

const MATERIAL_COLUMNS: &str = "id, cp_id, cp_icon, cp_name, verification_images, \
    business_license, website, status, operator, review_comment, review_time, create_ts, modify_ts";

/// 자격 자료 행의 부분 갱신 내용
///
/// `None`인 항목은 SQL에 포함되지 않습니다. `modify_ts`는 항상 갱신됩니다.
#[derive(Debug, Default)]
pub struct MaterialPatch<'a> {
    pub fields: Option<&'a MaterialFields>,
    pub status: Option<VersionStatus>,
    pub review: Option<&'a ReviewStamp>,
}

/// ID로 공급사를 조회합니다.
pub async fn get_provider<'e, E>(executor: E, id: i64) -> Result<Option<Provider>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!("SELECT {PROVIDER_COLUMNS} FROM gp_cp WHERE id = ?");
    sqlx::query_as::<_, Provider>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// 공급사 행을 만들거나, 이미 있으면 최신 자료 포인터와 이름만 바꿉니다.
///
/// 존재 확인과 삽입/갱신이 `INSERT .. ON CONFLICT` 한 문장이므로,
/// 처음 보는 공급사에 대해 동시에 제출이 들어와도 부모 행은 하나만 생깁니다.
pub async fn upsert_provider<'e, E>(
    executor: E,
    cp_id: i64,
    cp_name: &str,
    newest_material_id: i64,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!(
        "INSERT INTO gp_cp (id, cp_name, newest_material_id) VALUES (?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             cp_name = excluded.cp_name,
             newest_material_id = excluded.newest_material_id,
             modify_ts = {NOW}"
    );
    sqlx::query(&query)
        .bind(cp_id)
        .bind(cp_name)
        .bind(newest_material_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// 게시 포인터를 옮기고, 게시된 자료의 이름으로 공급사 이름을 새로 고칩니다.
/// 게시된 자료가 생겼으므로 공급사는 인증됨(`verify_status = 1`)이 됩니다.
///
/// 갱신된 행 수를 돌려줍니다 (0이면 공급사가 없음).
pub async fn set_online_material<'e, E>(
    executor: E,
    cp_id: i64,
    material_id: i64,
    cp_name: &str,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!(
        "UPDATE gp_cp SET online_material_id = ?, cp_name = ?, verify_status = 1, \
         modify_ts = {NOW} WHERE id = ?"
    );
    let result = sqlx::query(&query)
        .bind(material_id)
        .bind(cp_name)
        .bind(cp_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn get_material<'e, E>(executor: E, id: i64) -> Result<Option<MaterialRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!("SELECT {MATERIAL_COLUMNS} FROM gp_cp_material WHERE id = ?");
    sqlx::query_as::<_, MaterialRow>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// 새 자격 자료 행을 삽입합니다. 버전 행은 수정 때마다 새로 만들어지지 않고,
/// Create-or-Attach 때만 생깁니다.
pub async fn insert_material<'e, E>(
    executor: E,
    id: i64,
    cp_id: i64,
    fields: &MaterialFields,
    status: VersionStatus,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO gp_cp_material
            (id, cp_id, cp_icon, cp_name, verification_images, business_license, website, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(cp_id)
    .bind(&fields.cp_icon)
    .bind(&fields.cp_name)
    .bind(&fields.verification_images)
    .bind(&fields.business_license)
    .bind(&fields.website)
    .bind(status)
    .execute(executor)
    .await?;
    Ok(())
}

/// 자격 자료 행을 부분 갱신합니다 (상태 조건부).
///
/// 현재 상태가 `allowed` 중 하나일 때만 갱신되며, 갱신된 행을 돌려줍니다.
/// `None`이면 행이 없거나 상태 조건에 걸린 것이므로, 호출자가 다시 조회해 구분합니다.
pub async fn update_material<'e, E>(
    executor: E,
    id: i64,
    allowed: &[VersionStatus],
    patch: &MaterialPatch<'_>,
) -> Result<Option<MaterialRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let mut qb = QueryBuilder::<Sqlite>::new(format!("UPDATE gp_cp_material SET modify_ts = {NOW}"));

    if let Some(fields) = patch.fields {
        qb.push(", cp_icon = ").push_bind(fields.cp_icon.as_str());
        qb.push(", cp_name = ").push_bind(fields.cp_name.as_str());
        qb.push(", verification_images = ")
            .push_bind(fields.verification_images.as_str());
        qb.push(", business_license = ")
            .push_bind(fields.business_license.as_str());
        qb.push(", website = ").push_bind(fields.website.as_str());
    }
    if let Some(status) = patch.status {
        qb.push(", status = ").push_bind(status);
    }
    if let Some(review) = patch.review {
        qb.push(", operator = ").push_bind(review.operator.as_str());
        qb.push(", review_comment = ").push_bind(review.comment.as_str());
        qb.push(", review_time = ").push_bind(review.reviewed_at);
    }

    qb.push(" WHERE id = ").push_bind(id);
    push_status_guard(&mut qb, allowed);
    qb.push(format!(" RETURNING {MATERIAL_COLUMNS}"));

    qb.build_query_as::<MaterialRow>()
        .fetch_optional(executor)
        .await
}

/// 공급사의 최신 자료가 초안이면 거절(Rejected) 상태로 바꿉니다. 행은 지우지 않습니다.
///
/// 바뀌었으면 `true`. `false`면 공급사/최신 자료가 없거나 초안이 아닙니다.
pub async fn withdraw_newest_draft<'e, E>(executor: E, cp_id: i64) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!(
        "UPDATE gp_cp_material SET status = ?1, modify_ts = {NOW}
         WHERE id = (SELECT newest_material_id FROM gp_cp WHERE id = ?2)
           AND status = ?3"
    );
    let result = sqlx::query(&query)
        .bind(VersionStatus::Rejected)
        .bind(cp_id)
        .bind(VersionStatus::Draft)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// 이름 필터에 맞는 공급사 수
pub async fn count_providers<'e, E>(executor: E, filter: Option<&str>) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM gp_cp AS c
        WHERE (?1 IS NULL OR c.cp_name LIKE ?1 ESCAPE '\')
        "#,
    )
    .bind(filter.map(like_pattern))
    .fetch_one(executor)
    .await
}

/// 공급사 한 페이지를 최신 자료의 상태와 함께 조회합니다 (최근 수정순).
pub async fn list_providers<'e, E>(
    executor: E,
    filter: Option<&str>,
    page: PageRequest,
) -> Result<Vec<ProviderSummary>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, ProviderSummary>(
        r#"
        SELECT c.id, c.cp_name, c.newest_material_id, c.online_material_id,
               m.status AS newest_status, c.create_ts, c.modify_ts
        FROM gp_cp AS c
        LEFT JOIN gp_cp_material AS m ON c.newest_material_id = m.id
        WHERE (?1 IS NULL OR c.cp_name LIKE ?1 ESCAPE '\')
        ORDER BY c.modify_ts DESC, c.id DESC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(filter.map(like_pattern))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(executor)
    .await
}
