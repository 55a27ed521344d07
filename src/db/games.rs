//! # 게임 / 게임 버전 쿼리 모듈
//!
//! `gp_game`(부모)와 `gp_game_version`(버전) 테이블에 대한 쿼리 함수들입니다.

use super::{like_pattern, push_status_guard, NOW};
use crate::models::*;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

const GAME_COLUMNS: &str = "id, cp_id, game_name, game_icon, header_image, \
    newest_game_version_id, online_game_version_id, create_ts, modify_ts";

const VERSION_COLUMNS: &str = "id, game_id, game_name, game_icon, header_image, \
    game_introduction, game_introduction_images, platform, package_name, download_url, \
    status, review_time, operator, review_comment, create_ts, modify_ts";

/// 게임 버전 행의 부분 갱신 내용. `None`인 항목은 건드리지 않습니다.
#[derive(Debug, Default)]
pub struct GameVersionPatch<'a> {
    pub fields: Option<&'a GameVersionFields>,
    pub status: Option<VersionStatus>,
    pub review: Option<&'a ReviewStamp>,
}

pub async fn get_game<'e, E>(executor: E, id: i64) -> Result<Option<Game>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!("SELECT {GAME_COLUMNS} FROM gp_game WHERE id = ?");
    sqlx::query_as::<_, Game>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// 새 게임 행을 삽입합니다. 표시용 필드는 첫 버전에서 복사합니다.
pub async fn insert_game<'e, E>(
    executor: E,
    id: i64,
    cp_id: i64,
    fields: &GameVersionFields,
    newest_version_id: i64,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO gp_game (id, cp_id, game_name, game_icon, header_image, newest_game_version_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(cp_id)
    .bind(&fields.game_name)
    .bind(&fields.game_icon)
    .bind(&fields.header_image)
    .bind(newest_version_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// 최신 버전 포인터만 옮깁니다. 갱신된 행 수를 돌려줍니다 (0이면 게임이 없음).
pub async fn set_newest_version<'e, E>(
    executor: E,
    game_id: i64,
    version_id: i64,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!(
        "UPDATE gp_game SET newest_game_version_id = ?, modify_ts = {NOW} WHERE id = ?"
    );
    let result = sqlx::query(&query)
        .bind(version_id)
        .bind(game_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// 게시 포인터를 옮기고, 게시된 버전의 이름/아이콘/헤더 이미지로 캐시를 새로 고칩니다.
pub async fn set_online_version<'e, E>(
    executor: E,
    game_id: i64,
    version: &GameVersionRow,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!(
        "UPDATE gp_game SET
             online_game_version_id = ?, game_name = ?, game_icon = ?, header_image = ?,
             modify_ts = {NOW}
         WHERE id = ?"
    );
    let result = sqlx::query(&query)
        .bind(version.id)
        .bind(&version.game_name)
        .bind(&version.game_icon)
        .bind(&version.header_image)
        .bind(game_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn get_version<'e, E>(executor: E, id: i64) -> Result<Option<GameVersionRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!("SELECT {VERSION_COLUMNS} FROM gp_game_version WHERE id = ?");
    sqlx::query_as::<_, GameVersionRow>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn insert_version<'e, E>(
    executor: E,
    id: i64,
    game_id: i64,
    fields: &GameVersionFields,
    status: VersionStatus,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO gp_game_version
            (id, game_id, game_name, game_icon, header_image, game_introduction,
             game_introduction_images, platform, package_name, download_url, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(game_id)
    .bind(&fields.game_name)
    .bind(&fields.game_icon)
    .bind(&fields.header_image)
    .bind(&fields.game_introduction)
    .bind(&fields.game_introduction_images)
    .bind(&fields.platform)
    .bind(&fields.package_name)
    .bind(&fields.download_url)
    .bind(status)
    .execute(executor)
    .await?;
    Ok(())
}

/// 게임 버전 행을 부분 갱신합니다 (상태 조건부).
///
/// `game_id`가 주어지면 그 게임에 속한 버전만 갱신합니다.
/// `None`이면 행이 없거나, 다른 게임의 버전이거나, 상태 조건에 걸린 것입니다.
pub async fn update_version<'e, E>(
    executor: E,
    id: i64,
    game_id: Option<i64>,
    allowed: &[VersionStatus],
    patch: &GameVersionPatch<'_>,
) -> Result<Option<GameVersionRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let mut qb =
        QueryBuilder::<Sqlite>::new(format!("UPDATE gp_game_version SET modify_ts = {NOW}"));

    if let Some(fields) = patch.fields {
        qb.push(", game_name = ").push_bind(fields.game_name.as_str());
        qb.push(", game_icon = ").push_bind(fields.game_icon.as_str());
        qb.push(", header_image = ").push_bind(fields.header_image.as_str());
        qb.push(", game_introduction = ")
            .push_bind(fields.game_introduction.as_str());
        qb.push(", game_introduction_images = ")
            .push_bind(fields.game_introduction_images.as_str());
        qb.push(", platform = ").push_bind(fields.platform.as_str());
        qb.push(", package_name = ").push_bind(fields.package_name.as_str());
        qb.push(", download_url = ").push_bind(fields.download_url.as_str());
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
    if let Some(game_id) = game_id {
        qb.push(" AND game_id = ").push_bind(game_id);
    }
    push_status_guard(&mut qb, allowed);
    qb.push(format!(" RETURNING {VERSION_COLUMNS}"));

    qb.build_query_as::<GameVersionRow>()
        .fetch_optional(executor)
        .await
}

/// 게임의 최신 버전이 초안이면 거절(Rejected) 상태로 바꿉니다 (소프트 삭제).
pub async fn withdraw_newest_draft<'e, E>(executor: E, game_id: i64) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let query = format!(
        "UPDATE gp_game_version SET status = ?1, modify_ts = {NOW}
         WHERE id = (SELECT newest_game_version_id FROM gp_game WHERE id = ?2)
           AND status = ?3"
    );
    let result = sqlx::query(&query)
        .bind(VersionStatus::Rejected)
        .bind(game_id)
        .bind(VersionStatus::Draft)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_games<'e, E>(executor: E, filter: Option<&str>) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM gp_game AS g
        WHERE (?1 IS NULL OR g.game_name LIKE ?1 ESCAPE '\')
        "#,
    )
    .bind(filter.map(like_pattern))
    .fetch_one(executor)
    .await
}

/// 게임 한 페이지를 최신 버전의 상태와 함께 조회합니다 (최근 수정순).
pub async fn list_games<'e, E>(
    executor: E,
    filter: Option<&str>,
    page: PageRequest,
) -> Result<Vec<GameSummary>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, GameSummary>(
        r#"
        SELECT g.id, g.cp_id, g.game_name, g.game_icon, g.header_image,
               gv.status AS newest_status, g.create_ts, g.modify_ts
        FROM gp_game AS g
        LEFT JOIN gp_game_version AS gv ON g.newest_game_version_id = gv.id
        WHERE (?1 IS NULL OR g.game_name LIKE ?1 ESCAPE '\')
        ORDER BY g.modify_ts DESC, g.id DESC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(filter.map(like_pattern))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(executor)
    .await
}
