//! # 게임 워크플로
//!
//! 게임 버전의 Create-or-Attach, Update-Draft, Review, Delete-Draft.
//! 공급사 워크플로와 달리, 생성인지 추가인지는 호출자가 경로로 정합니다
//! (`create_game`은 `game_id`가 0이어야 하고, `attach_version`은 게임이 있어야 합니다).

use super::ids::IdGenerator;
use super::{missed_update, run_operation, DEFAULT_DEADLINE};
use crate::db::games::{self, GameVersionPatch};
use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct GameWorkflow {
    pool: SqlitePool,
    ids: Arc<dyn IdGenerator>,
    deadline: Duration,
}

impl GameWorkflow {
    pub fn new(pool: SqlitePool, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            pool,
            ids,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// 새 게임과 첫 버전을 한 트랜잭션에서 만듭니다.
    ///
    /// 게임의 이름/아이콘/헤더 이미지는 첫 버전에서 복사됩니다.
    pub async fn create_game(&self, req: &SaveGameRequest) -> Result<SavedIds, AppError> {
        if req.game_id != 0 {
            return Err(AppError::Validation(
                "GameID must be 0 when creating".to_string(),
            ));
        }
        if req.cp_id <= 0 {
            return Err(AppError::Validation("cp_id is required".to_string()));
        }
        req.version.validate()?;
        let fields = GameVersionFields::encode(&req.version)?;
        let game_id = self.ids.next_id();
        let version_id = self.ids.next_id();
        let status = req.submit_mode.target_status();

        run_operation(
            "create_game",
            game_id,
            self.deadline,
            self.create_game_tx(game_id, version_id, req.cp_id, &fields, status),
        )
        .await?;

        tracing::info!(
            game_id,
            version_id,
            cp_id = req.cp_id,
            status = status.as_str(),
            "game created"
        );
        Ok(SavedIds {
            parent_id: game_id,
            version_id,
        })
    }

    async fn create_game_tx(
        &self,
        game_id: i64,
        version_id: i64,
        cp_id: i64,
        fields: &GameVersionFields,
        status: VersionStatus,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        games::insert_game(&mut *tx, game_id, cp_id, fields, version_id).await?;
        games::insert_version(&mut *tx, version_id, game_id, fields, status).await?;
        tx.commit().await?;
        Ok(())
    }

    /// 기존 게임에 새 버전을 붙이고 최신 버전 포인터를 옮깁니다.
    ///
    /// 이전 최신 버전 행은 그대로 남습니다.
    pub async fn attach_version(
        &self,
        game_id: i64,
        req: &SaveGameRequest,
    ) -> Result<SavedIds, AppError> {
        if game_id <= 0 {
            return Err(AppError::Validation("game_id is required".to_string()));
        }
        if req.game_id != 0 && req.game_id != game_id {
            return Err(AppError::Validation(format!(
                "game_id {} in body does not match game {game_id}",
                req.game_id
            )));
        }
        req.version.validate()?;
        let fields = GameVersionFields::encode(&req.version)?;
        let version_id = self.ids.next_id();
        let status = req.submit_mode.target_status();

        run_operation(
            "attach_game_version",
            game_id,
            self.deadline,
            self.attach_version_tx(game_id, version_id, &fields, status),
        )
        .await?;

        tracing::info!(
            game_id,
            version_id,
            status = status.as_str(),
            "game version attached"
        );
        Ok(SavedIds {
            parent_id: game_id,
            version_id,
        })
    }

    async fn attach_version_tx(
        &self,
        game_id: i64,
        version_id: i64,
        fields: &GameVersionFields,
        status: VersionStatus,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        if games::set_newest_version(&mut *tx, game_id, version_id).await? == 0 {
            return Err(AppError::NotFound {
                entity: "game",
                id: game_id,
            });
        }
        games::insert_version(&mut *tx, version_id, game_id, fields, status).await?;
        tx.commit().await?;
        Ok(())
    }

    /// 초안(또는 거절된) 게임 버전을 같은 행에서 고칩니다.
    pub async fn update_draft(
        &self,
        version_id: i64,
        req: &UpdateGameDraftRequest,
    ) -> Result<(), AppError> {
        if version_id <= 0 {
            return Err(AppError::Validation(
                "game_version_id is required".to_string(),
            ));
        }
        let status = SubmitMode::required(req.submit_mode)?.target_status();
        req.version.validate()?;
        let fields = GameVersionFields::encode(&req.version)?;

        run_operation(
            "update_game_draft",
            version_id,
            self.deadline,
            self.update_draft_tx(version_id, &fields, status),
        )
        .await?;

        tracing::info!(version_id, status = status.as_str(), "game version updated");
        Ok(())
    }

    async fn update_draft_tx(
        &self,
        version_id: i64,
        fields: &GameVersionFields,
        status: VersionStatus,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let patch = GameVersionPatch {
            fields: Some(fields),
            status: Some(status),
            review: None,
        };
        let allowed = VersionStatus::sources_of(VersionStatus::EDIT_TARGETS);
        let updated = games::update_version(&mut *tx, version_id, None, &allowed, &patch).await?;
        if updated.is_none() {
            let current = games::get_version(&mut *tx, version_id).await?;
            return Err(missed_update(
                "game version",
                version_id,
                current.map(|row| row.status),
                VersionStatus::EDIT_TARGETS,
            ));
        }
        tx.commit().await?;
        Ok(())
    }

    /// 심사 중인 게임 버전을 게시하거나 거절합니다.
    ///
    /// 버전은 `game_id` 게임에 속해야 합니다. 게시(Pass)면 게시 포인터를 옮기고
    /// 게임의 이름/아이콘/헤더 이미지를 게시된 버전 값으로 새로 고칩니다.
    pub async fn review_version(&self, req: &ReviewGameRequest) -> Result<(), AppError> {
        if req.game_id <= 0 || req.game_version_id <= 0 {
            return Err(AppError::Validation(
                "game_id and game_version_id are required".to_string(),
            ));
        }
        req.review.validate()?;
        let stamp = req.review.stamp(chrono::Utc::now().timestamp());
        let decision = req.review.decision;

        run_operation(
            "review_game_version",
            req.game_version_id,
            self.deadline,
            self.review_version_tx(req.game_id, req.game_version_id, decision, &stamp),
        )
        .await?;

        tracing::info!(
            game_id = req.game_id,
            version_id = req.game_version_id,
            ?decision,
            operator = %stamp.operator,
            "game version reviewed"
        );
        Ok(())
    }

    async fn review_version_tx(
        &self,
        game_id: i64,
        version_id: i64,
        decision: ReviewDecision,
        stamp: &ReviewStamp,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let patch = GameVersionPatch {
            fields: None,
            status: Some(decision.target_status()),
            review: Some(stamp),
        };
        let allowed = VersionStatus::sources_of(VersionStatus::REVIEW_TARGETS);
        let Some(row) =
            games::update_version(&mut *tx, version_id, Some(game_id), &allowed, &patch).await?
        else {
            // 다른 게임의 버전은 없는 것으로 봅니다.
            let current = games::get_version(&mut *tx, version_id)
                .await?
                .filter(|row| row.game_id == game_id);
            return Err(missed_update(
                "game version",
                version_id,
                current.map(|row| row.status),
                VersionStatus::REVIEW_TARGETS,
            ));
        };

        if decision == ReviewDecision::Pass
            && games::set_online_version(&mut *tx, game_id, &row).await? == 0
        {
            return Err(AppError::NotFound {
                entity: "game",
                id: game_id,
            });
        }
        tx.commit().await?;
        Ok(())
    }

    /// 게임의 최신 버전이 초안이면 거절 상태로 돌립니다.
    pub async fn delete_draft(&self, game_id: i64) -> Result<(), AppError> {
        if game_id <= 0 {
            return Err(AppError::Validation("game_id is required".to_string()));
        }
        run_operation(
            "delete_game_draft",
            game_id,
            self.deadline,
            self.delete_draft_tx(game_id),
        )
        .await?;

        tracing::info!(game_id, "draft game version withdrawn");
        Ok(())
    }

    async fn delete_draft_tx(&self, game_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        if !games::withdraw_newest_draft(&mut *tx, game_id).await? {
            return Err(explain_missed_withdraw(&mut *tx, game_id).await?);
        }
        tx.commit().await?;
        Ok(())
    }
}

async fn explain_missed_withdraw(
    conn: &mut SqliteConnection,
    game_id: i64,
) -> Result<AppError, AppError> {
    let Some(game) = games::get_game(&mut *conn, game_id).await? else {
        return Ok(AppError::NotFound {
            entity: "game",
            id: game_id,
        });
    };
    let Some(newest_id) = game.newest_game_version_id else {
        return Ok(AppError::NotFound {
            entity: "newest version of game",
            id: game_id,
        });
    };
    Ok(match games::get_version(&mut *conn, newest_id).await? {
        None => AppError::NotFound {
            entity: "game version",
            id: newest_id,
        },
        Some(_) => AppError::NotDraft {
            entity: "game",
            parent_id: game_id,
        },
    })
}
