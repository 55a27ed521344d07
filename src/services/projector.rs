//! # 상세/목록 조회 (Projector)
//!
//! 읽기 전용입니다. 한 번의 조회는 읽기 트랜잭션 하나 안에서 일어나므로,
//! 부모 행과 버전 행이 서로 다른 시점의 값으로 섞이지 않습니다.

use super::{run_operation, DEFAULT_DEADLINE};
use crate::db::{games, providers};
use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;
use std::time::Duration;

#[derive(Clone)]
pub struct Projector {
    pool: SqlitePool,
    deadline: Duration,
}

impl Projector {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// 공급사 + 최신 자료 + 게시 중인 자료.
    /// 자료 행이 사라졌으면 그 항목만 비웁니다.
    pub async fn provider_detail(&self, cp_id: i64) -> Result<ProviderDetail, AppError> {
        run_operation(
            "provider_detail",
            cp_id,
            self.deadline,
            self.provider_detail_tx(cp_id),
        )
        .await
    }

    async fn provider_detail_tx(&self, cp_id: i64) -> Result<ProviderDetail, AppError> {
        let mut tx = self.pool.begin().await?;
        let provider = providers::get_provider(&mut *tx, cp_id)
            .await?
            .ok_or(AppError::NotFound {
                entity: "provider",
                id: cp_id,
            })?;

        let newest = match provider.newest_material_id {
            Some(id) => providers::get_material(&mut *tx, id).await?,
            None => None,
        };
        let online = match provider.online_material_id {
            Some(id) if newest.as_ref().is_some_and(|row| row.id == id) => newest.clone(),
            Some(id) => providers::get_material(&mut *tx, id).await?,
            None => None,
        };
        tx.commit().await?;

        Ok(ProviderDetail {
            provider,
            newest_material: newest.map(Material::try_from).transpose()?,
            online_material: online.map(Material::try_from).transpose()?,
        })
    }

    /// 이름 필터에 맞는 공급사 한 페이지와 전체 개수
    pub async fn list_providers(
        &self,
        filter: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<ProviderSummary>, AppError> {
        run_operation("list_providers", 0, self.deadline, async {
            let mut tx = self.pool.begin().await?;
            let total = providers::count_providers(&mut *tx, filter).await?;
            let items = if total == 0 {
                Vec::new()
            } else {
                providers::list_providers(&mut *tx, filter, page).await?
            };
            tx.commit().await?;
            Ok::<_, AppError>(Page {
                items,
                total,
                page: page.page,
                page_size: page.page_size,
            })
        })
        .await
    }

    /// 게임 + 최신 버전 + 게시 중인 버전.
    /// 두 포인터가 같은 버전을 가리키면 한 번만 읽습니다.
    pub async fn game_detail(&self, game_id: i64) -> Result<GameDetail, AppError> {
        run_operation(
            "game_detail",
            game_id,
            self.deadline,
            self.game_detail_tx(game_id),
        )
        .await
    }

    async fn game_detail_tx(&self, game_id: i64) -> Result<GameDetail, AppError> {
        let mut tx = self.pool.begin().await?;
        let game = games::get_game(&mut *tx, game_id)
            .await?
            .ok_or(AppError::NotFound {
                entity: "game",
                id: game_id,
            })?;

        let newest = match game.newest_game_version_id {
            Some(id) => games::get_version(&mut *tx, id).await?,
            None => None,
        };
        let online = match game.online_game_version_id {
            Some(id) if newest.as_ref().is_some_and(|row| row.id == id) => newest.clone(),
            Some(id) => games::get_version(&mut *tx, id).await?,
            None => None,
        };
        tx.commit().await?;

        Ok(GameDetail {
            game,
            newest_version: newest.map(GameVersion::try_from).transpose()?,
            online_version: online.map(GameVersion::try_from).transpose()?,
        })
    }

    pub async fn list_games(
        &self,
        filter: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<GameSummary>, AppError> {
        run_operation("list_games", 0, self.deadline, async {
            let mut tx = self.pool.begin().await?;
            let total = games::count_games(&mut *tx, filter).await?;
            let items = if total == 0 {
                Vec::new()
            } else {
                games::list_games(&mut *tx, filter, page).await?
            };
            tx.commit().await?;
            Ok::<_, AppError>(Page {
                items,
                total,
                page: page.page,
                page_size: page.page_size,
            })
        })
        .await
    }
}
