//! # 공급사 워크플로
//!
//! 자격 자료의 Create-or-Attach, Update-Draft, Review, Delete-Draft.
//! 작업마다 트랜잭션 하나를 열고, 모든 쓰기가 함께 커밋되거나 함께 롤백됩니다.
//! 에러로 일찍 반환하면 `sqlx::Transaction`이 drop되면서 롤백됩니다.

use super::ids::IdGenerator;
use super::{missed_update, run_operation, DEFAULT_DEADLINE};
use crate::db::providers::{self, MaterialPatch};
use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ProviderWorkflow {
    pool: SqlitePool,
    ids: Arc<dyn IdGenerator>,
    deadline: Duration,
}

impl ProviderWorkflow {
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

    /// 자격 자료를 새로 만들고 공급사의 최신 자료로 지정합니다.
    ///
    /// 공급사가 없으면 같은 트랜잭션 안에서 만들어집니다 (upsert 한 문장).
    pub async fn create_material(&self, req: &CreateMaterialRequest) -> Result<SavedIds, AppError> {
        req.validate()?;
        let fields = MaterialFields::encode(&req.material)?;
        let material_id = self.ids.next_id();
        let status = req.submit_mode.target_status();

        run_operation(
            "create_material",
            req.cp_id,
            self.deadline,
            self.insert_material_tx(req.cp_id, material_id, &fields, status),
        )
        .await?;

        tracing::info!(
            cp_id = req.cp_id,
            material_id,
            status = status.as_str(),
            "material created"
        );
        Ok(SavedIds {
            parent_id: req.cp_id,
            version_id: material_id,
        })
    }

    async fn insert_material_tx(
        &self,
        cp_id: i64,
        material_id: i64,
        fields: &MaterialFields,
        status: VersionStatus,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        providers::upsert_provider(&mut *tx, cp_id, &fields.cp_name, material_id).await?;
        providers::insert_material(&mut *tx, material_id, cp_id, fields, status).await?;
        tx.commit().await?;
        Ok(())
    }

    /// 초안(또는 거절된) 자료를 같은 행에서 고칩니다. 새 행은 만들지 않습니다.
    pub async fn update_material(
        &self,
        material_id: i64,
        req: &UpdateMaterialRequest,
    ) -> Result<(), AppError> {
        if material_id <= 0 {
            return Err(AppError::Validation("material_id is required".to_string()));
        }
        let status = SubmitMode::required(req.submit_mode)?.target_status();
        req.material.validate()?;
        let fields = MaterialFields::encode(&req.material)?;

        run_operation(
            "update_material",
            material_id,
            self.deadline,
            self.update_material_tx(material_id, &fields, status),
        )
        .await?;

        tracing::info!(material_id, status = status.as_str(), "material updated");
        Ok(())
    }

    async fn update_material_tx(
        &self,
        material_id: i64,
        fields: &MaterialFields,
        status: VersionStatus,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let patch = MaterialPatch {
            fields: Some(fields),
            status: Some(status),
            review: None,
        };
        let allowed = VersionStatus::sources_of(VersionStatus::EDIT_TARGETS);
        let updated = providers::update_material(&mut *tx, material_id, &allowed, &patch).await?;
        if updated.is_none() {
            let current = providers::get_material(&mut *tx, material_id).await?;
            return Err(missed_update(
                "material",
                material_id,
                current.map(|row| row.status),
                VersionStatus::EDIT_TARGETS,
            ));
        }
        tx.commit().await?;
        Ok(())
    }

    /// 심사 중인 자료를 게시하거나 거절합니다.
    ///
    /// 게시(Pass)면 같은 트랜잭션에서 공급사의 게시 포인터와 이름을 이 자료로 옮깁니다.
    pub async fn review_material(&self, req: &ReviewMaterialRequest) -> Result<(), AppError> {
        if req.material_id <= 0 {
            return Err(AppError::Validation("material_id is required".to_string()));
        }
        req.review.validate()?;
        let stamp = req.review.stamp(chrono::Utc::now().timestamp());
        let decision = req.review.decision;

        let cp_id = run_operation(
            "review_material",
            req.material_id,
            self.deadline,
            self.review_material_tx(req.material_id, decision, &stamp),
        )
        .await?;

        tracing::info!(
            cp_id,
            material_id = req.material_id,
            ?decision,
            operator = %stamp.operator,
            "material reviewed"
        );
        Ok(())
    }

    async fn review_material_tx(
        &self,
        material_id: i64,
        decision: ReviewDecision,
        stamp: &ReviewStamp,
    ) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;
        let patch = MaterialPatch {
            fields: None,
            status: Some(decision.target_status()),
            review: Some(stamp),
        };
        let allowed = VersionStatus::sources_of(VersionStatus::REVIEW_TARGETS);
        let Some(row) = providers::update_material(&mut *tx, material_id, &allowed, &patch).await?
        else {
            let current = providers::get_material(&mut *tx, material_id).await?;
            return Err(missed_update(
                "material",
                material_id,
                current.map(|row| row.status),
                VersionStatus::REVIEW_TARGETS,
            ));
        };

        if decision == ReviewDecision::Pass {
            let moved =
                providers::set_online_material(&mut *tx, row.cp_id, row.id, &row.cp_name).await?;
            if moved == 0 {
                return Err(AppError::NotFound {
                    entity: "provider",
                    id: row.cp_id,
                });
            }
        }
        tx.commit().await?;
        Ok(row.cp_id)
    }

    /// 공급사의 최신 자료가 초안이면 거절 상태로 돌립니다. 행은 지우지 않습니다.
    pub async fn delete_draft(&self, cp_id: i64) -> Result<(), AppError> {
        if cp_id <= 0 {
            return Err(AppError::Validation("cp_id is required".to_string()));
        }
        run_operation(
            "delete_material_draft",
            cp_id,
            self.deadline,
            self.delete_draft_tx(cp_id),
        )
        .await?;

        tracing::info!(cp_id, "draft material withdrawn");
        Ok(())
    }

    async fn delete_draft_tx(&self, cp_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        if !providers::withdraw_newest_draft(&mut *tx, cp_id).await? {
            return Err(explain_missed_withdraw(&mut *tx, cp_id).await?);
        }
        tx.commit().await?;
        Ok(())
    }
}

/// 철회가 0행이었던 이유: 공급사 없음 / 최신 자료 없음 / 초안 아님
async fn explain_missed_withdraw(
    conn: &mut SqliteConnection,
    cp_id: i64,
) -> Result<AppError, AppError> {
    let Some(provider) = providers::get_provider(&mut *conn, cp_id).await? else {
        return Ok(AppError::NotFound {
            entity: "provider",
            id: cp_id,
        });
    };
    let Some(newest_id) = provider.newest_material_id else {
        return Ok(AppError::NotFound {
            entity: "newest material of provider",
            id: cp_id,
        });
    };
    Ok(match providers::get_material(&mut *conn, newest_id).await? {
        None => AppError::NotFound {
            entity: "material",
            id: newest_id,
        },
        Some(_) => AppError::NotDraft {
            entity: "provider",
            parent_id: cp_id,
        },
    })
}
