//! 공급사 워크플로 통합 테스트
//!
//! 실제 SQLite 데이터베이스에 대해 `ProviderWorkflow`를 검증합니다:
//! - Create-or-Attach: 부모 upsert + 자료 삽입이 한 트랜잭션
//! - Update-Draft: 같은 행을 고치며, 심사 중/게시된 자료는 충돌
//! - Review: 게시 시 게시 포인터와 공급사 이름 갱신
//! - Delete-Draft: 초안만 거절 상태로 철회

mod common;

use assert_matches::assert_matches;
use common::*;
use launchpad::db::providers;
use launchpad::error::{AppError, ErrorClass};
use launchpad::models::*;
use launchpad::services::ProviderWorkflow;
use sqlx::SqlitePool;
use std::time::Duration;

async fn material_row(pool: &SqlitePool, id: i64) -> MaterialRow {
    providers::get_material(pool, id).await.unwrap().unwrap()
}

async fn provider_row(pool: &SqlitePool, cp_id: i64) -> Provider {
    providers::get_provider(pool, cp_id).await.unwrap().unwrap()
}

/// 자료를 만들고 심사 중 상태까지 올립니다.
async fn reviewing_material(workflow: &ProviderWorkflow, cp_id: i64, cp_name: &str) -> SavedIds {
    workflow
        .create_material(&create_material(cp_id, cp_name, SubmitMode::Review))
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Create-or-Attach
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn review_submission_for_new_provider_creates_parent(pool: SqlitePool) {
    let saved = provider_workflow(&pool)
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Review))
        .await
        .unwrap();

    assert_eq!(saved.parent_id, 1001);
    let provider = provider_row(&pool, 1001).await;
    assert_eq!(provider.newest_material_id, Some(saved.version_id));
    assert_eq!(provider.online_material_id, None);
    assert_eq!(provider.cp_name, "Star Studio");
    assert_eq!(provider.verify_status, 0);

    let row = material_row(&pool, saved.version_id).await;
    assert_eq!(row.cp_id, 1001);
    assert_eq!(row.status, VersionStatus::Reviewing);
}

#[sqlx::test(migrations = "./migrations")]
async fn attaching_moves_newest_pointer_and_keeps_old_row(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let first = workflow
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Draft))
        .await
        .unwrap();
    let second = workflow
        .create_material(&create_material(1001, "Star Studio Global", SubmitMode::Draft))
        .await
        .unwrap();

    assert_ne!(first.version_id, second.version_id);
    let provider = provider_row(&pool, 1001).await;
    assert_eq!(provider.newest_material_id, Some(second.version_id));
    assert_eq!(provider.cp_name, "Star Studio Global");

    // 이전 초안은 지워지지 않습니다.
    assert_eq!(material_row(&pool, first.version_id).await.status, VersionStatus::Draft);
    assert_eq!(count_rows(&pool, "gp_cp").await, 1);
    assert_eq!(count_rows(&pool, "gp_cp_material").await, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_first_submissions_create_one_provider(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let a = create_material(2002, "Twin Games", SubmitMode::Draft);
    let b = create_material(2002, "Twin Games", SubmitMode::Review);

    let (left, right) = tokio::join!(workflow.create_material(&a), workflow.create_material(&b));
    let (left, right) = (left.unwrap(), right.unwrap());

    assert_eq!(count_rows(&pool, "gp_cp").await, 1);
    assert_eq!(count_rows(&pool, "gp_cp_material").await, 2);

    let newest = provider_row(&pool, 2002).await.newest_material_id.unwrap();
    assert!(newest == left.version_id || newest == right.version_id);
    assert_eq!(material_row(&pool, newest).await.cp_id, 2002);
}

#[sqlx::test(migrations = "./migrations")]
async fn invalid_payload_writes_nothing(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);

    let mut blank_name = create_material(1001, "   ", SubmitMode::Draft);
    assert_matches!(
        workflow.create_material(&blank_name).await,
        Err(AppError::Validation(_))
    );

    blank_name.material.cp_name = "Star Studio".to_string();
    blank_name.material.business_license = String::new();
    assert_matches!(
        workflow.create_material(&blank_name).await,
        Err(AppError::Validation(_))
    );

    let no_provider = create_material(0, "Star Studio", SubmitMode::Draft);
    assert_matches!(
        workflow.create_material(&no_provider).await,
        Err(AppError::Validation(_))
    );

    assert_eq!(count_rows(&pool, "gp_cp").await, 0);
    assert_eq!(count_rows(&pool, "gp_cp_material").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn store_failures_carry_operation_and_id(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    pool.close().await;

    let err = workflow
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Draft))
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::Failed);
    assert_matches!(
        err,
        AppError::Store {
            operation: "create_material",
            id: 1001,
            ..
        }
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn failing_second_statement_rolls_back_parent_upsert(pool: SqlitePool) {
    provider_workflow(&pool)
        .create_material(&create_material(1, "Star Studio", SubmitMode::Draft))
        .await
        .unwrap();

    // 새 ID 발급기는 다시 1부터 시작하므로, 공급사 upsert 뒤의 자료 삽입이 PK 충돌로 실패합니다.
    let err = provider_workflow(&pool)
        .create_material(&create_material(2, "Moon Works", SubmitMode::Draft))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        AppError::Store {
            operation: "create_material",
            id: 2,
            ..
        }
    );
    assert_eq!(count_rows(&pool, "gp_cp").await, 1);
    assert_eq!(count_rows(&pool, "gp_cp_material").await, 1);
    assert!(providers::get_provider(&pool, 2).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn deadline_expiry_rolls_back_and_reports_timeout(pool: SqlitePool) {
    let mut blocker = pool.acquire().await.unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *blocker)
        .await
        .unwrap();

    let workflow = provider_workflow(&pool).with_deadline(Duration::from_millis(200));
    let result = workflow
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Draft))
        .await;

    assert_matches!(
        result,
        Err(AppError::Timeout {
            operation: "create_material"
        })
    );

    sqlx::query("ROLLBACK").execute(&mut *blocker).await.unwrap();
    drop(blocker);

    assert_eq!(count_rows(&pool, "gp_cp").await, 0);
    assert_eq!(count_rows(&pool, "gp_cp_material").await, 0);

    // 잠금이 풀리면 같은 작업이 정상적으로 끝납니다.
    workflow
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Draft))
        .await
        .unwrap();
    assert_eq!(count_rows(&pool, "gp_cp").await, 1);
}

// ---------------------------------------------------------------------------
// Update-Draft
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn update_draft_rewrites_the_same_row(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let saved = workflow
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Draft))
        .await
        .unwrap();

    let mut content = material("Star Studio");
    content.website = "https://star.example.com".to_string();
    content.verification_images = vec![];
    workflow
        .update_material(
            saved.version_id,
            &UpdateMaterialRequest {
                material: content,
                submit_mode: Some(SubmitMode::Draft),
            },
        )
        .await
        .unwrap();

    let row = material_row(&pool, saved.version_id).await;
    assert_eq!(row.status, VersionStatus::Draft);
    assert_eq!(row.website, "https://star.example.com");
    assert_eq!(row.verification_images, "[]");
    assert_eq!(count_rows(&pool, "gp_cp_material").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_can_submit_for_review(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let saved = workflow
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Draft))
        .await
        .unwrap();

    workflow
        .update_material(
            saved.version_id,
            &UpdateMaterialRequest {
                material: material("Star Studio"),
                submit_mode: Some(SubmitMode::Review),
            },
        )
        .await
        .unwrap();

    assert_eq!(
        material_row(&pool, saved.version_id).await.status,
        VersionStatus::Reviewing
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn update_of_reviewing_material_is_conflict_and_unmodified(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let saved = reviewing_material(&workflow, 1001, "Star Studio").await;
    let before = material_row(&pool, saved.version_id).await;

    let result = workflow
        .update_material(
            saved.version_id,
            &UpdateMaterialRequest {
                material: material("Renamed Studio"),
                submit_mode: Some(SubmitMode::Draft),
            },
        )
        .await;

    assert_matches!(result, Err(AppError::Conflict(message)) if message.contains("cannot move from reviewing to draft"));
    let after = material_row(&pool, saved.version_id).await;
    assert_eq!(after.cp_name, before.cp_name);
    assert_eq!(after.status, VersionStatus::Reviewing);
    assert_eq!(after.modify_ts, before.modify_ts);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_of_missing_material_is_not_found(pool: SqlitePool) {
    let result = provider_workflow(&pool)
        .update_material(
            404,
            &UpdateMaterialRequest {
                material: material("Ghost"),
                submit_mode: Some(SubmitMode::Draft),
            },
        )
        .await;
    assert_matches!(result, Err(AppError::NotFound { entity: "material", id: 404 }));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_without_submit_mode_is_rejected_before_writing(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let saved = workflow
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Draft))
        .await
        .unwrap();

    let result = workflow
        .update_material(
            saved.version_id,
            &UpdateMaterialRequest {
                material: material("Renamed Studio"),
                submit_mode: None,
            },
        )
        .await;

    assert_matches!(result, Err(AppError::Validation(message)) if message == "submit_mode is required");
    assert_eq!(material_row(&pool, saved.version_id).await.cp_name, "Star Studio");
}

#[sqlx::test(migrations = "./migrations")]
async fn rejected_material_can_be_reworked(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let saved = reviewing_material(&workflow, 1001, "Star Studio").await;
    workflow
        .review_material(&ReviewMaterialRequest {
            material_id: saved.version_id,
            review: review(ReviewDecision::Reject, "blurry license"),
        })
        .await
        .unwrap();

    workflow
        .update_material(
            saved.version_id,
            &UpdateMaterialRequest {
                material: material("Star Studio"),
                submit_mode: Some(SubmitMode::Review),
            },
        )
        .await
        .unwrap();

    assert_eq!(
        material_row(&pool, saved.version_id).await.status,
        VersionStatus::Reviewing
    );
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn pass_publishes_and_moves_online_pointer(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let saved = reviewing_material(&workflow, 1001, "Star Studio").await;

    workflow
        .review_material(&ReviewMaterialRequest {
            material_id: saved.version_id,
            review: review(ReviewDecision::Pass, "looks good"),
        })
        .await
        .unwrap();

    let row = material_row(&pool, saved.version_id).await;
    assert_eq!(row.status, VersionStatus::Published);
    assert_eq!(row.operator, "reviewer-1");
    assert_eq!(row.review_comment, "looks good");
    assert!(row.review_time > 0);

    let provider = provider_row(&pool, 1001).await;
    assert_eq!(provider.online_material_id, Some(saved.version_id));
    assert_eq!(provider.cp_name, "Star Studio");
    assert_eq!(provider.verify_status, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn reject_keeps_previous_online_material(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let first = reviewing_material(&workflow, 1001, "Star Studio").await;
    workflow
        .review_material(&ReviewMaterialRequest {
            material_id: first.version_id,
            review: review(ReviewDecision::Pass, ""),
        })
        .await
        .unwrap();

    let second = workflow
        .create_material(&create_material(1001, "Star Studio 2", SubmitMode::Review))
        .await
        .unwrap();
    workflow
        .review_material(&ReviewMaterialRequest {
            material_id: second.version_id,
            review: review(ReviewDecision::Reject, "missing info"),
        })
        .await
        .unwrap();

    let row = material_row(&pool, second.version_id).await;
    assert_eq!(row.status, VersionStatus::Rejected);
    assert_eq!(row.review_comment, "missing info");

    let provider = provider_row(&pool, 1001).await;
    assert_eq!(provider.online_material_id, Some(first.version_id));
    assert_eq!(provider.newest_material_id, Some(second.version_id));
}

#[sqlx::test(migrations = "./migrations")]
async fn reviewing_a_draft_or_re_reviewing_is_conflict(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let draft = workflow
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Draft))
        .await
        .unwrap();
    assert_matches!(
        workflow
            .review_material(&ReviewMaterialRequest {
                material_id: draft.version_id,
                review: review(ReviewDecision::Pass, ""),
            })
            .await,
        Err(AppError::Conflict(_))
    );
    assert_eq!(provider_row(&pool, 1001).await.online_material_id, None);

    let reviewing = reviewing_material(&workflow, 1002, "Moon Works").await;
    let pass = ReviewMaterialRequest {
        material_id: reviewing.version_id,
        review: review(ReviewDecision::Pass, ""),
    };
    workflow.review_material(&pass).await.unwrap();
    assert_matches!(
        workflow.review_material(&pass).await,
        Err(AppError::Conflict(_))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn review_requires_operator_and_existing_material(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let mut anonymous = review(ReviewDecision::Pass, "");
    anonymous.operator = " ".to_string();
    assert_matches!(
        workflow
            .review_material(&ReviewMaterialRequest {
                material_id: 1,
                review: anonymous,
            })
            .await,
        Err(AppError::Validation(_))
    );

    assert_matches!(
        workflow
            .review_material(&ReviewMaterialRequest {
                material_id: 999,
                review: review(ReviewDecision::Reject, ""),
            })
            .await,
        Err(AppError::NotFound { entity: "material", id: 999 })
    );
}

// ---------------------------------------------------------------------------
// Delete-Draft
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_draft_soft_withdraws_newest_draft(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let saved = workflow
        .create_material(&create_material(1001, "Star Studio", SubmitMode::Draft))
        .await
        .unwrap();

    workflow.delete_draft(1001).await.unwrap();

    assert_eq!(
        material_row(&pool, saved.version_id).await.status,
        VersionStatus::Rejected
    );
    assert_eq!(count_rows(&pool, "gp_cp_material").await, 1);
    assert_eq!(
        provider_row(&pool, 1001).await.newest_material_id,
        Some(saved.version_id)
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_draft_of_reviewing_material_is_not_a_draft(pool: SqlitePool) {
    let workflow = provider_workflow(&pool);
    let saved = reviewing_material(&workflow, 1001, "Star Studio").await;

    assert_matches!(
        workflow.delete_draft(1001).await,
        Err(AppError::NotDraft { parent_id: 1001, .. })
    );
    assert_eq!(
        material_row(&pool, saved.version_id).await.status,
        VersionStatus::Reviewing
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_draft_of_unknown_provider_is_not_found(pool: SqlitePool) {
    assert_matches!(
        provider_workflow(&pool).delete_draft(7777).await,
        Err(AppError::NotFound { entity: "provider", id: 7777 })
    );
}
