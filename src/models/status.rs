//! # 버전 상태 머신
//!
//! 자격 자료(material)와 게임 버전(game version)은 같은 모양의 상태 머신을 공유합니다.
//!
//! ```text
//! Unset → Draft → Reviewing → { Published, Rejected }
//!           ↺ (Update-Draft)
//! Rejected → Draft | Reviewing   (Update-Draft로 재작업)
//! ```
//!
//! 상태 값은 DB에 INTEGER로 저장됩니다 (0=Unset … 4=Rejected).

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// 버전 행의 상태
///
/// `#[repr(i32)]` + `sqlx::Type`: 판별값(discriminant)을 그대로 INTEGER 컬럼에 읽고 씁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum VersionStatus {
    Unset = 0,
    Draft = 1,
    Reviewing = 2,
    Published = 3,
    Rejected = 4,
}

impl VersionStatus {
    /// 버전 행에 실제로 저장되는 상태들 (Unset은 생성 전의 상태일 뿐입니다)
    const STORED: [VersionStatus; 4] = [
        Self::Draft,
        Self::Reviewing,
        Self::Published,
        Self::Rejected,
    ];

    /// Update-Draft가 만들어 내는 상태들
    pub const EDIT_TARGETS: &'static [VersionStatus] = &[Self::Draft, Self::Reviewing];

    /// Review가 만들어 내는 상태들
    pub const REVIEW_TARGETS: &'static [VersionStatus] = &[Self::Published, Self::Rejected];

    /// 한 버전 행 안에서 허용되는 상태 전이 표
    pub fn can_transition_to(self, next: VersionStatus) -> bool {
        use VersionStatus::*;
        matches!(
            (self, next),
            (Unset, Draft)
                | (Unset, Reviewing)
                | (Draft, Draft)
                | (Draft, Reviewing)
                | (Draft, Rejected)
                | (Reviewing, Published)
                | (Reviewing, Rejected)
                | (Rejected, Draft)
                | (Rejected, Reviewing)
        )
    }

    /// 전이를 검사하고, 허용되지 않으면 상태 충돌(Conflict) 에러를 돌려줍니다.
    pub fn transition(self, next: VersionStatus) -> Result<VersionStatus, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::Conflict(format!(
                "cannot move from {} to {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }

    /// `targets` 전부로 옮겨 갈 수 있는지 검사합니다. 처음 막힌 전이가 에러가 됩니다.
    pub fn ensure_can_reach(self, targets: &[VersionStatus]) -> Result<(), AppError> {
        targets
            .iter()
            .try_for_each(|&next| self.transition(next).map(|_| ()))
    }

    /// `targets` 전부로 옮겨 갈 수 있는 저장 상태들.
    ///
    /// 조건부 갱신의 `status IN (...)` 가드가 이 목록에서 만들어집니다.
    pub fn sources_of(targets: &[VersionStatus]) -> Vec<VersionStatus> {
        Self::STORED
            .into_iter()
            .filter(|from| targets.iter().all(|&next| from.can_transition_to(next)))
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Draft => "draft",
            Self::Reviewing => "reviewing",
            Self::Published => "published",
            Self::Rejected => "rejected",
        }
    }
}

/// 제출 방식: 초안으로 저장할지, 바로 심사에 올릴지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
    #[default]
    Draft,
    Review,
}

impl SubmitMode {
    /// 수정 경로에서는 제출 방식을 생략할 수 없습니다.
    pub fn required(mode: Option<SubmitMode>) -> Result<SubmitMode, AppError> {
        mode.ok_or_else(|| AppError::Validation("submit_mode is required".to_string()))
    }

    /// 제출 방식이 만들어 내는 버전 상태
    pub fn target_status(self) -> VersionStatus {
        match self {
            Self::Draft => VersionStatus::Draft,
            Self::Review => VersionStatus::Reviewing,
        }
    }
}

/// 심사 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Pass,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(self) -> VersionStatus {
        match self {
            Self::Pass => VersionStatus::Published,
            Self::Reject => VersionStatus::Rejected,
        }
    }
}
