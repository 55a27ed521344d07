use super::ReviewDecision;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Create-or-Attach 결과: 부모 ID와 새 버전 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavedIds {
    pub parent_id: i64,
    pub version_id: i64,
}

/// 심사 요청에서 두 도메인이 공유하는 부분
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub decision: ReviewDecision,
    /// 심사자
    #[serde(default)]
    pub operator: String,
    /// 심사 의견
    #[serde(default)]
    pub remark: String,
}

impl ReviewInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.operator.trim().is_empty() {
            return Err(AppError::Validation("operator is required".to_string()));
        }
        Ok(())
    }

    pub fn stamp(&self, reviewed_at: i64) -> ReviewStamp {
        ReviewStamp {
            operator: self.operator.trim().to_string(),
            comment: self.remark.clone(),
            reviewed_at,
        }
    }
}

/// 심사 결과로 버전 행에 기록되는 값들 (Review 작업만 설정합니다)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewStamp {
    pub operator: String,
    pub comment: String,
    /// 유닉스 초
    pub reviewed_at: i64,
}
