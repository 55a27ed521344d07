use super::{SubmitMode, VersionStatus};
use crate::error::AppError;
use crate::services::codec;
use serde::{Deserialize, Serialize};

/// 공급사(CP) 부모 행: `gp_cp`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Provider {
    pub id: i64,
    /// 최신 자격 자료의 이름을 복사해 둔 읽기용 캐시
    pub cp_name: String,
    pub newest_material_id: Option<i64>,
    pub online_material_id: Option<i64>,
    /// 0 = 미인증, 1 = 인증됨 (자료가 한 번이라도 게시되면 1)
    pub verify_status: i64,
    pub create_ts: String,
    pub modify_ts: String,
}

/// 자격 자료 버전 행: `gp_cp_material`. 목록 필드는 JSON 텍스트 그대로입니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MaterialRow {
    pub id: i64,
    pub cp_id: i64,
    pub cp_icon: String,
    pub cp_name: String,
    pub verification_images: String,
    pub business_license: String,
    pub website: String,
    pub status: VersionStatus,
    pub operator: String,
    pub review_comment: String,
    pub review_time: i64,
    pub create_ts: String,
    pub modify_ts: String,
}

/// 호출자에게 돌려주는 자격 자료. 목록 필드가 디코딩되어 있습니다.
#[derive(Debug, Clone, Serialize)]
pub struct Material {
    pub id: i64,
    pub cp_id: i64,
    pub cp_icon: String,
    pub cp_name: String,
    pub verification_images: Vec<String>,
    pub business_license: String,
    pub website: String,
    pub status: VersionStatus,
    pub operator: String,
    pub review_comment: String,
    pub review_time: i64,
    pub create_ts: String,
    pub modify_ts: String,
}

impl TryFrom<MaterialRow> for Material {
    type Error = AppError;

    fn try_from(row: MaterialRow) -> Result<Self, Self::Error> {
        Ok(Self {
            verification_images: codec::decode_list(&row.verification_images)?,
            id: row.id,
            cp_id: row.cp_id,
            cp_icon: row.cp_icon,
            cp_name: row.cp_name,
            business_license: row.business_license,
            website: row.website,
            status: row.status,
            operator: row.operator,
            review_comment: row.review_comment,
            review_time: row.review_time,
            create_ts: row.create_ts,
            modify_ts: row.modify_ts,
        })
    }
}

/// 자격 자료 내용 (요청 본문)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialContent {
    #[serde(default)]
    pub cp_icon: String,
    pub cp_name: String,
    #[serde(default)]
    pub verification_images: Vec<String>,
    pub business_license: String,
    #[serde(default)]
    pub website: String,
}

impl MaterialContent {
    /// 필수 필드 검증. 트랜잭션을 열기 전에 호출됩니다.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.cp_name.trim().is_empty() {
            return Err(AppError::Validation(
                "cp_name is required and cannot be empty or whitespace".to_string(),
            ));
        }
        if self.business_license.trim().is_empty() {
            return Err(AppError::Validation(
                "business_license is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// 저장 직전 형태: 목록 필드가 JSON 텍스트로 인코딩된 자격 자료 내용
#[derive(Debug, Clone)]
pub struct MaterialFields {
    pub cp_icon: String,
    pub cp_name: String,
    pub verification_images: String,
    pub business_license: String,
    pub website: String,
}

impl MaterialFields {
    pub fn encode(content: &MaterialContent) -> Result<Self, AppError> {
        Ok(Self {
            cp_icon: content.cp_icon.clone(),
            cp_name: content.cp_name.trim().to_string(),
            verification_images: codec::encode_list(&content.verification_images)?,
            business_license: content.business_license.clone(),
            website: content.website.clone(),
        })
    }
}

/// `POST /cp/materials`: 자격 자료 생성 (공급사가 없으면 함께 생성)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaterialRequest {
    pub cp_id: i64,
    pub material: MaterialContent,
    #[serde(default)]
    pub submit_mode: SubmitMode,
}

impl CreateMaterialRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.cp_id <= 0 {
            return Err(AppError::Validation("cp_id is required".to_string()));
        }
        self.material.validate()
    }
}

/// `PUT /cp/materials/{id}`: 초안 자격 자료 수정
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMaterialRequest {
    pub material: MaterialContent,
    /// 생성과 달리 기본값이 없습니다. 빠지면 검증 에러입니다.
    pub submit_mode: Option<SubmitMode>,
}

/// `POST /cp/materials/review`
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewMaterialRequest {
    pub material_id: i64,
    #[serde(flatten)]
    pub review: super::ReviewInput,
}

/// 공급사 상세: 부모 행 + 최신 자료 + 게시 중인 자료
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDetail {
    pub provider: Provider,
    pub newest_material: Option<Material>,
    pub online_material: Option<Material>,
}

/// 목록 한 줄: 부모 행 + 최신 자료의 상태만
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProviderSummary {
    pub id: i64,
    pub cp_name: String,
    pub newest_material_id: Option<i64>,
    pub online_material_id: Option<i64>,
    pub newest_status: Option<VersionStatus>,
    pub create_ts: String,
    pub modify_ts: String,
}
