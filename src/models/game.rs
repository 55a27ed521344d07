use super::{ReviewInput, SubmitMode, VersionStatus};
use crate::error::AppError;
use crate::services::codec;
use serde::{Deserialize, Serialize};

/// 게임 홍보 플랫폼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePlatform {
    Android,
    Ios,
    Web,
}

/// 게임 부모 행: `gp_game`
///
/// `game_name`, `game_icon`, `header_image`는 버전 행에서 복사한 읽기용 캐시입니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Game {
    pub id: i64,
    pub cp_id: i64,
    pub game_name: String,
    pub game_icon: String,
    pub header_image: String,
    pub newest_game_version_id: Option<i64>,
    pub online_game_version_id: Option<i64>,
    pub create_ts: String,
    pub modify_ts: String,
}

/// 게임 버전 행: `gp_game_version`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameVersionRow {
    pub id: i64,
    pub game_id: i64,
    pub game_name: String,
    pub game_icon: String,
    pub header_image: String,
    pub game_introduction: String,
    pub game_introduction_images: String,
    pub platform: String,
    pub package_name: String,
    pub download_url: String,
    pub status: VersionStatus,
    pub review_time: i64,
    pub operator: String,
    pub review_comment: String,
    pub create_ts: String,
    pub modify_ts: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameVersion {
    pub id: i64,
    pub game_id: i64,
    pub game_name: String,
    pub game_icon: String,
    pub header_image: String,
    pub game_introduction: String,
    pub game_introduction_images: Vec<String>,
    pub platforms: Vec<GamePlatform>,
    pub package_name: String,
    pub download_url: String,
    pub status: VersionStatus,
    pub review_time: i64,
    pub operator: String,
    pub review_comment: String,
    pub create_ts: String,
    pub modify_ts: String,
}

impl TryFrom<GameVersionRow> for GameVersion {
    type Error = AppError;

    fn try_from(row: GameVersionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            game_introduction_images: codec::decode_list(&row.game_introduction_images)?,
            platforms: codec::decode_list(&row.platform)?,
            id: row.id,
            game_id: row.game_id,
            game_name: row.game_name,
            game_icon: row.game_icon,
            header_image: row.header_image,
            game_introduction: row.game_introduction,
            package_name: row.package_name,
            download_url: row.download_url,
            status: row.status,
            review_time: row.review_time,
            operator: row.operator,
            review_comment: row.review_comment,
            create_ts: row.create_ts,
            modify_ts: row.modify_ts,
        })
    }
}

/// 게임 버전 내용 (요청 본문)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameVersionContent {
    pub game_name: String,
    #[serde(default)]
    pub game_icon: String,
    #[serde(default)]
    pub header_image: String,
    #[serde(default)]
    pub game_introduction: String,
    #[serde(default)]
    pub game_introduction_images: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<GamePlatform>,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub download_url: String,
}

impl GameVersionContent {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.game_name.trim().is_empty() {
            return Err(AppError::Validation(
                "game_name is required and cannot be empty or whitespace".to_string(),
            ));
        }
        Ok(())
    }
}

/// 목록 필드가 JSON 텍스트로 인코딩된 게임 버전 내용
#[derive(Debug, Clone)]
pub struct GameVersionFields {
    pub game_name: String,
    pub game_icon: String,
    pub header_image: String,
    pub game_introduction: String,
    pub game_introduction_images: String,
    pub platform: String,
    pub package_name: String,
    pub download_url: String,
}

impl GameVersionFields {
    pub fn encode(content: &GameVersionContent) -> Result<Self, AppError> {
        Ok(Self {
            game_name: content.game_name.trim().to_string(),
            game_icon: content.game_icon.clone(),
            header_image: content.header_image.clone(),
            game_introduction: content.game_introduction.clone(),
            game_introduction_images: codec::encode_list(&content.game_introduction_images)?,
            platform: codec::encode_list(&content.platforms)?,
            package_name: content.package_name.clone(),
            download_url: content.download_url.clone(),
        })
    }
}

/// `POST /games`, `PUT /games/{id}` 요청 본문
///
/// 생성 경로에서는 `game_id`가 0(또는 생략)이어야 합니다.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveGameRequest {
    #[serde(default)]
    pub game_id: i64,
    #[serde(default)]
    pub cp_id: i64,
    pub version: GameVersionContent,
    #[serde(default)]
    pub submit_mode: SubmitMode,
}

/// `PUT /games/versions/{id}`: 초안 게임 버전 수정
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGameDraftRequest {
    pub version: GameVersionContent,
    /// 생성과 달리 기본값이 없습니다. 빠지면 검증 에러입니다.
    pub submit_mode: Option<SubmitMode>,
}

/// `POST /games/review`
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewGameRequest {
    pub game_id: i64,
    pub game_version_id: i64,
    #[serde(flatten)]
    pub review: ReviewInput,
}

/// 게임 상세: 부모 행 + 최신 버전 + 게시 중인 버전
#[derive(Debug, Clone, Serialize)]
pub struct GameDetail {
    pub game: Game,
    pub newest_version: Option<GameVersion>,
    pub online_version: Option<GameVersion>,
}

/// 목록 한 줄: 게임 행 + 최신 버전의 상태만
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct GameSummary {
    pub id: i64,
    pub cp_id: i64,
    pub game_name: String,
    pub game_icon: String,
    pub header_image: String,
    pub newest_status: Option<VersionStatus>,
    pub create_ts: String,
    pub modify_ts: String,
}
