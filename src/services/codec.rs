//! # 목록 필드 코덱
//!
//! 버전 행의 목록 필드(검증 이미지, 플랫폼, 소개 이미지)는 JSON 배열 텍스트로 저장됩니다.
//! 빈 목록도 `"[]"`로 저장하며, NULL이나 빈 문자열로 저장하지 않습니다.

use crate::error::AppError;
use serde::{de::DeserializeOwned, Serialize};

/// 목록을 JSON 배열 텍스트로 인코딩합니다. 빈 목록은 `"[]"`.
pub fn encode_list<T: Serialize>(items: &[T]) -> Result<String, AppError> {
    Ok(serde_json::to_string(items)?)
}

/// JSON 배열 텍스트를 목록으로 디코딩합니다.
///
/// 빈 문자열은 예전 행과의 호환을 위해 빈 목록으로 읽습니다.
/// 배열이 아닌 텍스트는 `AppError::Codec`.
pub fn decode_list<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, AppError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(text)?)
}
