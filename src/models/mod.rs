//! # 데이터 모델 모듈
//!
//! 엔진에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `status`: 버전 상태 머신, 제출 방식, 심사 결과
//! - `provider`: 공급사(gp_cp)와 자격 자료(gp_cp_material)
//! - `game`: 게임(gp_game)과 게임 버전(gp_game_version)
//! - `workflow`: 두 도메인이 공유하는 요청/결과 타입
//! - `page`: 목록 조회의 페이지 처리
//!
//! `*Row` 타입은 DB 행 그대로(목록 필드는 JSON 텍스트),
//! `*Fields` 타입은 저장 직전 인코딩된 내용, 나머지는 호출자에게 보이는 형태입니다.

pub mod game;
pub mod page;
pub mod provider;
pub mod status;
pub mod workflow;

pub use game::*;
pub use page::*;
pub use provider::*;
pub use status::*;
pub use workflow::*;
