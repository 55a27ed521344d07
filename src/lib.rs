//! # launchpad
//!
//! 공급사 자격 자료와 게임 버전의 버전 관리 워크플로 엔진입니다.
//! 두 도메인 모두 "부모 행 + 버전 행" 구조이며, 버전은 같은 상태 머신을 따릅니다
//! (Draft → Reviewing → Published | Rejected).
//!
//! - `services`: 상태를 바꾸는 워크플로와 조회기
//! - `db`: SQL 문 하나씩을 실행하는 데이터 접근 함수
//! - `routes`: axum 라우터 (HTTP 어댑터)

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
