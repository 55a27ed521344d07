//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `DB_MAX_CONNECTIONS`: 커넥션 풀 크기
//! - `OPERATION_TIMEOUT_SECS`: 작업 하나(트랜잭션 하나)의 기본 데드라인

use std::env;
use std::time::Duration;

/// 애플리케이션 전체 설정
///
/// 서버 시작 시 한 번 읽어온 후에는 바뀌지 않습니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 예: "sqlite:data/launchpad.db?mode=rwc"
    pub database_url: String,
    /// 기본값: "0.0.0.0"
    pub host: String,
    /// 기본값: 8080
    pub port: u16,
    /// 기본값: 5
    pub max_connections: u32,
    /// 기본값: 10초
    pub operation_timeout: Duration,
}

impl Config {
    /// 환경변수에서 설정값을 읽습니다.
    ///
    /// # 에러
    /// `DATABASE_URL`이 없으면 에러. 나머지는 없거나 숫자가 아니면 기본값을 씁니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8080),
            max_connections: parse_or("DB_MAX_CONNECTIONS", 5),
            operation_timeout: Duration::from_secs(parse_or("OPERATION_TIMEOUT_SECS", 10)),
        })
    }

    /// `HOST:PORT`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
