//! # ID 발급
//!
//! 부모/버전 행의 64비트 정수 ID를 발급합니다.
//! 워크플로는 `IdGenerator` 트레이트만 알고, 구현은 생성 시점에 주입됩니다.

use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

pub trait IdGenerator: Send + Sync {
    /// 양수이며 이 발급기 안에서 중복되지 않는 ID
    fn next_id(&self) -> i64;
}

/// UUIDv7의 밀리초 타임스탬프(상위 48비트)에 난수 16비트를 붙여 만든 ID.
///
/// 같은 밀리초 안에서 값이 겹치거나 시계가 뒤로 가더라도
/// 직전 값 + 1 이상을 돌려주므로 단조 증가합니다.
#[derive(Debug, Default)]
pub struct TimeOrderedIds {
    last: AtomicI64,
}

impl TimeOrderedIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimeOrderedIds {
    fn next_id(&self) -> i64 {
        let candidate = candidate_from(Uuid::now_v7());
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(candidate.max(prev + 1))
            })
            .unwrap_or_else(|prev| prev);
        candidate.max(previous + 1)
    }
}

fn candidate_from(id: Uuid) -> i64 {
    let (high, low) = id.as_u64_pair();
    let millis = (high >> 16) as i64;
    let noise = (low & 0xFFFF) as i64;
    (millis << 16) | noise
}

/// 지정한 값부터 1씩 증가하는 ID. 테스트에서 결정적인 ID가 필요할 때 씁니다.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
