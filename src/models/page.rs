use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// 목록 조회 요청 (쿼리스트링 `?filter=&page=&page_size=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(0), self.page_size.unwrap_or(0))
    }

    /// 공백뿐인 필터는 "필터 없음"으로 취급합니다.
    pub fn filter_text(&self) -> Option<&str> {
        self.filter
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// 정규화된 페이지 요청. 0 이하 값은 기본값으로 바뀝니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: if page <= 0 { DEFAULT_PAGE } else { page },
            page_size: if page_size <= 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// 한 페이지 분량의 결과와 필터에 맞는 전체 개수
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
