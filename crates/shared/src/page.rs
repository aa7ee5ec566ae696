use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u64 = 6;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Page-number pagination, `page` is 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl Pagination {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }

    /// Row offset of the page, capped so it always fits an SQLite integer.
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1)
            .saturating_mul(self.limit())
            .min(i64::MAX as u64)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub page: u64,
    pub limit: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(count: u64, pagination: Pagination, results: Vec<T>) -> Self {
        Self {
            count,
            page: pagination.page.max(1),
            limit: pagination.limit(),
            results,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_mul(self.limit) < self.count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            limit: self.limit,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
