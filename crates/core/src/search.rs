//! Pagination helpers shared by list endpoints.

use serde::Serialize;

/// Default page size for paginated asset listing.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size for paginated asset listing.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Highest page number accepted; keeps `(page - 1) * limit` within `i64`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Clamp a user-provided 1-based page number to `[1, MAX_PAGE]`.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).clamp(1, MAX_PAGE)
}

/// Page metadata returned next to a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}
