//! Lenient normalization of raw search input.
//!
//! Malformed pagination is never rejected: anything that does not parse as
//! a positive integer is replaced by a default. Query text is trimmed and a
//! blank result means "no text filter".

use crate::models::search::SearchParams;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_SUGGESTION_LIMIT: u32 = 5;
pub const DEFAULT_POPULAR_LIMIT: u32 = 10;

/// Page number and page size, both guaranteed to be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Rows to skip before the requested page.
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)).saturating_mul(i64::from(self.limit))
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// A validated `GET /search/posts` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// `None` matches every document.
    pub text: Option<String>,
    pub pagination: Pagination,
}

impl SearchRequest {
    pub fn from_params(params: &SearchParams) -> Self {
        Self {
            text: normalize_text(params.q.as_deref()),
            pagination: Pagination::new(
                parse_page(params.page.as_deref()),
                parse_limit(params.limit.as_deref(), DEFAULT_LIMIT),
            ),
        }
    }
}

/// Parse a page number, falling back to [`DEFAULT_PAGE`].
pub fn parse_page(raw: Option<&str>) -> u32 {
    parse_positive(raw).unwrap_or(DEFAULT_PAGE)
}

/// Parse a page size, falling back to `default`.
pub fn parse_limit(raw: Option<&str>, default: u32) -> u32 {
    parse_positive(raw).unwrap_or(default)
}

/// Trim query text; blank input becomes `None`.
pub fn normalize_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value >= 1)
}
