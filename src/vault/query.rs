//! List filters, pagination and aggregate stats.

use std::collections::BTreeMap;

use serde::Serialize;

use super::record::Provider;
use crate::errors::{Result, VaultError};

/// Page number used when none is given.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when none is given.
pub const DEFAULT_LIMIT: u32 = 20;

/// Optional filters for `list`.  Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    /// Exact provider match.
    pub provider: Option<Provider>,
    /// Exact active-flag match.
    pub is_active: Option<bool>,
    /// Exact environment match.
    pub environment: Option<String>,
    /// Case-insensitive substring over name OR description.
    pub search: Option<String>,
}

impl ListFilter {
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// The search term, if it is non-blank.
    pub(crate) fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Resolve optional `page`/`limit`, applying defaults and bounds.
    pub fn resolve(
        page: Option<u32>,
        limit: Option<u32>,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<Self> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(default_limit);

        if page < 1 {
            return Err(VaultError::Validation("page must be at least 1".into()));
        }
        if limit < 1 {
            return Err(VaultError::Validation("limit must be at least 1".into()));
        }
        if limit > max_limit {
            return Err(VaultError::Validation(format!(
                "limit cannot exceed {max_limit}"
            )));
        }

        Ok(Self { page, limit })
    }

    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// One page of results plus the pagination block.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total: u64) -> Self {
        Self {
            items,
            page: pagination.page,
            limit: pagination.limit,
            total,
            pages: page_count(total, pagination.limit),
        }
    }
}

/// `ceil(total / limit)`.
pub fn page_count(total: u64, limit: u32) -> u64 {
    total.div_ceil(u64::from(limit.max(1)))
}

/// Aggregate counts over the whole vault.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: u64,
    pub active: u64,
    /// Records consumed within the trailing window.
    pub recently_used: u64,
    pub by_provider: BTreeMap<Provider, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_page_one_limit_twenty() {
        let p = Pagination::resolve(None, None, DEFAULT_LIMIT, 100).unwrap();
        assert_eq!(p, Pagination { page: 1, limit: 20 });
        assert_eq!(p.offset(), 0);
        assert_eq!(Pagination::default(), p);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let p = Pagination::resolve(Some(3), Some(10), DEFAULT_LIMIT, 100).unwrap();
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn rejects_zero_and_oversized_values() {
        assert!(Pagination::resolve(Some(0), None, 20, 100).is_err());
        assert!(Pagination::resolve(None, Some(0), 20, 100).is_err());
        assert!(Pagination::resolve(None, Some(101), 20, 100).is_err());
    }

    #[test]
    fn page_count_is_ceiling() {
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(1, 20), 1);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
        assert_eq!(page_count(45, 10), 5);
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(ListFilter::default().search("   ").search_term(), None);
        assert_eq!(ListFilter::default().search(" key ").search_term(), Some("key"));
    }

    #[test]
    fn stats_serialize_provider_keys_as_tags() {
        let mut stats = Stats::default();
        stats.by_provider.insert(Provider::Stripe, 2);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains(r#""byProvider":{"STRIPE":2}"#));
        assert!(json.contains(r#""recentlyUsed":0"#));
    }
}
