//! Page requests and paginated results.

use serde::Serialize;

use crate::config::PaginationConfig;
use crate::record::FeedbackRecord;

/// A request for one page of records.
///
/// Pages are 1-based. Both fields are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::from_config(None, None, &PaginationConfig::default())
    }
}

impl PageRequest {
    /// Create a page request, clamping both values to at least 1.
    #[must_use]
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Resolve optional values against the pagination settings.
    ///
    /// Missing or zero values fall back to page 1 and the default limit;
    /// the limit is capped at the configured maximum.
    #[must_use]
    pub fn from_config(
        page: Option<usize>,
        limit: Option<usize>,
        config: &PaginationConfig,
    ) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(config.default_limit)
            .min(config.max_limit);
        Self::new(page, limit)
    }

    /// Resolve raw query-string values.
    ///
    /// Anything that isn't a positive integer is treated as absent.
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>, config: &PaginationConfig) -> Self {
        Self::from_config(
            page.and_then(parse_positive),
            limit.and_then(parse_positive),
            config,
        )
    }

    /// The 1-based page number.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Records per page.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Index of the first record on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Index one past the last record on this page.
    #[must_use]
    pub fn end(&self) -> usize {
        self.page.saturating_mul(self.limit)
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The page that was returned.
    pub current_page: usize,
    /// `ceil(total / limit)`.
    pub total_pages: usize,
    /// Whether records exist past this page.
    pub has_more: bool,
}

/// One page of records with metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Number of records in the whole (possibly filtered) collection.
    pub total: usize,
    /// Records on this page, newest first.
    pub data: Vec<FeedbackRecord>,
    /// Page metadata.
    pub pagination: Pagination,
}

impl Page {
    /// Slice `records` according to `request`.
    #[must_use]
    pub fn from_records(records: Vec<FeedbackRecord>, request: PageRequest) -> Self {
        let total = records.len();
        let data = records
            .into_iter()
            .skip(request.offset())
            .take(request.limit())
            .collect();

        Self {
            total,
            data,
            pagination: Pagination {
                current_page: request.page(),
                total_pages: total.div_ceil(request.limit()),
                has_more: request.end() < total,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FeedbackRecord;
    use chrono::Utc;

    fn records(n: usize) -> Vec<FeedbackRecord> {
        (0..n)
            .map(|i| FeedbackRecord {
                id: i64::try_from(n - i).unwrap(),
                name: format!("User {i}"),
                email: format!("user{i}@example.com"),
                message: format!("Message number {i}"),
                date: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_new_clamps_to_one() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 1);
    }

    #[test]
    fn test_default_request() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_from_query_defaults() {
        let config = PaginationConfig::default();
        for (page, limit) in [
            (None, None),
            (Some("0"), Some("0")),
            (Some("-3"), Some("-1")),
            (Some("abc"), Some("")),
            (Some("2abc"), Some("1.5")),
        ] {
            let request = PageRequest::from_query(page, limit, &config);
            assert_eq!(request, PageRequest::new(1, 10), "{page:?} {limit:?}");
        }
    }

    #[test]
    fn test_from_query_parses_values() {
        let config = PaginationConfig::default();
        let request = PageRequest::from_query(Some("3"), Some(" 25 "), &config);
        assert_eq!(request.page(), 3);
        assert_eq!(request.limit(), 25);
    }

    #[test]
    fn test_limit_capped() {
        let config = PaginationConfig::default();
        let request = PageRequest::from_query(Some("1"), Some("5000"), &config);
        assert_eq!(request.limit(), 100);
    }

    #[test]
    fn test_offset_and_end() {
        let request = PageRequest::new(3, 10);
        assert_eq!(request.offset(), 20);
        assert_eq!(request.end(), 30);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let request = PageRequest::new(usize::MAX, 10);
        assert_eq!(request.end(), usize::MAX);

        let page = Page::from_records(records(3), request);
        assert!(page.data.is_empty());
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_empty_collection() {
        let page = Page::from_records(Vec::new(), PageRequest::new(1, 10));

        assert_eq!(page.total, 0);
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_middle_page() {
        let page = Page::from_records(records(25), PageRequest::new(2, 10));

        assert_eq!(page.total, 25);
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.data[0].name, "User 10");
        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_more);
    }

    #[test]
    fn test_last_partial_page() {
        let page = Page::from_records(records(25), PageRequest::new(3, 10));

        assert_eq!(page.data.len(), 5);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_exact_multiple_has_no_more() {
        let page = Page::from_records(records(20), PageRequest::new(2, 10));

        assert_eq!(page.data.len(), 10);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_pages_concatenate_to_whole() {
        let all = records(23);
        for limit in 1..=24 {
            let total_pages = Page::from_records(all.clone(), PageRequest::new(1, limit))
                .pagination
                .total_pages;
            assert_eq!(total_pages, 23_usize.div_ceil(limit));

            let joined: Vec<_> = (1..=total_pages)
                .flat_map(|p| Page::from_records(all.clone(), PageRequest::new(p, limit)).data)
                .collect();
            assert_eq!(joined, all, "limit {limit}");
        }
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::from_records(records(1), PageRequest::new(1, 10));
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["total"], 1);
        assert_eq!(json["pagination"]["currentPage"], 1);
        assert_eq!(json["pagination"]["totalPages"], 1);
        assert_eq!(json["pagination"]["hasMore"], false);
    }
}
