//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 25;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 200;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// SQL `OFFSET` value, ready to bind.
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) * self.page_size) as i64
    }

    /// SQL `LIMIT` value, ready to bind.
    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: i64) -> Self {
        let total_items = total_items.max(0) as u64;
        let total_pages = if total_items == 0 {
            1
        } else {
            total_items.div_ceil(request.page_size)
        };
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_values() {
        let req = PageRequest::new(0, 10_000);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_and_limit() {
        let req = PageRequest::new(3, 20);
        assert_eq!(req.offset(), 40);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let req = PageRequest::new(1, 10);
        let page = PageResponse::new(vec![1, 2, 3], &req, 21);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 21);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let page: PageResponse<u8> = PageResponse::new(Vec::new(), &PageRequest::default(), 0);
        assert_eq!(page.total_pages, 1);
    }
}
