//! Page/limit normalization and the paging summary returned with list
//! responses.
//!
//! The arithmetic lives here so the repository (offset) and the handler
//! (summary) agree on the same normalized values.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Page used when the caller does not supply one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// PageRequest
// ---------------------------------------------------------------------------

/// A normalized pagination cursor. `page` is 1-based.
///
/// Both fields are always `>= 1` once constructed through [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Build a request from optional caller values.
    ///
    /// Missing values take the defaults; non-positive values are raised to 1.
    /// A positive limit is used as given.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).max(1),
        }
    }

    /// SQL `OFFSET` for this page: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Summarize this page against the total row count of the table.
    pub fn summarize(&self, total: i64) -> PagingResult {
        let total = total.max(0);
        let total_page = total_pages(total, self.limit);

        PagingResult {
            page: self.page,
            limit: self.limit,
            prev_page: (self.page - 1).max(1),
            next_page: total_page.min(self.page.saturating_add(1)),
            count: total,
            total_page,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// `ceil(total / limit)`, never less than 1 so an empty table still reports
/// "page 1 of 1".
pub fn total_pages(total: i64, limit: i64) -> i64 {
    let limit = limit.max(1);
    let total = total.max(0);
    (total / limit + i64::from(total % limit != 0)).max(1)
}

// ---------------------------------------------------------------------------
// PagingResult
// ---------------------------------------------------------------------------

/// Paging block serialized next to `data` in list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingResult {
    pub page: i64,
    pub limit: i64,
    pub prev_page: i64,
    pub next_page: i64,
    pub count: i64,
    pub total_page: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_missing() {
        let req = PageRequest::new(None, None);
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn page_and_limit_floor_at_one() {
        let req = PageRequest::new(Some(0), Some(-4));
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 1);
    }

    #[test]
    fn large_limit_is_used_as_given() {
        let paging = PageRequest::new(Some(1), Some(500)).summarize(1000);
        assert_eq!(paging.limit, 500);
        assert_eq!(paging.total_page, 2);
        assert_eq!(paging.next_page, 2);
    }

    #[test]
    fn largest_page_number_does_not_overflow() {
        let req = PageRequest::new(Some(i64::MAX), Some(10));
        assert_eq!(req.offset(), i64::MAX);

        let paging = req.summarize(5);
        assert_eq!(paging.page, i64::MAX);
        assert_eq!(paging.prev_page, i64::MAX - 1);
        assert_eq!(paging.next_page, 1);
        assert_eq!(paging.total_page, 1);
    }

    #[test]
    fn largest_limit_does_not_overflow() {
        let paging = PageRequest::new(Some(1), Some(i64::MAX)).summarize(35);
        assert_eq!(paging.limit, i64::MAX);
        assert_eq!(paging.total_page, 1);
        assert_eq!(paging.next_page, 1);
        assert_eq!(total_pages(i64::MAX, 2), i64::MAX / 2 + 1);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        assert_eq!(PageRequest::new(Some(1), Some(10)).offset(), 0);
        assert_eq!(PageRequest::new(Some(3), Some(10)).offset(), 20);
        assert_eq!(PageRequest::new(Some(2), Some(7)).offset(), 7);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 5), 5);
        assert_eq!(total_pages(1, 100), 1);
    }

    #[test]
    fn total_pages_is_one_for_empty_table() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(0, 1), 1);
    }

    #[test]
    fn total_pages_matches_ceiling_for_many_inputs() {
        for total in 0..200_i64 {
            for limit in 1..25_i64 {
                let expected = ((total as f64) / (limit as f64)).ceil() as i64;
                assert_eq!(total_pages(total, limit), expected.max(1), "total={total} limit={limit}");
            }
        }
    }

    #[test]
    fn first_page_has_prev_page_one() {
        let paging = PageRequest::new(Some(1), Some(10)).summarize(35);
        assert_eq!(paging.prev_page, 1);
        assert_eq!(paging.next_page, 2);
        assert_eq!(paging.total_page, 4);
        assert_eq!(paging.count, 35);
    }

    #[test]
    fn last_page_has_next_page_equal_to_total() {
        let paging = PageRequest::new(Some(4), Some(10)).summarize(35);
        assert_eq!(paging.prev_page, 3);
        assert_eq!(paging.next_page, 4);
    }

    #[test]
    fn empty_table_reports_page_one_of_one() {
        let paging = PageRequest::default().summarize(0);
        assert_eq!(
            paging,
            PagingResult {
                page: 1,
                limit: 10,
                prev_page: 1,
                next_page: 1,
                count: 0,
                total_page: 1,
            }
        );
    }

    #[test]
    fn paging_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(PageRequest::new(Some(2), Some(5)).summarize(12)).unwrap();
        assert_eq!(json["prevPage"], 1);
        assert_eq!(json["nextPage"], 3);
        assert_eq!(json["totalPage"], 3);
        assert_eq!(json["count"], 12);
    }
}
