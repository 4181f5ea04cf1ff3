//! # Utilities Module
//!
//! Helper functions used across the backend service: pagination arithmetic,
//! and timestamps for the response envelope.

use chrono::Utc;

/// Rows to skip for a 1-based page.
///
/// ## Examples
///
/// ```rust,ignore
/// assert_eq!(to_offset(1, 10), 0);
/// assert_eq!(to_offset(3, 10), 20);
/// ```
pub fn to_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(page_size.max(0))
}

/// Number of pages needed for `total_items`.
///
/// An empty collection still has one (empty) page. A non-positive
/// `page_size` is treated as 1.
///
/// ## Examples
///
/// ```rust,ignore
/// assert_eq!(to_total_pages(25, 10), 3);
/// assert_eq!(to_total_pages(0, 10), 1);
/// ```
pub fn to_total_pages(total_items: i64, page_size: i64) -> i64 {
    let page_size = page_size.max(1);
    let total_items = total_items.max(0);

    if total_items == 0 {
        return 1;
    }
    (total_items + page_size - 1) / page_size
}

/// Current time as Unix seconds.
pub fn unix_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(to_total_pages(25, 10), 3);
        assert_eq!(to_total_pages(30, 10), 3);
        assert_eq!(to_total_pages(31, 10), 4);
        assert_eq!(to_total_pages(1, 100), 1);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        assert_eq!(to_total_pages(0, 10), 1);
    }

    #[test]
    fn test_non_positive_page_size_is_clamped() {
        assert_eq!(to_total_pages(5, 0), 5);
        assert_eq!(to_total_pages(5, -3), 5);
    }

    #[test]
    fn test_offset() {
        assert_eq!(to_offset(1, 10), 0);
        assert_eq!(to_offset(3, 10), 20);
        assert_eq!(to_offset(2, 25), 25);
    }

    #[test]
    fn test_timestamp_is_recent() {
        assert!(unix_timestamp() > 1_700_000_000);
    }
}
