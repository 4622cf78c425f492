//! Page-number pagination.

use serde::Serialize;

use crate::error::DomainError;

/// Posts shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest row offset a store can seek to (a signed 64-bit SQL `OFFSET`).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// A requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number,
            size: size.max(1),
        }
    }

    pub fn first(size: u64) -> Self {
        Self::new(1, size)
    }

    /// A page the stores can address. Pages starting past [`MAX_OFFSET`]
    /// cannot hold rows and are reported missing.
    pub fn checked(number: u64, size: u64) -> Result<Self, DomainError> {
        let request = Self::new(number, size);
        number
            .saturating_sub(1)
            .checked_mul(request.size)
            .filter(|offset| *offset <= MAX_OFFSET)
            .map(|_| request)
            .ok_or_else(|| DomainError::not_found("page", number))
    }

    /// Rows to skip before this page; zero for invalid page numbers.
    pub fn offset(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }
}

/// One page of results plus the totals needed to render navigation.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.number,
            per_page: request.size,
            total_items,
            total_pages: total_items.div_ceil(request.size),
        }
    }

    /// Reject pages that do not exist. The first page of an empty result
    /// is always valid.
    pub fn ensure_exists(self) -> Result<Self, DomainError> {
        let valid = self.page == 1 || (self.page >= 1 && self.page <= self.total_pages);
        if valid {
            Ok(self)
        } else {
            Err(DomainError::not_found("page", self.page))
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
        assert_eq!(PageRequest::new(u64::MAX, 10).offset(), u64::MAX);
    }

    #[test]
    fn test_checked_rejects_unaddressable_pages() {
        assert_eq!(PageRequest::checked(3, 10).unwrap(), PageRequest::new(3, 10));
        assert!(PageRequest::checked(MAX_OFFSET / 10 + 1, 10).is_ok());

        for number in [MAX_OFFSET / 10 + 2, u64::MAX] {
            assert!(matches!(
                PageRequest::checked(number, 10),
                Err(DomainError::NotFound { entity_type: "page", .. })
            ));
        }
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Paginated::new(vec![1; 10], PageRequest::first(10), 21);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_empty_first_page_exists() {
        let page: Paginated<u8> = Paginated::new(vec![], PageRequest::first(10), 0);
        assert!(page.ensure_exists().is_ok());
    }

    #[test]
    fn test_out_of_range_page_is_not_found() {
        let page: Paginated<u8> = Paginated::new(vec![], PageRequest::new(3, 10), 15);
        assert!(matches!(
            page.ensure_exists(),
            Err(DomainError::NotFound { entity_type: "page", .. })
        ));

        let page: Paginated<u8> = Paginated::new(vec![], PageRequest::new(0, 10), 15);
        assert!(page.ensure_exists().is_err());
    }
}
