use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Validated zero-based page coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    /// Validate raw request values: `page >= 0`, `size >= 1`.
    pub fn new(page: i64, size: i64) -> Result<Self, QueryError> {
        if page < 0 || size < 1 {
            return Err(QueryError::InvalidPagination { page, size });
        }
        Ok(Self {
            page: page as u64,
            size: size as u64,
        })
    }

    /// Cap the page size, keeping the page number.
    pub fn clamp_size(self, max_size: u64) -> Self {
        Self {
            page: self.page,
            size: self.size.min(max_size.max(1)),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of matching entities that precede this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results plus the metadata derived from the full match count.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Build a page; `total_elements` is the number of matches before slicing.
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(request.size);
        let last = total_pages == 0 || request.page >= total_pages - 1;
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
            first: request.page == 0,
            last,
            has_next: !last,
            has_previous: request.page > 0,
        }
    }

    /// Empty result for the given coordinates.
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Map items while preserving metadata (domain -> DTO mapping convenience)
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}
