//! Page-number pagination primitives shared by roster views.
//!
//! Views present an ordered collection one page at a time. Callers keep a
//! single authoritative sequence and translate page-relative positions into
//! absolute indices with [`PageRequest::absolute_index`] before mutating it;
//! the pagination state itself never mirrors the stored items.
//!
//! # Example
//!
//! ```
//! use pagination::{PageNumber, PageRequest, PageSize, total_pages};
//!
//! let size = PageSize::new(10).expect("non-zero page size");
//! let page = PageNumber::new(3).expect("non-zero page number");
//! let request = PageRequest::new(page, size);
//!
//! assert_eq!(request.absolute_index(4).expect("index within page"), 24);
//! assert_eq!(total_pages(21, size), 3);
//! ```

use std::num::NonZeroUsize;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when callers do not configure one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors raised by pagination arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A page size of zero was supplied.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    /// A page number of zero was supplied; pages are 1-based.
    #[error("page numbers start at 1")]
    ZeroPage,
    /// A page-relative index does not fit inside a single page.
    #[error("index {index} is outside a page of {page_size} items")]
    IndexBeyondPage {
        /// Page-relative index that was requested.
        index: usize,
        /// Number of items a page holds.
        page_size: usize,
    },
    /// Offset arithmetic overflowed `usize`.
    #[error("page offset overflowed")]
    Overflow,
}

/// Number of items shown on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Validate and construct a [`PageSize`].
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub const fn new(size: usize) -> Result<Self, PaginationError> {
        match NonZeroUsize::new(size) {
            Some(value) => Ok(Self(value)),
            None => Err(PaginationError::ZeroPageSize),
        }
    }

    /// Number of items per page.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PaginationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

/// One-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageNumber(NonZeroUsize);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroUsize::MIN);

    /// Validate and construct a [`PageNumber`].
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPage`] when `page` is zero.
    pub const fn new(page: usize) -> Result<Self, PaginationError> {
        match NonZeroUsize::new(page) {
            Some(value) => Ok(Self(value)),
            None => Err(PaginationError::ZeroPage),
        }
    }

    /// One-based page value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// The page before this one, or `None` on the first page.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match NonZeroUsize::new(self.0.get() - 1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<usize> for PageNumber {
    type Error = PaginationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageNumber> for usize {
    fn from(value: PageNumber) -> Self {
        value.get()
    }
}

/// Number of pages needed to show `len` items; zero for an empty collection.
#[must_use]
pub const fn total_pages(len: usize, size: PageSize) -> usize {
    len.div_ceil(size.get())
}

/// A page position within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    page: PageNumber,
    size: PageSize,
}

impl PageRequest {
    /// Build a request for `page` with `size` items per page.
    #[must_use]
    pub const fn new(page: PageNumber, size: PageSize) -> Self {
        Self { page, size }
    }

    /// Requested page number.
    #[must_use]
    pub const fn page(&self) -> PageNumber {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Absolute index of the first item on the page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::Overflow`] when the offset exceeds `usize`.
    pub const fn offset(&self) -> Result<usize, PaginationError> {
        match (self.page.get() - 1).checked_mul(self.size.get()) {
            Some(offset) => Ok(offset),
            None => Err(PaginationError::Overflow),
        }
    }

    /// Translate a page-relative index into an absolute collection index.
    ///
    /// The result is not bounds-checked against any collection; callers
    /// compare it with their own length.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::IndexBeyondPage`] when `page_index` does
    /// not fit inside a page, or [`PaginationError::Overflow`] when the
    /// absolute index exceeds `usize`.
    pub fn absolute_index(&self, page_index: usize) -> Result<usize, PaginationError> {
        if page_index >= self.size.get() {
            return Err(PaginationError::IndexBeyondPage {
                index: page_index,
                page_size: self.size.get(),
            });
        }
        self.offset()?
            .checked_add(page_index)
            .ok_or(PaginationError::Overflow)
    }

    /// Absolute index range covered by this page, clamped to `len`.
    #[must_use]
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.offset().unwrap_or(usize::MAX).min(len);
        let end = start.saturating_add(self.size.get()).min(len);
        start..end
    }

    /// Build the page envelope for `items`.
    #[must_use]
    pub fn slice<T: Clone>(&self, items: &[T]) -> Page<T> {
        let visible = items.get(self.range(items.len())).unwrap_or_default();
        Page {
            items: visible.to_vec(),
            page: self.page.get(),
            page_size: self.size.get(),
            total_items: items.len(),
            total_pages: total_pages(items.len(), self.size),
        }
    }
}

/// Items visible on one page plus the counters a view needs to render
/// navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    page: usize,
    page_size: usize,
    total_items: usize,
    total_pages: usize,
}

impl<T> Page<T> {
    /// Items on this page, in collection order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the envelope and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Configured items per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Size of the whole collection.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Number of pages for the whole collection.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }
}
