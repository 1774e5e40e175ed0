//! Page windows over an ordered record set
//!
//! Pure functions for slicing a listing into fixed-size pages. Page indexes
//! are 1-based. The first page has exactly one address, the listing root;
//! the paginated route form is only valid from page 2 onwards.

use serde::Serialize;

/// Number of records on a listing page
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Error type for pagination operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("Page {page} is out of range. Only {total_pages} pages available.")]
    OutOfRange { page: usize, total_pages: usize },

    #[error("Page size must be at least 1")]
    ZeroPageSize,
}

/// How a listing page was addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAddress {
    /// The un-paginated listing root, always page 1
    Root,
    /// The `/page/{n}` route form
    Paginated(usize),
}

/// A bounded, ordered slice of the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWindow<'a, T> {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: &'a [T],
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> PageWindow<'_, T> {
    pub fn prev_page(&self) -> Option<usize> {
        self.has_prev.then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        self.has_next.then(|| self.page + 1)
    }
}

/// Fixed-size pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(total_items / page_size)`, zero for an empty set
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// Window for a 1-based page index
    ///
    /// Indexes outside `1..=total_pages` are `OutOfRange`, which includes every
    /// index when the set is empty.
    pub fn paginate<'a, T>(
        &self,
        items: &'a [T],
        page: usize,
    ) -> Result<PageWindow<'a, T>, PaginationError> {
        let total_items = items.len();
        let total_pages = self.total_pages(total_items);

        if page < 1 || page > total_pages {
            return Err(PaginationError::OutOfRange { page, total_pages });
        }

        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(total_items);

        Ok(PageWindow {
            page,
            total_pages,
            total_items,
            items: &items[start..end],
            has_prev: page > 1,
            has_next: page < total_pages,
        })
    }

    /// Window for a route address
    ///
    /// `Paginated(1)` is rejected so page 1 is only reachable at the root. The
    /// root of an empty listing yields an empty first page rather than an
    /// error: an empty catalog still has a listing page.
    pub fn window<'a, T>(
        &self,
        items: &'a [T],
        address: PageAddress,
    ) -> Result<PageWindow<'a, T>, PaginationError> {
        match address {
            PageAddress::Root if items.is_empty() => Ok(PageWindow {
                page: 1,
                total_pages: 0,
                total_items: 0,
                items,
                has_prev: false,
                has_next: false,
            }),
            PageAddress::Root => self.paginate(items, 1),
            PageAddress::Paginated(page) if page <= 1 => Err(PaginationError::OutOfRange {
                page,
                total_pages: self.total_pages(items.len()),
            }),
            PageAddress::Paginated(page) => self.paginate(items, page),
        }
    }
}
