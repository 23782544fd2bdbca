//! Page numbers and the zero-based inclusive item ranges they map to.

use serde::Serialize;

use crate::PaginationError;

/// Page requested when the caller supplies none.
pub const DEFAULT_PAGE: u64 = 1;

/// Page size requested when the caller supplies none.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// One-based page request.
///
/// ## Invariants
/// - `page >= 1`
/// - `per_page >= 1`
///
/// # Examples
/// ```
/// use pagination::Pagination;
///
/// let pagination = Pagination::new(3, 25)?;
/// assert_eq!(pagination.page(), 3);
/// assert!(Pagination::new(0, 25).is_err());
/// # Ok::<(), pagination::PaginationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    page: u64,
    per_page: u64,
}

impl Pagination {
    /// Validate and build a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] or
    /// [`PaginationError::InvalidPerPage`] when either value is zero.
    pub const fn new(page: u64, per_page: u64) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage { page });
        }
        if per_page == 0 {
            return Err(PaginationError::InvalidPerPage { per_page });
        }
        Ok(Self { page, per_page })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Zero-based inclusive index interval covering one page of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRange {
    start: u64,
    end: u64,
}

impl ItemRange {
    /// Compute `[(page-1)*per_page, page*per_page - 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::RangeOverflow`] when the end index does not
    /// fit in a `u64`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{ItemRange, Pagination};
    ///
    /// let range = ItemRange::from_pagination(Pagination::new(2, 10)?)?;
    /// assert_eq!((range.start(), range.end()), (10, 19));
    /// # Ok::<(), pagination::PaginationError>(())
    /// ```
    pub fn from_pagination(pagination: Pagination) -> Result<Self, PaginationError> {
        let overflow = || PaginationError::RangeOverflow {
            page: pagination.page,
            per_page: pagination.per_page,
        };
        let start = (pagination.page - 1)
            .checked_mul(pagination.per_page)
            .ok_or_else(overflow)?;
        let end = start
            .checked_add(pagination.per_page - 1)
            .ok_or_else(overflow)?;
        Ok(Self { start, end })
    }

    /// First index of the page.
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Last index of the page, inclusive.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// Value of the `Range` request header for `resource`.
    #[must_use]
    pub fn range_header(&self, resource: &str) -> String {
        format!("{resource}={}-{}", self.start, self.end)
    }

    /// JSON text of the `range` query parameter, e.g. `[0,9]`.
    #[must_use]
    pub fn to_json(&self) -> String {
        format!("[{},{}]", self.start, self.end)
    }
}
