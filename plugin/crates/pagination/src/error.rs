//! Error types for pagination primitives.

use thiserror::Error;

/// Failures raised while validating or translating pagination values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Pages are one-based.
    #[error("page must be at least 1, got {page}")]
    InvalidPage {
        /// Rejected page number.
        page: u64,
    },

    /// A page must hold at least one item.
    #[error("per-page size must be at least 1, got {per_page}")]
    InvalidPerPage {
        /// Rejected page size.
        per_page: u64,
    },

    /// The computed range does not fit in an unsigned 64-bit index.
    #[error("item range for page {page} with {per_page} per page overflows")]
    RangeOverflow {
        /// Requested page number.
        page: u64,
        /// Requested page size.
        per_page: u64,
    },

    /// The `Content-Range` value carries no usable total.
    #[error("invalid Content-Range header value '{value}'")]
    InvalidContentRange {
        /// Raw header value.
        value: String,
    },
}
