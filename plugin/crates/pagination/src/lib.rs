//! Wire primitives for the InfraKitchen list convention.
//!
//! The backend pages collections with a zero-based inclusive item range that
//! travels twice: once as a `Range` request header and once as a
//! JSON-encoded `range` query parameter next to `sort` and `filter`. The
//! response reports the full collection size in `Content-Range`.
//!
//! This crate owns that translation and nothing else. It performs no I/O.
//!
//! # Example
//!
//! ```
//! use pagination::{ItemRange, Pagination, parse_content_range_total};
//!
//! let range = ItemRange::from_pagination(Pagination::new(1, 10)?)?;
//! assert_eq!(range.range_header("templates"), "templates=0-9");
//! assert_eq!(parse_content_range_total("items 0-9/42")?, 42);
//! # Ok::<(), pagination::PaginationError>(())
//! ```

mod content_range;
mod error;
mod query;
mod range;
mod sort;

pub use content_range::parse_content_range_total;
pub use error::PaginationError;
pub use query::{ListQueryParams, append_query};
pub use range::{DEFAULT_PAGE, DEFAULT_PER_PAGE, ItemRange, Pagination};
pub use sort::{Sort, SortOrder};
