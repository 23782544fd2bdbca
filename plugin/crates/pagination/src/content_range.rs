//! Total-count extraction from `Content-Range` response headers.

use crate::PaginationError;

/// Parse the collection total from a `Content-Range` header value.
///
/// The total is the suffix after the last `/`. Leading whitespace is skipped
/// and anything after the leading digits is ignored, so `items 0-9/42` and
/// `0-9/42 ` both yield `42`. A suffix without leading digits (for example the
/// `*` used for unknown lengths) is rejected.
///
/// # Errors
///
/// Returns [`PaginationError::InvalidContentRange`] when no total can be read.
///
/// # Examples
/// ```
/// use pagination::parse_content_range_total;
///
/// assert_eq!(parse_content_range_total("items 0-9/42")?, 42);
/// assert!(parse_content_range_total("items 0-9/*").is_err());
/// # Ok::<(), pagination::PaginationError>(())
/// ```
pub fn parse_content_range_total(value: &str) -> Result<u64, PaginationError> {
    let invalid = || PaginationError::InvalidContentRange {
        value: value.to_owned(),
    };
    let suffix = value.rsplit('/').next().unwrap_or(value).trim_start();
    let digits_end = suffix
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(suffix.len());
    suffix
        .get(..digits_end)
        .filter(|digits| !digits.is_empty())
        .ok_or_else(invalid)?
        .parse::<u64>()
        .map_err(|_| invalid())
}
