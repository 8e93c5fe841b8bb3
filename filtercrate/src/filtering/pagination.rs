use crate::models::Pagination;
use crate::validation::validators::validate_range;
use crate::validation::{ValidationError, ValidationErrors};

/// Parameter names, as exposed on a schema.
pub const LIMIT: &str = "limit";
pub const OFFSET: &str = "offset";
pub const PAGE: &str = "page";
pub const PAGE_SIZE: &str = "page_size";
/// Public alias of [`PAGE_SIZE`]
pub const SIZE: &str = "size";

/// Default page when page-based input omits it.
pub const DEFAULT_PAGE: u64 = 1;

/// Parse one pagination number with a lower bound. Absent input falls back
/// to `default`; present input must be an integer, so `""` and `null` fail.
fn parse_bounded(
    field: &str,
    raw: Option<&str>,
    default: u64,
    minimum: i64,
) -> Result<u64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::new(field, "Input should be a valid integer"))?;
    validate_range(field, value, Some(minimum), None)?;
    u64::try_from(value).map_err(|_| ValidationError::new(field, "Input should be a valid integer"))
}

/// Offset-based input: `limit` (default 100, at least 1) and `offset`
/// (default 0, at least 0).
///
/// # Errors
///
/// Returns one error per invalid parameter.
pub fn parse_offset(limit: Option<&str>, offset: Option<&str>) -> Result<Pagination, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let limit = parse_bounded(LIMIT, limit, Pagination::DEFAULT_LIMIT, 1)
        .map_err(|error| errors.add(error))
        .ok();
    let offset = parse_bounded(OFFSET, offset, Pagination::DEFAULT_OFFSET, 0)
        .map_err(|error| errors.add(error))
        .ok();
    match (limit, offset) {
        (Some(limit), Some(offset)) => Ok(Pagination::new(limit, offset)),
        _ => Err(errors),
    }
}

/// Page-based input: `page` (default 1, at least 1) and `page_size`
/// (default 100, at least 1), normalized to `limit = size`,
/// `offset = (page - 1) * size`.
///
/// # Errors
///
/// Returns one error per invalid parameter.
pub fn parse_page(page: Option<&str>, size: Option<&str>) -> Result<Pagination, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let page = parse_bounded(PAGE, page, DEFAULT_PAGE, 1)
        .map_err(|error| errors.add(error))
        .ok();
    let size = parse_bounded(PAGE_SIZE, size, Pagination::DEFAULT_LIMIT, 1)
        .map_err(|error| errors.add(error))
        .ok();
    match (page, size) {
        (Some(page), Some(size)) => Ok(Pagination::from_page(page, size)),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_defaults() {
        assert_eq!(parse_offset(None, None).unwrap(), Pagination::new(100, 0));
    }

    #[test]
    fn test_offset_valid_and_large_values() {
        assert_eq!(parse_offset(Some("10"), Some("0")).unwrap(), Pagination::new(10, 0));
        assert_eq!(
            parse_offset(Some("1000"), Some("5000")).unwrap(),
            Pagination::new(1000, 5000)
        );
    }

    #[test]
    fn test_offset_invalid_numbers() {
        for (limit, offset) in [("-1", "0"), ("10", "-1"), ("0", "0")] {
            assert!(parse_offset(Some(limit), Some(offset)).is_err(), "{limit},{offset}");
        }
    }

    #[test]
    fn test_offset_null_values_invalid() {
        let errors = parse_offset(Some("null"), Some("")).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.for_field(LIMIT).is_some());
        assert!(errors.for_field(OFFSET).is_some());
    }

    #[test]
    fn test_page_normalized() {
        assert_eq!(parse_page(Some("1"), Some("10")).unwrap(), Pagination::new(10, 0));
        assert_eq!(parse_page(Some("4"), Some("10")).unwrap(), Pagination::new(10, 30));
    }

    #[test]
    fn test_page_invalid() {
        assert!(parse_page(Some("0"), Some("10")).is_err());
        assert!(parse_page(Some("1"), Some("-10")).is_err());
        assert!(parse_page(Some("1"), Some("none")).is_err());
    }
}
