//! Request parameter sanitizer.
//!
//! Turns [`RawReportParams`] into [`FilterCriteria`]. Nothing here fails:
//! every unusable value is logged and replaced with its default, so no
//! unvalidated string reaches the query layer.

use tracing::debug;

use super::types::{FilterCriteria, RawReportParams, SortColumn, SortDirection};
use crate::error::{ReportError, ReportResult};

/// Sanitize raw request parameters into report criteria.
pub fn sanitize(raw: &RawReportParams) -> FilterCriteria {
    let defaults = FilterCriteria::default();

    let search = raw.s.clone().unwrap_or_default();

    let category_id = recover(
        raw.category.as_deref().map(parse_category).transpose(),
        defaults.category_id,
    );

    let sort_column = recover(
        raw.orderby.as_deref().map(parse_sort_column).transpose(),
        defaults.sort_column,
    );

    let sort_direction = raw
        .order
        .as_deref()
        .map(SortDirection::parse)
        .unwrap_or(defaults.sort_direction);

    let page = recover(
        raw.paged.as_deref().map(parse_page).transpose(),
        defaults.page,
    );

    FilterCriteria {
        search,
        category_id,
        sort_column,
        sort_direction,
        page,
    }
}

/// Resolve a parse outcome to a value, logging and defaulting on rejection.
fn recover<T>(parsed: ReportResult<Option<T>>, default: T) -> T {
    match parsed {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            debug!(error = %e, "report parameter rejected, using default");
            default
        }
    }
}

fn parse_sort_column(raw: &str) -> ReportResult<SortColumn> {
    SortColumn::parse(raw).ok_or_else(|| ReportError::InvalidParameter {
        field: "orderby",
        value: raw.to_string(),
    })
}

/// Category IDs are non-negative; an empty value means "no filter".
fn parse_category(raw: &str) -> ReportResult<i64> {
    if raw.trim().is_empty() {
        return Ok(0);
    }
    match leading_integer(raw) {
        Some(id) if id >= 0 => Ok(id),
        _ => Err(ReportError::InvalidParameter {
            field: "category",
            value: raw.to_string(),
        }),
    }
}

/// Pages start at 1; anything lower clamps to 1.
fn parse_page(raw: &str) -> ReportResult<u32> {
    let page = leading_integer(raw).ok_or_else(|| ReportError::InvalidParameter {
        field: "paged",
        value: raw.to_string(),
    })?;
    Ok(u32::try_from(page.max(1)).unwrap_or(u32::MAX))
}

/// Parse the integer prefix of a string: optional whitespace, optional sign,
/// then digits. `"12abc"` is 12; `"abc"` has no integer. Values beyond the
/// i64 range saturate.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
pub fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
