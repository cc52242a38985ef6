//! Field coercion helpers and small validators

use std::str::FromStr;

/// Parse an optional raw field, turning anything unparseable into `None`
///
/// Absent fields, empty text and values that do not parse as `T` all become `None`;
/// a bad field never fails the record it belongs to.
///
/// # Examples
///
/// ```
/// use rtms_collector::utils::coerce;
///
/// assert_eq!(coerce::<i32>(Some(" 12 ")), Some(12));
/// assert_eq!(coerce::<i32>(Some("B1")), None);
/// assert_eq!(coerce::<f64>(None), None);
/// ```
pub fn coerce<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|value| value.trim().parse::<T>().ok())
}

/// Like [`coerce`] for floats, but NaN and infinities become `None` too
pub fn coerce_finite(raw: Option<&str>) -> Option<f64> {
    coerce::<f64>(raw).filter(|value| value.is_finite())
}

/// Normalize a deal amount such as `" 125,000"` to `"125000"`
///
/// The amount stays text so no precision is lost; only thousands separators
/// and surrounding whitespace are removed.
pub fn coerce_amount(raw: Option<&str>) -> Option<String> {
    raw.map(|value| value.trim().replace(',', ""))
}

/// Whether `code` looks like a five-digit administrative region code
pub fn is_valid_region_code(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}
