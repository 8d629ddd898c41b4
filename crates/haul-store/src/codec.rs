//! Field-level conversions shared by entity adapters.
//!
//! The store treats every value as an opaque string. Adapters use these
//! helpers so that every table encodes the same kinds of values the same way:
//!
//! - enumerations as integer codes (`"1"`, `"2"`, ...)
//! - booleans as `True` / `False`
//! - lists as `['a', 'b']`
//! - absent optional values as the empty string

use std::fmt;
use std::str::FromStr;

use crate::error::{StoreError, StoreResult};
use crate::row::Row;

/// Token written for `true`.
pub const TRUE_TOKEN: &str = "True";
/// Token written for `false`.
pub const FALSE_TOKEN: &str = "False";

/// An enumeration persisted as a small integer code.
pub trait Coded: Sized {
    /// The persisted code of this variant.
    fn code(&self) -> u8;

    /// The variant for `code`, if any.
    fn from_code(code: u8) -> Option<Self>;
}

/// Encode an enumeration as its integer code.
pub fn encode_code<T: Coded>(value: &T) -> String {
    value.code().to_string()
}

/// Decode an integer code back into its enumeration.
pub fn decode_code<T: Coded>(field: &str, raw: &str) -> StoreResult<T> {
    let code: u8 = decode_number(field, raw)?;
    T::from_code(code).ok_or_else(|| StoreError::decode(field, format!("unknown code {code}")))
}

/// Encode a boolean as `True` or `False`.
pub fn encode_bool(value: bool) -> String {
    let token = if value { TRUE_TOKEN } else { FALSE_TOKEN };
    token.to_string()
}

/// Decode a boolean. Any casing of `true` is true; everything else is false.
pub fn decode_bool(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Encode a list as `['a', 'b']`.
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| format!("'{}'", item.as_ref()))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Decode a list written by [`encode_list`].
///
/// Brackets are stripped, the remainder is split on `", "` and the quotes
/// around each element are removed. `[]` and the empty string both decode to
/// an empty list.
pub fn decode_list(raw: &str) -> Vec<String> {
    let inner = raw.trim().trim_matches(|c| c == '[' || c == ']');
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split(", ")
        .map(|item| item.trim_matches('\'').to_string())
        .collect()
}

/// Parse a numeric field, naming the field in the error.
pub fn decode_number<T>(field: &str, raw: &str) -> StoreResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| StoreError::decode(field, format!("{raw:?}: {e}")))
}

/// Encode an optional value; `None` becomes the empty string.
pub fn encode_opt(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Decode an optional value; the empty string becomes `None`.
pub fn decode_opt(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// The value of `field` in `row`, or a decode error if the row lacks it.
pub fn require<'r>(row: &'r Row, field: &str) -> StoreResult<&'r str> {
    row.get(field)
        .ok_or_else(|| StoreError::decode(field, "missing from row"))
}
