//! Row representations flowing in and out of the validator.
//!
//! Both input and output rows are insertion-ordered maps so that column
//! order survives a pass through the validator unchanged.

use indexmap::IndexMap;

use crate::value::FieldValue;

/// One input record: field name → raw text, `None` for a missing cell.
///
/// The empty string and `None` are equivalent for validation purposes; the
/// distinction is kept only so rejected rows can be echoed back verbatim.
pub type Row = IndexMap<String, Option<String>>;

/// One accepted record: field name → typed value, `None` for null.
///
/// Ruled fields carry their coerced type; pass-through fields are carried as
/// `FieldValue::Text` exactly as they arrived.
pub type ResolvedRow = IndexMap<String, Option<FieldValue>>;

/// Build a `Row` from `(name, value)` pairs.  Handy for tests and adapters.
pub fn row_from_pairs<'a, I>(pairs: I) -> Row
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}

/// Return the raw value for `field`, treating an absent key, `None`, and the
/// empty string uniformly as "no value".
pub fn raw_value<'r>(row: &'r Row, field: &str) -> Option<&'r str> {
    match row.get(field) {
        Some(Some(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}
