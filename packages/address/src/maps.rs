//! Map search links.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except ASCII alphanumerics and `_ . - ~ /` is escaped.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Builds a search link for `address`, with `state` appended after a
/// comma when present.
#[must_use]
pub fn maps_search_url(base_url: &str, address: &str, state: Option<&str>) -> String {
    let query = match state {
        Some(state) if !state.is_empty() => format!("{address}, {state}"),
        _ => address.to_string(),
    };
    format!("{base_url}{}", utf8_percent_encode(&query, QUERY_ESCAPE))
}
