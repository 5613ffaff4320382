//! Standardizers for explicit state, city, and ZIP cells.
//!
//! Each takes the raw cell (`None` for missing/null/non-string) and
//! returns `None` when there is nothing usable, so callers handle absence
//! explicitly instead of checking for sentinel strings.

use crate::clean::clean_text;
use crate::states;
use crate::title_case::simple_title_case;

/// Length of a base US ZIP code.
pub const ZIP_LENGTH: usize = 5;

/// Normalizes a state cell to its full name.
///
/// Full names (any case) map to their canonical spelling and two-letter
/// codes expand to full names. Anything else is returned trimmed but
/// otherwise untouched.
#[must_use]
pub fn standardize_state(state: Option<&str>) -> Option<String> {
    let trimmed = state?.trim();

    if let Some(name) = states::canonical_name(trimmed) {
        return Some(name.to_string());
    }
    if let Some(name) = states::name_for_code(trimmed) {
        return Some(name.to_string());
    }
    Some(trimmed.to_string())
}

/// Cleans a city cell and capitalizes every word.
#[must_use]
pub fn standardize_city(city: Option<&str>) -> Option<String> {
    Some(simple_title_case(&clean_text(city?)))
}

/// Reduces a ZIP cell to its first five digits.
///
/// Returns `None` if fewer than five digits are present.
#[must_use]
pub fn standardize_zip(zip: Option<&str>) -> Option<String> {
    let digits: String = zip?.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < ZIP_LENGTH {
        return None;
    }
    Some(digits[..ZIP_LENGTH].to_string())
}
