//! US state dictionary.
//!
//! Maps two-letter postal codes to full names for the 50 US states + DC,
//! and back again by case-insensitive name lookup.

/// Two-letter postal code and full name for the 50 states + DC.
pub const STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Maps a two-letter code (any case) to the full state name.
#[must_use]
pub fn name_for_code(code: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Maps a full state name (any case) to its two-letter code.
#[must_use]
pub fn code_for_name(name: &str) -> Option<&'static str> {
    canonical_name(name).and_then(|canonical| {
        STATES
            .iter()
            .find(|(_, n)| *n == canonical)
            .map(|(abbr, _)| *abbr)
    })
}

/// Returns the canonical spelling of a full state name matched
/// case-insensitively.
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    let upper = name.to_uppercase();
    STATES
        .iter()
        .find(|(_, n)| n.to_uppercase() == upper)
        .map(|(_, n)| *n)
}

/// Largest number of whitespace-separated words in a state name.
#[must_use]
pub fn max_name_words() -> usize {
    STATES
        .iter()
        .map(|(_, name)| name.split_whitespace().count())
        .max()
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_count() {
        assert_eq!(STATES.len(), 51);
    }

    #[test]
    fn code_name_roundtrip() {
        for (abbr, name) in STATES {
            assert_eq!(name_for_code(abbr), Some(*name));
            assert_eq!(code_for_name(name), Some(*abbr), "roundtrip failed for {abbr}");
        }
    }

    #[test]
    fn lookups_ignore_case() {
        assert_eq!(name_for_code("ca"), Some("California"));
        assert_eq!(name_for_code("Dc"), Some("District of Columbia"));
        assert_eq!(canonical_name("NEW YORK"), Some("New York"));
        assert_eq!(canonical_name("district OF columbia"), Some("District of Columbia"));
        assert_eq!(code_for_name("west virginia"), Some("WV"));
    }

    #[test]
    fn unknown_values() {
        assert_eq!(name_for_code("ZZ"), None);
        assert_eq!(canonical_name("Atlantis"), None);
        assert_eq!(code_for_name("Atlantis"), None);
    }

    #[test]
    fn longest_name_has_three_words() {
        assert_eq!(max_name_words(), 3);
    }
}
