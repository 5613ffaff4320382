//! Text cleaning for raw address cells.
//!
//! Spreadsheet exports and web forms leave HTML entities, stray markup,
//! and inconsistent punctuation in address text. [`clean_text`] reduces
//! a cell to letters, digits, whitespace, commas, periods, and hyphens
//! with canonical spacing. Cleaning is idempotent.

use regex::Regex;
use std::sync::LazyLock;

/// Anything shaped like an HTML tag.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Characters other than alphanumerics, whitespace, `,`, `.`, and `-`.
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{Alphabetic}\p{N}\s,.\-]").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// A run of periods/commas together with the whitespace around it.
static PUNCT_SPACING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([.,]+)\s*").expect("valid regex"));

/// Cleans a raw cell value.
///
/// 1. Decode HTML entities
/// 2. Remove tag-shaped substrings
/// 3. Replace disallowed characters with a space
/// 4. Collapse whitespace
/// 5. No space before `.`/`,`, exactly one after
/// 6. Trim
#[must_use]
pub fn clean_text(input: &str) -> String {
    let decoded = html_escape::decode_html_entities(input);
    let untagged = TAG_RE.replace_all(&decoded, "");
    let allowed = DISALLOWED_RE.replace_all(&untagged, " ");
    let collapsed = WHITESPACE_RE.replace_all(&allowed, " ");
    let spaced = PUNCT_SPACING_RE.replace_all(&collapsed, "$1 ");
    spaced.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(clean_text("Smith &amp; Sons"), "Smith Sons");
        assert_eq!(clean_text("O&#39;Hare"), "O Hare");
        assert_eq!(clean_text("O&#x27;Hare"), "O Hare");
    }

    #[test]
    fn decodes_accented_letter_entities() {
        assert_eq!(clean_text("R&Eacute;SIDENCE"), "RÉSIDENCE");
        assert_eq!(clean_text("Bl&aring;b&aelig;r 5"), "Blåbær 5");
        assert_eq!(clean_text("Caf&eacute; &ndash; 5&frac34; Elm"), "Café 5¾ Elm");
    }

    #[test]
    fn unknown_entities_are_broken_apart() {
        assert_eq!(clean_text("&bogus; x"), "bogus x");
    }

    #[test]
    fn strips_tags() {
        assert_eq!(clean_text("<b>123 Main St</b>"), "123 Main St");
    }

    #[test]
    fn strips_tags_produced_by_entity_decoding() {
        assert_eq!(clean_text("&lt;br&gt;123 Main St"), "123 Main St");
    }

    #[test]
    fn replaces_disallowed_characters() {
        assert_eq!(clean_text("123 Main St #4"), "123 Main St 4");
        assert_eq!(clean_text("Joe's Diner/Bar"), "Joe s Diner Bar");
    }

    #[test]
    fn keeps_hyphens_and_unicode_letters() {
        assert_eq!(clean_text("12-14 Rue Molière"), "12-14 Rue Molière");
    }

    #[test]
    fn normalizes_punctuation_spacing() {
        assert_eq!(
            clean_text("123 Main St .,Springfield ,IL"),
            "123 Main St., Springfield, IL"
        );
        assert_eq!(clean_text("123 nw cor. st."), "123 nw cor. st.");
    }

    #[test]
    fn collapses_whitespace_and_nbsp() {
        assert_eq!(clean_text("  123\t Main&nbsp;&nbsp;St \n"), "123 Main St");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   "), "");
        assert_eq!(clean_text("<p></p>"), "");
    }

    proptest! {
        #[test]
        fn cleaning_is_idempotent(input in ".{0,64}") {
            let once = clean_text(&input);
            prop_assert_eq!(clean_text(&once), once);
        }

        #[test]
        fn cleaning_is_idempotent_on_address_like_text(
            input in "[A-Za-z0-9 .,#&;<>'-]{0,48}"
        ) {
            let once = clean_text(&input);
            prop_assert_eq!(clean_text(&once), once);
        }
    }
}
