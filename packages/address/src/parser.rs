//! Best-effort US address tagging.
//!
//! Splits a cleaned, abbreviation-expanded address into labelled tokens
//! following the usual US postal grammar:
//!
//! ```text
//! [number] [pre-dir] name... [type] [post-dir] [unit-type unit-id...] [, city] [, state] [zip]
//! ```
//!
//! The tagger works right to left for the trailing parts (ZIP, state,
//! city) and left to right for the street line. Commas are treated as
//! segment boundaries, which is how most spreadsheet addresses separate
//! the street line from the place name.
//!
//! Failure is an ordinary outcome here: callers fall back to treating
//! the address as unstructured text.

use std::sync::LazyLock;

use addrstd_address_models::AddressComponents;
use regex::Regex;

use crate::standardize::standardize_state;
use crate::states;

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(?:-\d{4})?$").expect("valid regex"));

static ADDRESS_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+[A-Za-z]?(?:-\d+[A-Za-z]?)?$").expect("valid regex")
});

/// Street suffixes in their expanded form.
const STREET_TYPES: &[&str] = &[
    "Alley",
    "Avenue",
    "Bend",
    "Boulevard",
    "Causeway",
    "Circle",
    "Corner",
    "Court",
    "Cove",
    "Crescent",
    "Crossing",
    "Drive",
    "Expressway",
    "Extension",
    "Freeway",
    "Highway",
    "Lane",
    "Loop",
    "Parkway",
    "Pass",
    "Pike",
    "Place",
    "Plaza",
    "Road",
    "Route",
    "Row",
    "Square",
    "Street",
    "Terrace",
    "Trail",
    "Turnpike",
    "Walk",
    "Way",
];

const DIRECTIONALS: &[&str] = &[
    "North",
    "South",
    "East",
    "West",
    "Northeast",
    "Northwest",
    "Southeast",
    "Southwest",
];

/// Words that introduce a unit designator.
const OCCUPANCY_TYPES: &[&str] = &[
    "Apartment",
    "Building",
    "Department",
    "Floor",
    "Lot",
    "Office",
    "Room",
    "Space",
    "Suite",
    "Unit",
];

/// Label assigned to one address token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// House number.
    AddressNumber,
    /// Directional before the street name ("North" in "North Main Street").
    StreetNamePreDirectional,
    /// Base street name.
    StreetName,
    /// Street suffix ("Street", "Avenue").
    StreetNamePostType,
    /// Directional after the suffix ("West" in "4th Street West").
    StreetNamePostDirectional,
    /// Unit designator ("Apartment", "Suite").
    OccupancyType,
    /// Unit identifier ("4B").
    OccupancyIdentifier,
    /// City or other place name.
    PlaceName,
    /// State name or code.
    StateName,
    /// Postal code.
    ZipCode,
}

impl Tag {
    /// Returns `true` for tags that belong to the street line.
    #[must_use]
    pub const fn is_street_line(self) -> bool {
        matches!(
            self,
            Self::AddressNumber
                | Self::StreetNamePreDirectional
                | Self::StreetName
                | Self::StreetNamePostType
                | Self::StreetNamePostDirectional
                | Self::OccupancyType
                | Self::OccupancyIdentifier
        )
    }
}

/// A token together with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    /// Token text, without surrounding periods.
    pub text: String,
    /// Assigned label.
    pub tag: Tag,
}

/// Why an address could not be tagged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing to parse.
    #[error("Address is empty")]
    Empty,

    /// The street line is a bare house number.
    #[error("No street name found in '{0}'")]
    NoStreetName(String),

    /// No house number, street suffix, state, or ZIP anchors the grammar.
    #[error("'{0}' does not look like a street address")]
    Unrecognized(String),
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    segment: usize,
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    input
        .split(',')
        .enumerate()
        .flat_map(|(segment, part)| {
            part.split_whitespace()
                .map(|word| word.trim_matches('.'))
                .filter(|text| !text.is_empty())
                .map(move |text| Token { text, segment })
        })
        .collect()
}

fn in_list(list: &[&str], word: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(word))
}

/// Returns `true` if `word` is an expanded street suffix.
#[must_use]
pub fn is_street_type(word: &str) -> bool {
    in_list(STREET_TYPES, word)
}

/// Returns `true` if `word` is an expanded directional.
#[must_use]
pub fn is_directional(word: &str) -> bool {
    in_list(DIRECTIONALS, word)
}

/// Returns `true` if `word` introduces a unit designator.
#[must_use]
pub fn is_occupancy_type(word: &str) -> bool {
    in_list(OCCUPANCY_TYPES, word)
}

fn join_texts(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.text).collect::<Vec<_>>().join(" ")
}

/// Finds a state name or code ending at `end`.
///
/// A candidate only counts when something anchors it as a trailing part:
/// it sits after a comma, a ZIP follows it, or a street suffix precedes it.
/// Otherwise "500 Virginia" would lose its street name.
fn find_state(tokens: &[Token<'_>], end: usize, has_zip: bool) -> Option<usize> {
    let max_words = states::max_name_words().min(end.saturating_sub(1));

    for words in (1..=max_words).rev() {
        let start = end - words;
        let span = &tokens[start..end];
        if span.iter().any(|t| t.segment != span[0].segment) {
            continue;
        }

        let candidate = join_texts(span);
        let is_name = states::canonical_name(&candidate).is_some();
        let is_code =
            words == 1 && candidate.len() == 2 && states::name_for_code(&candidate).is_some();
        if !is_name && !is_code {
            continue;
        }

        let anchored = span[0].segment > tokens[0].segment
            || has_zip
            || tokens[..start].iter().any(|t| is_street_type(t.text));
        if anchored {
            return Some(start);
        }
    }

    None
}

/// Finds where the place name starts within `tokens[..end]`.
fn find_city(tokens: &[Token<'_>], end: usize, has_trailing_parts: bool) -> Option<usize> {
    let last_segment = tokens[end - 1].segment;

    if last_segment != tokens[0].segment {
        let start = tokens[..end]
            .iter()
            .position(|t| t.segment == last_segment)?;
        let first = tokens[start].text;
        if ADDRESS_NUMBER_RE.is_match(first) || is_occupancy_type(first) {
            return None;
        }
        return Some(start);
    }

    if !has_trailing_parts {
        return None;
    }

    let type_idx = tokens[..end].iter().rposition(|t| is_street_type(t.text))?;
    let mut start = type_idx + 1;
    if start + 1 < end && is_directional(tokens[start].text) {
        start += 1;
    }
    (start < end).then_some(start)
}

fn tag_street_line(tokens: &[Token<'_>]) -> Vec<Tag> {
    let mut tags = vec![Tag::StreetName; tokens.len()];
    let mut start = 0;

    if ADDRESS_NUMBER_RE.is_match(tokens[0].text) && tokens.len() > 1 {
        tags[0] = Tag::AddressNumber;
        start = 1;
    }

    let mut end = tokens[start..]
        .iter()
        .skip(1)
        .position(|t| is_occupancy_type(t.text))
        .map_or(tokens.len(), |pos| start + 1 + pos);
    for (offset, tag) in tags[end..].iter_mut().enumerate() {
        *tag = if offset == 0 {
            Tag::OccupancyType
        } else {
            Tag::OccupancyIdentifier
        };
    }

    if end - start > 1 && is_directional(tokens[start].text) {
        tags[start] = Tag::StreetNamePreDirectional;
        start += 1;
    }
    if end - start > 2
        && is_directional(tokens[end - 1].text)
        && is_street_type(tokens[end - 2].text)
    {
        tags[end - 1] = Tag::StreetNamePostDirectional;
        end -= 1;
    }
    if end - start > 1 && is_street_type(tokens[end - 1].text) {
        tags[end - 1] = Tag::StreetNamePostType;
    }

    tags
}

/// Labels every token of `input`.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is empty, leaves no street line,
/// or has nothing that anchors it as a street address.
pub fn tag_address(input: &str) -> Result<Vec<TaggedToken>, ParseError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut end = tokens.len();
    let zip_idx = (end > 1 && ZIP_RE.is_match(tokens[end - 1].text)).then(|| end - 1);
    if let Some(idx) = zip_idx {
        end = idx;
    }

    let state_idx = find_state(&tokens, end, zip_idx.is_some());
    let street_end = state_idx.unwrap_or(end);
    let city_idx = find_city(
        &tokens,
        street_end,
        state_idx.is_some() || zip_idx.is_some(),
    );
    let line_end = city_idx.unwrap_or(street_end);

    if line_end == 1 && ADDRESS_NUMBER_RE.is_match(tokens[0].text) {
        return Err(ParseError::NoStreetName(input.to_string()));
    }

    let line_tags = tag_street_line(&tokens[..line_end]);
    let anchored = line_tags
        .iter()
        .any(|t| matches!(t, Tag::AddressNumber | Tag::StreetNamePostType))
        || state_idx.is_some()
        || zip_idx.is_some()
        || city_idx.is_some();
    if !anchored {
        return Err(ParseError::Unrecognized(input.to_string()));
    }

    let trailing = (line_end..tokens.len()).map(|i| {
        if Some(i) == zip_idx {
            Tag::ZipCode
        } else if state_idx.is_some_and(|s| i >= s) {
            Tag::StateName
        } else {
            Tag::PlaceName
        }
    });

    Ok(tokens
        .iter()
        .zip(line_tags.into_iter().chain(trailing))
        .map(|(token, tag)| TaggedToken {
            text: token.text.to_string(),
            tag,
        })
        .collect())
}

fn join_tagged(tagged: &[TaggedToken], keep: impl Fn(Tag) -> bool) -> String {
    tagged
        .iter()
        .filter(|t| keep(t.tag))
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses `input` into address components.
///
/// The street name is every street-line token (number included) joined
/// in order. A parsed state is normalized to its full name.
///
/// # Errors
///
/// Returns [`ParseError`] under the same conditions as [`tag_address`].
pub fn parse_address(input: &str) -> Result<AddressComponents, ParseError> {
    let tagged = tag_address(input)?;

    let raw_state = join_tagged(&tagged, |t| t == Tag::StateName);
    let state = if raw_state.is_empty() {
        raw_state
    } else {
        standardize_state(Some(&raw_state)).unwrap_or(raw_state)
    };

    Ok(AddressComponents {
        street_number: join_tagged(&tagged, |t| t == Tag::AddressNumber),
        street_name: join_tagged(&tagged, Tag::is_street_line),
        city: join_tagged(&tagged, |t| t == Tag::PlaceName),
        state,
        zip_code: join_tagged(&tagged, |t| t == Tag::ZipCode),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(input: &str) -> Vec<(String, Tag)> {
        tag_address(input)
            .unwrap()
            .into_iter()
            .map(|t| (t.text, t.tag))
            .collect()
    }

    #[test]
    fn parses_full_comma_separated_address() {
        let parsed = parse_address("123 Main Street, Springfield, IL 62704").unwrap();
        assert_eq!(parsed.street_number, "123");
        assert_eq!(parsed.street_name, "123 Main Street");
        assert_eq!(parsed.city, "Springfield");
        assert_eq!(parsed.state, "Illinois");
        assert_eq!(parsed.zip_code, "62704");
    }

    #[test]
    fn parses_address_without_commas() {
        let parsed = parse_address("500 Elm Avenue Portland Oregon 97201-1234").unwrap();
        assert_eq!(parsed.street_name, "500 Elm Avenue");
        assert_eq!(parsed.city, "Portland");
        assert_eq!(parsed.state, "Oregon");
        assert_eq!(parsed.zip_code, "97201-1234");
    }

    #[test]
    fn parses_multi_word_state_and_city() {
        let parsed =
            parse_address("1600 Pennsylvania Avenue Northwest, Washington, District of Columbia")
                .unwrap();
        assert_eq!(parsed.street_name, "1600 Pennsylvania Avenue Northwest");
        assert_eq!(parsed.city, "Washington");
        assert_eq!(parsed.state, "District of Columbia");
        assert_eq!(parsed.zip_code, "");
    }

    #[test]
    fn tags_directionals_and_suffix() {
        assert_eq!(
            tags("123 Northwest Corner Street"),
            [
                ("123".to_string(), Tag::AddressNumber),
                ("Northwest".to_string(), Tag::StreetNamePreDirectional),
                ("Corner".to_string(), Tag::StreetName),
                ("Street".to_string(), Tag::StreetNamePostType),
            ]
        );
        assert_eq!(
            tags("7 East 4th Street West")
                .into_iter()
                .map(|(_, t)| t)
                .collect::<Vec<_>>(),
            [
                Tag::AddressNumber,
                Tag::StreetNamePreDirectional,
                Tag::StreetName,
                Tag::StreetNamePostType,
                Tag::StreetNamePostDirectional,
            ]
        );
    }

    #[test]
    fn keeps_unit_in_street_name() {
        let parsed = parse_address("12 Elm Boulevard, Apartment 4B, Dayton, OH").unwrap();
        assert_eq!(parsed.street_name, "12 Elm Boulevard Apartment 4B");
        assert_eq!(parsed.city, "Dayton");
        assert_eq!(parsed.state, "Ohio");
    }

    #[test]
    fn does_not_mistake_street_name_for_state() {
        let parsed = parse_address("500 Virginia").unwrap();
        assert_eq!(parsed.street_name, "500 Virginia");
        assert_eq!(parsed.state, "");

        let parsed = parse_address("100 Washington Street").unwrap();
        assert_eq!(parsed.street_name, "100 Washington Street");
        assert_eq!(parsed.city, "");
    }

    #[test]
    fn city_after_comma_without_state() {
        let parsed = parse_address("9 Oak Lane, Springfield").unwrap();
        assert_eq!(parsed.street_name, "9 Oak Lane");
        assert_eq!(parsed.city, "Springfield");
    }

    #[test]
    fn trailing_unit_segment_is_not_a_city() {
        let parsed = parse_address("9 Oak Lane, Suite 200").unwrap();
        assert_eq!(parsed.street_name, "9 Oak Lane Suite 200");
        assert_eq!(parsed.city, "");
    }

    #[test]
    fn ignores_periods_around_tokens() {
        let parsed = parse_address("42 Main Street., Boston, MA.").unwrap();
        assert_eq!(parsed.street_name, "42 Main Street");
        assert_eq!(parsed.state, "Massachusetts");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(parse_address(""), Err(ParseError::Empty));
        assert_eq!(parse_address(" , "), Err(ParseError::Empty));
    }

    #[test]
    fn free_text_is_unrecognized() {
        assert_eq!(
            parse_address("hello world"),
            Err(ParseError::Unrecognized("hello world".to_string()))
        );
    }

    #[test]
    fn bare_number_has_no_street_name() {
        assert_eq!(
            parse_address("123, Springfield, IL"),
            Err(ParseError::NoStreetName("123, Springfield, IL".to_string()))
        );
        assert!(parse_address("62704").is_err());
    }

    #[test]
    fn recognizes_word_lists() {
        assert!(is_street_type("street"));
        assert!(is_street_type("PARKWAY"));
        assert!(!is_street_type("Main"));
        assert!(is_directional("southwest"));
        assert!(is_occupancy_type("Suite"));
    }
}
