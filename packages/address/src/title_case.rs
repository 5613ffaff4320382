//! Capitalization styles.
//!
//! [`apa_title_case`] is used for whole addresses: short closed-class
//! words are lowercased after the first word unless written in all caps,
//! hyphenated words are cased per segment, and every other word is
//! capitalized, so shouted input such as `123 MAIN ST` comes out as
//! `123 Main St`. [`simple_title_case`] capitalizes every token and is
//! used for city names.

/// Closed-class words lowercased when they are not the first word.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "for", "nor", "in", "on", "at", "by", "to", "of", "via",
];

/// First character uppercased, the rest lowercased.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Returns `true` if `word` has at least one cased letter and no
/// lowercase letters.
#[must_use]
pub fn is_all_uppercase(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

fn is_small_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    SMALL_WORDS.contains(&lower.as_str())
}

fn case_word(word: &str) -> String {
    if word.contains('-') {
        return word.split('-').map(capitalize).collect::<Vec<_>>().join("-");
    }
    if is_small_word(word) && word.chars().count() < 4 {
        // Small words kept in caps read as acronyms (`OR` for Oregon).
        if is_all_uppercase(word) {
            return word.to_string();
        }
        return word.to_lowercase();
    }
    capitalize(word)
}

/// APA-style title case over whitespace-separated words.
///
/// Words are rejoined with single spaces.
#[must_use]
pub fn apa_title_case(input: &str) -> String {
    input
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| if i == 0 { capitalize(word) } else { case_word(word) })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalizes every whitespace-separated word.
#[must_use]
pub fn simple_title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_first_word_regardless_of_content() {
        assert_eq!(apa_title_case("the end"), "The End");
        assert_eq!(apa_title_case("BROWN fox"), "Brown Fox");
    }

    #[test]
    fn lowercases_small_words_after_first() {
        assert_eq!(apa_title_case("the quick BROWN fox"), "The Quick Brown Fox");
        assert_eq!(
            apa_title_case("500 boulevard OF the allies"),
            "500 Boulevard OF the Allies"
        );
        assert_eq!(apa_title_case("avenue Of The Stars"), "Avenue of the Stars");
    }

    #[test]
    fn keeps_all_caps_small_words() {
        assert_eq!(apa_title_case("Portland OR"), "Portland OR");
        assert_eq!(apa_title_case("walk BY the park"), "Walk BY the Park");
    }

    #[test]
    fn recases_all_caps_words() {
        assert_eq!(
            apa_title_case("123 MAIN STREET SPRINGFIELD"),
            "123 Main Street Springfield"
        );
        assert_eq!(
            apa_title_case("THE OLD MILL BY THE RIVER"),
            "The Old Mill BY THE River"
        );
        assert_eq!(apa_title_case("123 Main Street, IL"), "123 Main Street, Il");
    }

    #[test]
    fn cases_hyphenated_segments() {
        assert_eq!(apa_title_case("12 wilkes-barre ROAD"), "12 Wilkes-Barre Road");
        assert_eq!(apa_title_case("x up-TO-date"), "X Up-To-Date");
    }

    #[test]
    fn flattens_internal_capitals() {
        assert_eq!(apa_title_case("old McDonald farm"), "Old Mcdonald Farm");
    }

    #[test]
    fn keeps_expansions_as_written() {
        assert_eq!(
            apa_title_case("123 Northwest Corner Street"),
            "123 Northwest Corner Street"
        );
    }

    #[test]
    fn long_small_word_candidates_are_capitalized() {
        assert_eq!(apa_title_case("walk via the park"), "Walk via the Park");
        assert_eq!(apa_title_case("one from two"), "One From Two");
    }

    #[test]
    fn empty_and_whitespace() {
        assert_eq!(apa_title_case(""), "");
        assert_eq!(apa_title_case("   "), "");
        assert_eq!(simple_title_case(""), "");
    }

    #[test]
    fn simple_title_case_capitalizes_every_word() {
        assert_eq!(simple_title_case("SAN LUIS of obispo"), "San Luis Of Obispo");
        assert_eq!(simple_title_case("winston-salem"), "Winston-salem");
    }

    #[test]
    fn detects_all_uppercase() {
        assert!(is_all_uppercase("OR"));
        assert!(is_all_uppercase("1ST"));
        assert!(!is_all_uppercase("123"));
        assert!(!is_all_uppercase("Or"));
    }
}
