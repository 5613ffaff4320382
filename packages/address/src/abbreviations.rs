//! Directional and street-type abbreviation expansion.
//!
//! Rules live in `rules/abbreviations.toml`, embedded at compile time.
//! The file is an ordered list of passes, each an ordered list of
//! rules, and expansion applies them strictly in that order. Order is
//! significant: compound directionals (`nw`, `se`, ...) run before the
//! street-type pass so a bare `se` becomes "Southeast" and the later
//! `se` -> "Section" rule never sees it.

use regex::{NoExpand, Regex};
use serde::Deserialize;
use std::sync::LazyLock;

const EMBEDDED_RULES: &str = include_str!("../rules/abbreviations.toml");

/// The compiled embedded rule table.
static DEFAULT_TABLE: LazyLock<AbbreviationTable> = LazyLock::new(|| {
    AbbreviationTable::from_toml(EMBEDDED_RULES)
        .unwrap_or_else(|e| panic!("Failed to load embedded abbreviation rules: {e}"))
});

/// Errors from loading an abbreviation rule table.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// The TOML document is malformed or has the wrong shape.
    #[error("Invalid rules file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A rule produced a pattern the regex engine rejected.
    #[error("Invalid pattern for '{abbreviation}': {source}")]
    Pattern {
        /// The abbreviation whose pattern failed to compile.
        abbreviation: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// A rule lists no abbreviations.
    #[error("Rule for '{0}' has no abbreviations")]
    EmptyRule(String),
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    passes: Vec<RulePass>,
}

/// One ordered group of rules.
#[derive(Debug, Clone, Deserialize)]
pub struct RulePass {
    /// Pass identifier, used in logs and tests.
    pub name: String,
    /// Rules in evaluation order.
    pub rules: Vec<Rule>,
}

/// Abbreviations that all expand to the same word.
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    /// Lowercase abbreviations, matched case-insensitively.
    pub abbreviations: Vec<String>,
    /// Replacement text, already in output casing.
    pub expansion: String,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Regex,
    expansion: String,
}

#[derive(Debug, Clone)]
struct CompiledPass {
    name: String,
    rules: Vec<CompiledRule>,
}

/// An ordered, compiled set of expansion passes.
#[derive(Debug, Clone)]
pub struct AbbreviationTable {
    passes: Vec<CompiledPass>,
}

impl AbbreviationTable {
    /// Parses and compiles a rule table from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] if the document does not deserialize, a rule
    /// has no abbreviations, or a pattern fails to compile.
    pub fn from_toml(source: &str) -> Result<Self, RulesError> {
        let file: RulesFile = toml::de::from_str(source)?;

        let passes = file
            .passes
            .into_iter()
            .map(|pass| {
                let rules = pass
                    .rules
                    .into_iter()
                    .map(compile_rule)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledPass {
                    name: pass.name,
                    rules,
                })
            })
            .collect::<Result<Vec<_>, RulesError>>()?;

        Ok(Self { passes })
    }

    /// Returns the table embedded in the binary.
    #[must_use]
    pub fn embedded() -> &'static Self {
        &DEFAULT_TABLE
    }

    /// Pass names in evaluation order.
    pub fn pass_names(&self) -> impl Iterator<Item = &str> {
        self.passes.iter().map(|p| p.name.as_str())
    }

    /// Applies every pass, in order, to `input`.
    #[must_use]
    pub fn expand(&self, input: &str) -> String {
        let mut text = input.to_string();
        for pass in &self.passes {
            for rule in &pass.rules {
                if rule.pattern.is_match(&text) {
                    text = rule
                        .pattern
                        .replace_all(&text, NoExpand(&rule.expansion))
                        .into_owned();
                }
            }
        }
        text
    }
}

/// Builds the whole-word pattern for a rule.
///
/// Word-character abbreviations are wrapped in `\b` anchors; a symbol
/// such as `#` has no word boundary of its own and matches bare.
fn compile_rule(rule: Rule) -> Result<CompiledRule, RulesError> {
    if rule.abbreviations.is_empty() {
        return Err(RulesError::EmptyRule(rule.expansion));
    }

    let alternatives: Vec<String> = rule
        .abbreviations
        .iter()
        .map(|abbr| {
            let escaped = regex::escape(abbr);
            if abbr.chars().all(|c| c.is_alphanumeric() || c == '_') {
                format!(r"\b{escaped}\b")
            } else {
                escaped
            }
        })
        .collect();

    let source = format!(r"(?i)(?:{})\.?", alternatives.join("|"));
    let pattern = Regex::new(&source).map_err(|source| RulesError::Pattern {
        abbreviation: rule.abbreviations.join("/"),
        source,
    })?;

    Ok(CompiledRule {
        pattern,
        expansion: rule.expansion,
    })
}

/// Expands abbreviations using the embedded rule table.
#[must_use]
pub fn expand_abbreviations(input: &str) -> String {
    DEFAULT_TABLE.expand(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_rules_load_in_order() {
        let names: Vec<&str> = AbbreviationTable::embedded().pass_names().collect();
        assert_eq!(names, ["compound_directionals", "street_types"]);
    }

    #[test]
    fn expands_whole_words_only() {
        assert_eq!(expand_abbreviations("Coral St"), "Coral Street");
        assert_eq!(expand_abbreviations("1st Ave"), "1st Avenue");
        assert_eq!(expand_abbreviations("Street"), "Street");
        assert_eq!(expand_abbreviations("Stone Rd"), "Stone Road");
    }

    #[test]
    fn compound_directional_wins_over_corner() {
        assert_eq!(expand_abbreviations("NW corner"), "Northwest corner");
    }

    #[test]
    fn consumes_trailing_period() {
        assert_eq!(
            expand_abbreviations("123 nw cor. st."),
            "123 Northwest Corner Street"
        );
        assert_eq!(
            expand_abbreviations("12 Elm Blvd., Apt. 4"),
            "12 Elm Boulevard, Apartment 4"
        );
    }

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(expand_abbreviations("5 OAK AVE"), "5 OAK Avenue");
        assert_eq!(expand_abbreviations("5 oak Avn"), "5 oak Avenue");
        assert_eq!(expand_abbreviations("9 Blue PKWY"), "9 Blue Parkway");
    }

    #[test]
    fn expands_single_directionals() {
        assert_eq!(expand_abbreviations("100 N State St"), "100 North State Street");
        assert_eq!(expand_abbreviations("7 e 4th st w"), "7 East 4th Street West");
    }

    #[test]
    fn bare_se_is_southeast_not_section() {
        assert_eq!(expand_abbreviations("400 se 2nd ave"), "400 Southeast 2nd Avenue");
    }

    #[test]
    fn state_codes_that_are_also_abbreviations_expand() {
        assert_eq!(expand_abbreviations("Miami, FL 33101"), "Miami, Floor 33101");
        assert_eq!(expand_abbreviations("Hartford, CT 06103"), "Hartford, Court 06103");
        assert_eq!(expand_abbreviations("Omaha, NE 68102"), "Omaha, Northeast 68102");
        assert_eq!(expand_abbreviations("Boise, ID 83702"), "Boise, ID 83702");
    }

    #[test]
    fn hash_expands_to_number() {
        assert_eq!(expand_abbreviations("Suite #5"), "Suite Number5");
        assert_eq!(expand_abbreviations("ste no. 5"), "Suite Number 5");
    }

    #[test]
    fn custom_tables_follow_file_order() {
        let table = AbbreviationTable::from_toml(
            r#"
            [[passes]]
            name = "only"
            rules = [
              { abbreviations = ["mt"], expansion = "Mount" },
              { abbreviations = ["mount"], expansion = "Mountain" },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(table.expand("Mt Hood"), "Mountain Hood");
    }

    #[test]
    fn rejects_rule_without_abbreviations() {
        let err = AbbreviationTable::from_toml(
            r#"
            [[passes]]
            name = "broken"
            rules = [{ abbreviations = [], expansion = "Nothing" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RulesError::EmptyRule(ref e) if e == "Nothing"));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            AbbreviationTable::from_toml("passes = 3"),
            Err(RulesError::Toml(_))
        ));
    }
}
