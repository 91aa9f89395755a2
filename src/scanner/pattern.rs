//! Pattern Catalog: token-constraint rules for kinship surface forms
//!
//! Each [`PatternDefinition`] is data: an ordered list of [`Constraint`]s
//! evaluated left to right by a [`MatchEngine`](super::matcher::MatchEngine).
//! Definitions are validated when built, so a malformed rule fails at
//! construction and never at match time.
//!
//! # Families
//!
//! | Id                  | Surface form                        | Father | Daughter  |
//! |---------------------|-------------------------------------|--------|-----------|
//! | `FATHER_DAUGHTER_1` | "X, … sa fille [,] Y"               | X      | Y         |
//! | `FATHER_DAUGHTER_2` | "Y, fille de X"                     | X      | Y         |
//! | `FATHER_DAUGHTER_3` | "X … une fille nommée Y"            | X      | Y         |
//! | `FATHER_DAUGHTER_4` | "la/une fille de X"                 | X      | unnamed   |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{KinError, Result};

use super::token::Token;

/// Default upper bound on tokens between a father's name and the relation
/// phrase in the open-distance families.
pub const DEFAULT_MAX_GAP: usize = 60;

/// Upper bound on decorative quote tokens between a relation word and a name.
const MAX_QUOTE_RUN: usize = 3;

/// Open-distance gaps stop at these, so every relation phrase in a sentence
/// gets its own span.
const RELATION_WORDS: &[&str] = &["fille"];

// =============================================================================
// Pattern identifiers
// =============================================================================

/// Closed set of relation families. Each maps to exactly one resolver
/// handler; adding a family means adding a variant and its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternId {
    #[serde(rename = "FATHER_DAUGHTER_1")]
    FatherDaughter1,
    #[serde(rename = "FATHER_DAUGHTER_2")]
    FatherDaughter2,
    #[serde(rename = "FATHER_DAUGHTER_3")]
    FatherDaughter3,
    #[serde(rename = "FATHER_DAUGHTER_4")]
    FatherDaughter4,
}

impl PatternId {
    pub const ALL: [PatternId; 4] = [
        PatternId::FatherDaughter1,
        PatternId::FatherDaughter2,
        PatternId::FatherDaughter3,
        PatternId::FatherDaughter4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternId::FatherDaughter1 => "FATHER_DAUGHTER_1",
            PatternId::FatherDaughter2 => "FATHER_DAUGHTER_2",
            PatternId::FatherDaughter3 => "FATHER_DAUGHTER_3",
            PatternId::FatherDaughter4 => "FATHER_DAUGHTER_4",
        }
    }

    pub fn parse(name: &str) -> Option<PatternId> {
        PatternId::ALL.into_iter().find(|id| id.as_str().eq_ignore_ascii_case(name))
    }

    /// Lowercase phrases at least one of which must occur in a document
    /// for this family to match anywhere.
    pub fn triggers(&self) -> &'static [&'static str] {
        match self {
            PatternId::FatherDaughter1 => &["sa fille"],
            PatternId::FatherDaughter2 => &["fille de", "fille du"],
            PatternId::FatherDaughter3 => &["fille nommée", "fille appelée"],
            PatternId::FatherDaughter4 => &["fille de", "fille du"],
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Constraint AST
// =============================================================================

/// Token attribute tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenAttr {
    /// Capitalized and not punctuation
    Capitalized,
    Punctuation,
    NotPunctuation,
    /// Only directional quotation glyphs
    QuoteMark,
}

impl TokenAttr {
    pub fn test(&self, token: &Token) -> bool {
        match self {
            TokenAttr::Capitalized => token.is_capitalized && !token.is_punct,
            TokenAttr::Punctuation => token.is_punct,
            TokenAttr::NotPunctuation => !token.is_punct,
            TokenAttr::QuoteMark => token.is_quote(),
        }
    }
}

/// Zero-width position tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    SentenceStart,
    ParagraphStart,
}

impl Anchor {
    pub fn test(&self, token: &Token) -> bool {
        match self {
            Anchor::SentenceStart => token.is_sent_start,
            Anchor::ParagraphStart => token.is_para_start,
        }
    }
}

/// One step of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// Case-insensitive literal; any of the lowercase alternatives matches
    Literal { words: Vec<String>, optional: bool },
    /// Attribute test on a single token
    Attribute { attr: TokenAttr, optional: bool },
    /// `min..=max` tokens, each satisfying `only` when set and none equal
    /// to a word in `except`
    Wildcard {
        min: usize,
        max: usize,
        only: Option<TokenAttr>,
        except: Vec<String>,
    },
    /// Zero-width test on the next token; first position only
    Anchor(Anchor),
}

impl Constraint {
    pub fn literal(word: &str) -> Self {
        Constraint::Literal {
            words: vec![word.to_lowercase()],
            optional: false,
        }
    }

    pub fn one_of(words: &[&str]) -> Self {
        Constraint::Literal {
            words: words.iter().map(|w| w.to_lowercase()).collect(),
            optional: false,
        }
    }

    pub fn optional_literal(word: &str) -> Self {
        Constraint::Literal {
            words: vec![word.to_lowercase()],
            optional: true,
        }
    }

    pub fn attr(attr: TokenAttr) -> Self {
        Constraint::Attribute { attr, optional: false }
    }

    pub fn any(min: usize, max: usize) -> Self {
        Constraint::Wildcard {
            min,
            max,
            only: None,
            except: Vec::new(),
        }
    }

    /// Gap that never crosses one of `stop` (lowercase words)
    pub fn any_except(min: usize, max: usize, stop: &[&str]) -> Self {
        Constraint::Wildcard {
            min,
            max,
            only: None,
            except: stop.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn run_of(attr: TokenAttr, min: usize, max: usize) -> Self {
        Constraint::Wildcard {
            min,
            max,
            only: Some(attr),
            except: Vec::new(),
        }
    }

    /// Single-token test, ignoring optionality
    pub fn accepts(&self, token: &Token) -> bool {
        match self {
            Constraint::Literal { words, .. } => {
                let lower = token.text.to_lowercase();
                words.iter().any(|w| *w == lower)
            }
            Constraint::Attribute { attr, .. } => attr.test(token),
            Constraint::Wildcard { only, except, .. } => {
                only.map_or(true, |attr| attr.test(token))
                    && (except.is_empty() || !except.contains(&token.text.to_lowercase()))
            }
            Constraint::Anchor(anchor) => anchor.test(token),
        }
    }

    fn consumes(&self) -> bool {
        !matches!(self, Constraint::Anchor(_))
    }
}

// =============================================================================
// Pattern definitions
// =============================================================================

/// A validated rule: identifier plus constraint sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternDefinition {
    id: PatternId,
    constraints: Vec<Constraint>,
}

impl PatternDefinition {
    pub fn new(id: PatternId, constraints: Vec<Constraint>) -> Result<Self> {
        validate(id, &constraints)?;
        Ok(PatternDefinition { id, constraints })
    }

    pub fn id(&self) -> PatternId {
        self.id
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

fn validate(id: PatternId, constraints: &[Constraint]) -> Result<()> {
    if constraints.is_empty() {
        return Err(KinError::invalid_pattern(id, "pattern has no constraints"));
    }
    if !constraints.iter().any(|c| c.consumes()) {
        return Err(KinError::invalid_pattern(id, "pattern never consumes a token"));
    }
    for (pos, constraint) in constraints.iter().enumerate() {
        match constraint {
            Constraint::Literal { words, .. } => {
                if words.is_empty() {
                    return Err(KinError::invalid_pattern(id, format!("literal at {} has no alternatives", pos)));
                }
                if words.iter().any(|w| w.trim().is_empty()) {
                    return Err(KinError::invalid_pattern(id, format!("literal at {} has a blank alternative", pos)));
                }
                if words.iter().any(|w| *w != w.to_lowercase()) {
                    return Err(KinError::invalid_pattern(id, format!("literal at {} must be lowercase", pos)));
                }
            }
            Constraint::Wildcard { min, max, except, .. } => {
                if min > max {
                    return Err(KinError::invalid_pattern(
                        id,
                        format!("wildcard at {} has min {} > max {}", pos, min, max),
                    ));
                }
                if except.iter().any(|w| w.trim().is_empty() || *w != w.to_lowercase()) {
                    return Err(KinError::invalid_pattern(
                        id,
                        format!("wildcard at {} has a blank or non-lowercase stop word", pos),
                    ));
                }
            }
            Constraint::Anchor(_) => {
                if pos != 0 {
                    return Err(KinError::invalid_pattern(id, format!("anchor at {} is not in first position", pos)));
                }
            }
            Constraint::Attribute { .. } => {}
        }
    }
    Ok(())
}

/// Standard constraint sequence for each family.
pub fn default_constraints(id: PatternId, max_gap: usize) -> Vec<Constraint> {
    match id {
        PatternId::FatherDaughter1 => vec![
            Constraint::attr(TokenAttr::Capitalized),
            Constraint::any_except(0, max_gap, RELATION_WORDS),
            Constraint::literal("sa"),
            Constraint::literal("fille"),
            Constraint::optional_literal(","),
            Constraint::run_of(TokenAttr::QuoteMark, 0, MAX_QUOTE_RUN),
            Constraint::attr(TokenAttr::Capitalized),
        ],
        PatternId::FatherDaughter2 => vec![
            Constraint::attr(TokenAttr::Capitalized),
            Constraint::optional_literal(","),
            Constraint::literal("fille"),
            Constraint::one_of(&["de", "du"]),
            Constraint::attr(TokenAttr::NotPunctuation),
        ],
        PatternId::FatherDaughter3 => vec![
            Constraint::attr(TokenAttr::Capitalized),
            Constraint::any_except(0, max_gap, RELATION_WORDS),
            Constraint::literal("une"),
            Constraint::literal("fille"),
            Constraint::one_of(&["nommée", "appelée"]),
            Constraint::optional_literal(","),
            Constraint::run_of(TokenAttr::QuoteMark, 0, MAX_QUOTE_RUN),
            Constraint::attr(TokenAttr::Capitalized),
        ],
        PatternId::FatherDaughter4 => vec![
            Constraint::one_of(&["la", "une"]),
            Constraint::literal("fille"),
            Constraint::one_of(&["de", "du"]),
            Constraint::attr(TokenAttr::NotPunctuation),
        ],
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Immutable set of pattern definitions, one per enabled family, in
/// identifier order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternCatalog {
    patterns: Vec<PatternDefinition>,
}

impl PatternCatalog {
    /// All families with the default gap.
    pub fn standard() -> Result<Self> {
        Self::with_families(&PatternId::ALL, DEFAULT_MAX_GAP)
    }

    pub fn with_families(ids: &[PatternId], max_gap: usize) -> Result<Self> {
        let mut ids = ids.to_vec();
        ids.sort();
        ids.dedup();
        let patterns = ids
            .into_iter()
            .map(|id| PatternDefinition::new(id, default_constraints(id, max_gap)))
            .collect::<Result<Vec<_>>>()?;
        Ok(PatternCatalog { patterns })
    }

    /// Build from caller-supplied definitions; duplicate ids are rejected.
    pub fn from_definitions(definitions: Vec<PatternDefinition>) -> Result<Self> {
        let mut seen = Vec::with_capacity(definitions.len());
        for def in &definitions {
            if seen.contains(&def.id) {
                return Err(KinError::invalid_pattern(def.id, "duplicate pattern id in catalog"));
            }
            seen.push(def.id);
        }
        Ok(PatternCatalog { patterns: definitions })
    }

    pub fn get(&self, id: PatternId) -> Option<&PatternDefinition> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternDefinition> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::token::TextRange;

    fn tok(text: &str) -> Token {
        Token::new(text, TextRange::new(0, text.len()), 0)
    }

    #[test]
    fn test_standard_catalog_has_all_families() {
        let catalog = PatternCatalog::standard().unwrap();
        assert_eq!(catalog.len(), 4);
        for id in PatternId::ALL {
            assert!(catalog.get(id).is_some(), "missing {}", id);
        }
    }

    #[test]
    fn test_subset_catalog() {
        let catalog = PatternCatalog::with_families(&[PatternId::FatherDaughter4, PatternId::FatherDaughter4], 10).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(PatternId::FatherDaughter1).is_none());
    }

    #[test]
    fn test_pattern_id_names() {
        assert_eq!(PatternId::FatherDaughter1.as_str(), "FATHER_DAUGHTER_1");
        assert_eq!(PatternId::parse("father_daughter_4"), Some(PatternId::FatherDaughter4));
        assert_eq!(PatternId::parse("MOTHER_SON_1"), None);
        assert_eq!(serde_json::to_string(&PatternId::FatherDaughter2).unwrap(), "\"FATHER_DAUGHTER_2\"");
    }

    #[test]
    fn test_rejects_empty_pattern() {
        let err = PatternDefinition::new(PatternId::FatherDaughter1, vec![]).unwrap_err();
        assert!(matches!(err, KinError::InvalidPattern { .. }));
    }

    #[test]
    fn test_rejects_inverted_wildcard() {
        let err = PatternDefinition::new(PatternId::FatherDaughter1, vec![Constraint::any(5, 2)]).unwrap_err();
        assert!(err.to_string().contains("min 5 > max 2"));
    }

    #[test]
    fn test_rejects_misplaced_anchor() {
        let result = PatternDefinition::new(
            PatternId::FatherDaughter1,
            vec![Constraint::literal("sa"), Constraint::Anchor(Anchor::SentenceStart)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_anchor_only_pattern() {
        let result = PatternDefinition::new(PatternId::FatherDaughter1, vec![Constraint::Anchor(Anchor::SentenceStart)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_blank_and_uppercase_literals() {
        let blank = Constraint::Literal { words: vec!["  ".to_string()], optional: false };
        assert!(PatternDefinition::new(PatternId::FatherDaughter4, vec![blank]).is_err());

        let upper = Constraint::Literal { words: vec!["Fille".to_string()], optional: false };
        assert!(PatternDefinition::new(PatternId::FatherDaughter4, vec![upper]).is_err());

        let none = Constraint::Literal { words: vec![], optional: false };
        assert!(PatternDefinition::new(PatternId::FatherDaughter4, vec![none]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_definitions() {
        let a = PatternDefinition::new(PatternId::FatherDaughter4, vec![Constraint::literal("fille")]).unwrap();
        let b = a.clone();
        assert!(PatternCatalog::from_definitions(vec![a, b]).is_err());
    }

    #[test]
    fn test_literal_is_case_insensitive() {
        let c = Constraint::one_of(&["la", "une"]);
        assert!(c.accepts(&tok("La")));
        assert!(c.accepts(&tok("UNE")));
        assert!(!c.accepts(&tok("des")));
    }

    #[test]
    fn test_capitalized_attr_excludes_punctuation() {
        let mut quote = tok("\u{00AB}");
        quote.is_capitalized = true;
        assert!(!TokenAttr::Capitalized.test(&quote));
        assert!(TokenAttr::Capitalized.test(&tok("Euldjia")));
        assert!(!TokenAttr::Capitalized.test(&tok("se")));
    }

    #[test]
    fn test_gap_does_not_accept_relation_word() {
        let gap = Constraint::any_except(0, 10, &["fille"]);
        assert!(gap.accepts(&tok("partit")));
        assert!(!gap.accepts(&tok("fille")));
        assert!(!gap.accepts(&tok("Fille")));
        assert!(Constraint::any(0, 10).accepts(&tok("fille")));
    }

    #[test]
    fn test_rejects_uppercase_stop_word() {
        let gap = Constraint::Wildcard {
            min: 0,
            max: 3,
            only: None,
            except: vec!["Fille".to_string()],
        };
        let result = PatternDefinition::new(PatternId::FatherDaughter1, vec![gap, Constraint::literal("sa")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_triggers_are_lowercase() {
        for id in PatternId::ALL {
            for trigger in id.triggers() {
                assert_eq!(*trigger, trigger.to_lowercase());
            }
        }
    }
}
