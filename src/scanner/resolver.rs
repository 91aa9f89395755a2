//! Relationship Resolver - turns match spans into relationship records
//!
//! One handler per [`PatternId`], dispatched with a `match`. A handler
//! reads the span (plus a short lookahead inside the sentence) and either
//! appends exactly one [`Relationship`] or nothing. Unresolvable slots are
//! the common case, not an error.
//!
//! # Name slots
//! A token fills a name slot only if it is capitalized, not punctuation,
//! not a quotation glyph, not an elided function word ("D’après",
//! "Lorsqu’il") and not on the configured denylist.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::matcher::MatchSpan;
use super::pattern::PatternId;
use super::relationship::{Daughter, Relationship, RelationshipCollection};
use super::token::{is_quote_text, Token};

/// Capitalized tokens that are never personal names: pronouns, determiners,
/// sentence-initial function words, and quote glyphs some parsers flag as
/// capitalized.
pub const DEFAULT_DENYLIST: &[&str] = &[
    // Pronouns
    "Il", "Ils", "Elle", "Elles", "On", "Je", "Tu", "Nous", "Vous", "Lui", "Leur", "Eux",
    "Ce", "Ceci", "Cela", "Ça", "Celui", "Celle", "Ceux", "Celles", "Qui", "Que", "Quoi",
    "Dont", "Où", "Lequel", "Laquelle",
    // Determiners
    "Le", "La", "Les", "Un", "Une", "Des", "Du", "De", "Au", "Aux", "Son", "Sa", "Ses",
    "Mon", "Ma", "Mes", "Ton", "Ta", "Tes", "Notre", "Nos", "Votre", "Vos", "Leurs",
    "Cet", "Cette", "Ces", "Tout", "Toute", "Tous", "Toutes", "Chaque", "Plusieurs",
    "Quelques", "Aucun", "Aucune",
    // Conjunctions, adverbs, prepositions
    "Et", "Ou", "Mais", "Donc", "Or", "Ni", "Car", "Puis", "Alors", "Ensuite", "Enfin",
    "Lorsque", "Quand", "Comme", "Si", "Ainsi", "Après", "Avant", "Depuis", "Pendant",
    "Selon", "Dans", "Sur", "Sous", "Par", "Pour", "Avec", "Sans", "Chez", "Vers", "Entre",
    "Contre", "En", "À", "Y", "Ne", "Non", "Oui", "Cependant", "Pourtant", "Toutefois",
    "Néanmoins", "Aussi", "Même", "Déjà", "Bientôt", "Jamais", "Toujours", "Voici",
    "Voilà", "Parce", "Puisque", "Tandis",
    // Quote glyphs
    "\u{00AB}", "\u{00BB}", "\u{201C}", "\u{201D}", "\u{201E}", "\"", "\u{2039}", "\u{203A}",
];

/// Elided prefixes: a token "D’après" or "Qu’il" is never a name.
const ELIDED_PREFIXES: &[&str] = &[
    "l", "d", "qu", "lorsqu", "puisqu", "jusqu", "quoiqu", "n", "s", "c", "j", "m", "t",
];

/// Words after which a capitalized token names a place or a complement
const PREPOSITIONS: &[&str] = &[
    "à", "de", "du", "des", "en", "dans", "chez", "vers", "sur", "par", "pour", "depuis", "contre",
];

fn default_denylist() -> Vec<String> {
    DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect()
}

/// Resolver configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Replaces the built-in denylist when provided
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
    /// Appended to `denylist`
    #[serde(default)]
    pub extra_denylist: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            denylist: default_denylist(),
            extra_denylist: Vec::new(),
        }
    }
}

/// Stateless apart from its denylist; safe to share across threads.
#[derive(Debug, Clone)]
pub struct Resolver {
    denylist: HashSet<String>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

impl Resolver {
    pub fn new(config: &ResolverConfig) -> Self {
        let denylist = config
            .denylist
            .iter()
            .chain(config.extra_denylist.iter())
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Resolver { denylist }
    }

    pub fn is_denylisted(&self, text: &str) -> bool {
        self.denylist.contains(text.trim())
    }

    /// Resolve one span into `collection`. Returns whether a relationship
    /// was appended.
    pub fn resolve(&self, tokens: &[Token], span: MatchSpan, collection: &mut RelationshipCollection) -> bool {
        if span.is_empty() || span.end > tokens.len() || collection.is_resolved(&span) {
            return false;
        }

        let relationship = match span.pattern {
            PatternId::FatherDaughter1 => self.father_daughter_1(tokens, span),
            PatternId::FatherDaughter2 => self.father_daughter_2(tokens, span),
            PatternId::FatherDaughter3 => self.father_daughter_3(tokens, span),
            PatternId::FatherDaughter4 => self.father_daughter_4(tokens, span),
        };

        match relationship {
            Some(r) if !collection.has_duplicate(&r) => {
                #[cfg(target_arch = "wasm32")]
                web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&format!(
                    "[Resolver] {} at {}..{}",
                    r, span.start, span.end
                )));
                collection.push(r);
                true
            }
            _ => false,
        }
    }

    /// "X, … sa fille [,] Y"
    fn father_daughter_1(&self, tokens: &[Token], span: MatchSpan) -> Option<Relationship> {
        let phrase = find_phrase_backward(tokens, span, &["sa", "fille"])?;
        let daughter = self.name_after(tokens, phrase + 2)?;
        let father = self.nearest_name_before(tokens, span.start, phrase)?;
        Relationship::new(father, Daughter::Named(daughter), span)
    }

    /// "Y, fille de X"
    fn father_daughter_2(&self, tokens: &[Token], span: MatchSpan) -> Option<Relationship> {
        let daughter = self.name_at(tokens, span.start)?;
        let fille = find_phrase_backward(tokens, span, &["fille"])?;
        let father = self.name_at(tokens, fille + 2)?;
        Relationship::new(father, Daughter::Named(daughter), span)
    }

    /// "X … une fille nommée Y"
    fn father_daughter_3(&self, tokens: &[Token], span: MatchSpan) -> Option<Relationship> {
        let phrase = find_phrase_backward(tokens, span, &["une", "fille"])?;
        let daughter = self.name_after(tokens, phrase + 3)?;
        let father = self.nearest_name_before(tokens, span.start, phrase)?;
        Relationship::new(father, Daughter::Named(daughter), span)
    }

    /// "la/une fille de X"; the daughter is not named
    fn father_daughter_4(&self, tokens: &[Token], span: MatchSpan) -> Option<Relationship> {
        let fille = find_phrase_backward(tokens, span, &["fille"])?;
        let father = self.name_at(tokens, fille + 2)?;
        Relationship::new(father, Daughter::Unnamed, span)
    }

    fn is_name(&self, token: &Token) -> bool {
        token.is_capitalized
            && !token.is_punct
            && !is_quote_text(&token.text)
            && !is_elided(&token.text)
            && !self.is_denylisted(&token.text)
    }

    fn name_at(&self, tokens: &[Token], index: usize) -> Option<String> {
        tokens
            .get(index)
            .filter(|t| self.is_name(t))
            .map(|t| t.text.clone())
    }

    /// Name slot starting at `from`: at most one comma, then any quote
    /// tokens, then the name itself. Never crosses into the next sentence.
    fn name_after(&self, tokens: &[Token], from: usize) -> Option<String> {
        let mut i = from;
        if tokens.get(i).map_or(false, |t| t.is_comma()) {
            i += 1;
        }
        while tokens.get(i).map_or(false, |t| t.is_quote() && !t.is_sent_start) {
            i += 1;
        }
        match tokens.get(i) {
            Some(t) if i > from && t.is_sent_start => None,
            _ => self.name_at(tokens, i),
        }
    }

    /// Name closest to the relation phrase in `[start, end)`. Names
    /// governed by a preposition ("à Tunis", "de Constantine") are
    /// complements, not subjects, and are passed over.
    fn nearest_name_before(&self, tokens: &[Token], start: usize, end: usize) -> Option<String> {
        if end > tokens.len() {
            return None;
        }
        (start..end)
            .rev()
            .find(|&i| self.is_name(&tokens[i]) && !follows_preposition(tokens, i))
            .map(|i| tokens[i].text.clone())
    }
}

/// Start index of the last occurrence of `words` inside the span
fn find_phrase_backward(tokens: &[Token], span: MatchSpan, words: &[&str]) -> Option<usize> {
    if span.len() < words.len() {
        return None;
    }
    (span.start..=span.end - words.len()).rev().find(|&i| {
        words
            .iter()
            .enumerate()
            .all(|(offset, word)| tokens.get(i + offset).map_or(false, |t| t.is_word(word)))
    })
}

fn follows_preposition(tokens: &[Token], index: usize) -> bool {
    index
        .checked_sub(1)
        .and_then(|prev| tokens.get(prev))
        .map_or(false, |t| PREPOSITIONS.contains(&t.text.to_lowercase().as_str()))
}

fn is_elided(text: &str) -> bool {
    let Some(pos) = text.find(|c: char| c == '\'' || c == '\u{2019}') else {
        return false;
    };
    let prefix = text[..pos].to_lowercase();
    ELIDED_PREFIXES.contains(&prefix.as_str())
}

// =============================================================================
// Tests
// =============================================================================
