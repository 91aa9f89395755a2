//! Token contract and the reference French tokenizer.
//!
//! Everything downstream of this module (merger, matcher, resolver) reads
//! tokens only through the fields of [`Token`]: literal text, byte range,
//! capitalization, punctuation, and sentence/paragraph start markers.
//! Callers that bring their own parser build [`Token`]s directly.
//!
//! # Tokenizer rules
//!
//! | Step        | Rule                                                    |
//! |-------------|---------------------------------------------------------|
//! | Paragraphs  | split on blank lines                                    |
//! | Words       | Unicode word boundaries (UAX #29), whitespace dropped   |
//! | Sentences   | `. ! ? …` followed by a capitalized token               |
//!
//! Hyphenated names come out as three tokens ("Bou", "-", "Aziz"); joining
//! them is the merger's job.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

// =============================================================================
// Core Types
// =============================================================================

/// Text range (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "TextRange: start must be <= end");
        TextRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Extract the text slice from a source string
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// True when `other` begins exactly where this range ends
    pub fn touches(&self, other: &TextRange) -> bool {
        self.end == other.start
    }

    /// Smallest range covering both
    pub fn cover(&self, other: &TextRange) -> TextRange {
        TextRange::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        TextRange::new(range.start, range.end)
    }
}

/// A parsed token. Immutable once produced; the merger builds new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub range: TextRange,
    /// Position within the document's token sequence
    pub index: usize,
    pub is_capitalized: bool,
    pub is_punct: bool,
    pub is_sent_start: bool,
    pub is_para_start: bool,
}

impl Token {
    /// Build a token, deriving the capitalization and punctuation flags
    /// from its text.
    pub fn new(text: impl Into<String>, range: TextRange, index: usize) -> Self {
        let text = text.into();
        let is_capitalized = is_capitalized_text(&text);
        let is_punct = is_punct_text(&text);
        Token {
            text,
            range,
            index,
            is_capitalized,
            is_punct,
            is_sent_start: false,
            is_para_start: false,
        }
    }

    pub fn with_boundaries(mut self, sent_start: bool, para_start: bool) -> Self {
        self.is_sent_start = sent_start || para_start;
        self.is_para_start = para_start;
        self
    }

    /// Case-insensitive comparison against a lowercase word
    pub fn is_word(&self, lowercase: &str) -> bool {
        self.text.to_lowercase() == lowercase
    }

    /// Token made only of directional quotation glyphs
    pub fn is_quote(&self) -> bool {
        is_quote_text(&self.text)
    }

    pub fn is_hyphen(&self) -> bool {
        is_hyphen_text(&self.text)
    }

    pub fn is_comma(&self) -> bool {
        self.text == ","
    }
}

// =============================================================================
// Character classes
// =============================================================================

/// Directional and typographic quotation marks, including the French
/// guillemets used to continue quoted speech across line breaks.
pub fn is_quote_char(c: char) -> bool {
    matches!(
        c,
        '"' | '\u{00AB}' | '\u{00BB}' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}'
            | '\u{2039}' | '\u{203A}'
    )
}

pub fn is_quote_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_quote_char)
}

pub fn is_hyphen_text(text: &str) -> bool {
    matches!(text, "-" | "\u{2010}" | "\u{2011}")
}

fn is_capitalized_text(text: &str) -> bool {
    text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

fn is_punct_text(text: &str) -> bool {
    !text.chars().any(|c| c.is_alphanumeric())
}

fn is_terminal(text: &str) -> bool {
    matches!(text, "." | "!" | "?" | "\u{2026}")
}

/// Tokens that may sit between a sentence terminator and the next
/// sentence's first word: closing quotes, brackets, repeated dots.
fn is_trailing_punct(token: &Token) -> bool {
    token.is_quote() || is_terminal(&token.text) || matches!(token.text.as_str(), ")" | "]")
}

// =============================================================================
// Tokenizer
// =============================================================================

/// Abbreviations whose period does not end a sentence
const ABBREVIATIONS: &[&str] = &[
    "M", "MM", "Mme", "Mmes", "Mlle", "Mlles", "Mgr", "Dr", "St", "Ste", "Cie",
    "etc", "cf", "p", "pp", "t", "vol", "chap", "fig", "éd", "av", "apr", "env",
];

fn paragraph_break() -> &'static Regex {
    static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();
    PARAGRAPH_BREAK.get_or_init(|| {
        Regex::new(r"\r?\n[ \t]*\r?\n\s*").expect("paragraph break pattern is valid")
    })
}

/// Rule-based tokenizer for French prose.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    abbreviations: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer {
            abbreviations: ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Tokenize a document: paragraphs, then words, then sentence starts.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();

        for para in detect_paragraphs(text) {
            let slice = para.slice(text);
            let mut first = true;
            for (offset, segment) in slice.split_word_bound_indices() {
                if segment.chars().all(char::is_whitespace) {
                    continue;
                }
                let start = para.start + offset;
                let range = TextRange::new(start, start + segment.len());
                let token = Token::new(segment, range, tokens.len()).with_boundaries(false, first);
                tokens.push(token);
                first = false;
            }
        }

        self.mark_sentences(&mut tokens);
        tokens
    }

    /// A terminator starts a new sentence at the next capitalized word,
    /// unless it is the period of an abbreviation or an initial.
    fn mark_sentences(&self, tokens: &mut [Token]) {
        let mut i = 0;
        while i < tokens.len() {
            if !is_terminal(&tokens[i].text) || (tokens[i].text == "." && self.is_abbreviation(tokens, i)) {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < tokens.len() && !tokens[j].is_para_start && is_trailing_punct(&tokens[j]) {
                j += 1;
            }
            if j < tokens.len() && tokens[j].is_capitalized {
                tokens[j].is_sent_start = true;
            }
            i = j.max(i + 1);
        }
    }

    fn is_abbreviation(&self, tokens: &[Token], period: usize) -> bool {
        let Some(prev) = period.checked_sub(1).map(|p| &tokens[p]) else {
            return false;
        };
        if !prev.range.touches(&tokens[period].range) {
            return false;
        }
        if self.abbreviations.contains(prev.text.as_str()) {
            return true;
        }
        // Single capital initial: "J. Dupont"
        let mut chars = prev.text.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
    }
}

/// Paragraph ranges separated by blank lines, trimmed of surrounding
/// whitespace. Empty paragraphs are dropped.
pub fn detect_paragraphs(text: &str) -> Vec<TextRange> {
    let mut paragraphs = Vec::new();
    let mut start = 0;

    let mut push = |from: usize, to: usize| {
        let slice = &text[from..to];
        let lead = slice.len() - slice.trim_start().len();
        let trimmed = slice.trim();
        if !trimmed.is_empty() {
            paragraphs.push(TextRange::new(from + lead, from + lead + trimmed.len()));
        }
    };

    for brk in paragraph_break().find_iter(text) {
        push(start, brk.start());
        start = brk.end();
    }
    push(start, text.len());

    paragraphs
}

// =============================================================================
// Tests
// =============================================================================
