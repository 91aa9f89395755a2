//! Match Engine contract and the reference sequence matcher
//!
//! The core only relies on the [`MatchEngine`] invocation contract: given a
//! token stream and a pattern, call `on_match` once per span, in document
//! order. [`SequenceMatcher`] is the engine shipped with the crate.
//!
//! # Reference semantics
//! - Spans never cross a sentence boundary.
//! - Every token position is tried as a start; for each start, the longest
//!   satisfying span is reported (at most one span per start).
//! - Optional steps and bounded wildcards backtrack, so
//!   `sa fille , Euldjia` and `sa fille Euldjia` both match.

use serde::{Deserialize, Serialize};

use super::pattern::{Constraint, PatternDefinition, PatternId};
use super::token::Token;

/// Contiguous token range `[start, end)` satisfying a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSpan {
    pub pattern: PatternId,
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(pattern: PatternId, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "MatchSpan: start must be <= end");
        MatchSpan { pattern, start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    pub fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The matched tokens; empty if the span is out of bounds for `tokens`.
    pub fn tokens<'a>(&self, tokens: &'a [Token]) -> &'a [Token] {
        tokens.get(self.start..self.end).unwrap_or(&[])
    }

    /// Token texts of the span joined by single spaces; not the exact
    /// source slice.
    pub fn text(&self, tokens: &[Token]) -> String {
        self.tokens(tokens)
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Walks a token stream and reports spans satisfying a pattern.
pub trait MatchEngine {
    /// Invoke `on_match` once per span, in left-to-right document order.
    fn find(&self, tokens: &[Token], pattern: &PatternDefinition, on_match: &mut dyn FnMut(MatchSpan));

    fn find_all(&self, tokens: &[Token], pattern: &PatternDefinition) -> Vec<MatchSpan> {
        let mut spans = Vec::new();
        self.find(tokens, pattern, &mut |span| spans.push(span));
        spans
    }
}

/// Backtracking matcher over sentence-bounded token slices.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceMatcher;

impl SequenceMatcher {
    pub fn new() -> Self {
        SequenceMatcher
    }
}

impl MatchEngine for SequenceMatcher {
    fn find(&self, tokens: &[Token], pattern: &PatternDefinition, on_match: &mut dyn FnMut(MatchSpan)) {
        for (sent_start, sent_end) in sentence_bounds(tokens) {
            let sentence = &tokens[sent_start..sent_end];
            for start in 0..sentence.len() {
                if let Some(end) = longest_match(sentence, pattern.constraints(), start) {
                    if end > start {
                        on_match(MatchSpan::new(pattern.id(), sent_start + start, sent_start + end));
                    }
                }
            }
        }
    }
}

/// `(start, end)` token indices of each sentence
pub fn sentence_bounds(tokens: &[Token]) -> Vec<(usize, usize)> {
    let mut bounds = Vec::new();
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if i > start && (token.is_sent_start || token.is_para_start) {
            bounds.push((start, i));
            start = i;
        }
    }
    if start < tokens.len() {
        bounds.push((start, tokens.len()));
    }
    bounds
}

/// End position of the longest way `constraints` can match from `pos`.
fn longest_match(tokens: &[Token], constraints: &[Constraint], pos: usize) -> Option<usize> {
    let Some((head, rest)) = constraints.split_first() else {
        return Some(pos);
    };

    match head {
        Constraint::Anchor(anchor) => {
            if tokens.get(pos).map_or(false, |t| anchor.test(t)) {
                longest_match(tokens, rest, pos)
            } else {
                None
            }
        }
        Constraint::Literal { optional, .. } | Constraint::Attribute { optional, .. } => {
            let taken = match tokens.get(pos) {
                Some(token) if head.accepts(token) => longest_match(tokens, rest, pos + 1),
                _ => None,
            };
            let skipped = if *optional { longest_match(tokens, rest, pos) } else { None };
            taken.max(skipped)
        }
        Constraint::Wildcard { min, max, .. } => {
            let mut available = 0;
            while available < *max && pos + available < tokens.len() && head.accepts(&tokens[pos + available]) {
                available += 1;
            }
            if available < *min {
                return None;
            }
            (*min..=available)
                .rev()
                .filter_map(|count| longest_match(tokens, rest, pos + count))
                .max()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
