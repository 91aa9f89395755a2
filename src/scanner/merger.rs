//! Token Merger - repairs tokenization artifacts before matching
//!
//! Runs once per document, after parsing and before any pattern is
//! evaluated. Every naming slot in the catalog assumes a personal name is
//! exactly one token, and that quotation glyphs are never names.
//!
//! | Input tokens              | Output token   | Rule                      |
//! |---------------------------|----------------|---------------------------|
//! | `Bou` `-` `Aziz`          | `Bou-Aziz`     | hyphenated proper name    |
//! | `Ben` `-` `Abd` `-` `Allah` | `Ben-Abd-Allah` | chains extend greedily |
//! | `«` `«`                   | `««`           | quote run, punctuation    |
//!
//! Only byte-adjacent tokens are joined, so merged text is always the exact
//! source slice and `"Tunis - Alger"` stays three tokens.

use serde::{Deserialize, Serialize};

use super::token::Token;

/// Counters describing one merge pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub hyphenated_names: usize,
    pub quote_runs: usize,
}

/// Pure, single-pass rewrite of a document's token stream.
pub fn merge_tokens(tokens: &[Token]) -> Vec<Token> {
    merge_tokens_with_stats(tokens).0
}

pub fn merge_tokens_with_stats(tokens: &[Token]) -> (Vec<Token>, MergeStats) {
    let mut stats = MergeStats {
        input_tokens: tokens.len(),
        ..MergeStats::default()
    };
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if token.is_quote() {
            let mut run = as_punctuation(token.clone());
            let mut j = i + 1;
            while j < tokens.len() && joins_quote_run(&run, &tokens[j]) {
                absorb(&mut run, &tokens[j]);
                j += 1;
            }
            if j > i + 1 {
                stats.quote_runs += 1;
            }
            merged.push(run);
            i = j;
            continue;
        }

        if is_name_part(token) {
            let mut name = token.clone();
            let mut j = i + 1;
            while continues_hyphenated_name(&name, tokens, j) {
                absorb(&mut name, &tokens[j]);
                absorb(&mut name, &tokens[j + 1]);
                j += 2;
            }
            if j > i + 1 {
                stats.hyphenated_names += 1;
            }
            merged.push(name);
            i = j;
            continue;
        }

        merged.push(token.clone());
        i += 1;
    }

    for (index, token) in merged.iter_mut().enumerate() {
        token.index = index;
    }
    stats.output_tokens = merged.len();

    (merged, stats)
}

fn is_name_part(token: &Token) -> bool {
    token.is_capitalized && !token.is_punct
}

/// `current` `-` `Capitalized`, all touching, none opening a paragraph
fn continues_hyphenated_name(current: &Token, tokens: &[Token], at: usize) -> bool {
    let (Some(hyphen), Some(part)) = (tokens.get(at), tokens.get(at + 1)) else {
        return false;
    };
    hyphen.is_hyphen()
        && is_name_part(part)
        && !hyphen.is_para_start
        && !part.is_para_start
        && current.range.touches(&hyphen.range)
        && hyphen.range.touches(&part.range)
}

fn joins_quote_run(run: &Token, next: &Token) -> bool {
    next.is_quote() && !next.is_para_start && run.range.touches(&next.range)
}

/// External parsers sometimes flag guillemets as capitalized words.
fn as_punctuation(mut token: Token) -> Token {
    token.is_punct = true;
    token.is_capitalized = false;
    token
}

/// Flags stay those of the first constituent.
fn absorb(target: &mut Token, next: &Token) {
    target.text.push_str(&next.text);
    target.range = target.range.cover(&next.range);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::token::{TextRange, Tokenizer};

    fn tokenize(text: &str) -> Vec<Token> {
        Tokenizer::new().tokenize(text)
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_merges_hyphenated_name() {
        let merged = merge_tokens(&tokenize("Bou-Aziz partit"));
        assert_eq!(texts(&merged), vec!["Bou-Aziz", "partit"]);
        assert!(merged[0].is_capitalized);
        assert!(!merged[0].is_punct);
    }

    #[test]
    fn test_merges_chain_in_one_pass() {
        let (merged, stats) = merge_tokens_with_stats(&tokenize("Ben-Abd-Allah vint"));
        assert_eq!(texts(&merged), vec!["Ben-Abd-Allah", "vint"]);
        assert_eq!(stats.hyphenated_names, 1);
    }

    #[test]
    fn test_does_not_merge_lowercase_compounds() {
        let merged = merge_tokens(&tokenize("allons nous-mêmes"));
        assert_eq!(texts(&merged), vec!["allons", "nous", "-", "mêmes"]);
    }

    #[test]
    fn test_does_not_merge_across_whitespace() {
        let merged = merge_tokens(&tokenize("Tunis - Alger"));
        assert_eq!(texts(&merged), vec!["Tunis", "-", "Alger"]);
    }

    #[test]
    fn test_does_not_merge_when_second_part_lowercase() {
        let merged = merge_tokens(&tokenize("Saint-germain"));
        assert_eq!(texts(&merged), vec!["Saint", "-", "germain"]);
    }

    #[test]
    fn test_quote_run_coalesces_and_is_punctuation() {
        let mut tokens = vec![
            Token::new("\u{00AB}", TextRange::new(0, 2), 0),
            Token::new("\u{00AB}", TextRange::new(2, 4), 1),
            Token::new("Puisque", TextRange::new(5, 12), 2),
        ];
        // Simulate a parser that misflags the guillemet as a capitalized word
        tokens[0].is_capitalized = true;
        tokens[0].is_punct = false;

        let (merged, stats) = merge_tokens_with_stats(&tokens);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "\u{00AB}\u{00AB}");
        assert!(merged[0].is_punct);
        assert!(!merged[0].is_capitalized);
        assert_eq!(stats.quote_runs, 1);
    }

    #[test]
    fn test_preserves_character_content() {
        let text = "Bou-Aziz, lorsque sa fille « se fit « et Ben-Gana.";
        let tokens = tokenize(text);
        let merged = merge_tokens(&tokens);

        let original: String = tokens.iter().map(|t| t.text.as_str()).collect();
        let rewritten: String = merged.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(original, rewritten);

        for token in &merged {
            assert_eq!(token.range.slice(text), token.text);
        }
        assert!(merged.len() <= tokens.len());
    }

    #[test]
    fn test_renumbers_indices() {
        let merged = merge_tokens(&tokenize("la fille de Ben-Gana, ne lui"));
        for (i, token) in merged.iter().enumerate() {
            assert_eq!(token.index, i);
        }
    }

    #[test]
    fn test_idempotent() {
        let text = "Bou-Aziz et Ben-Abd-Allah dirent « « Allons » à Saint-germain.";
        let once = merge_tokens(&tokenize(text));
        let (twice, stats) = merge_tokens_with_stats(&once);
        assert_eq!(once, twice);
        assert_eq!(stats.hyphenated_names, 0);
        assert_eq!(stats.quote_runs, 0);
    }

    #[test]
    fn test_keeps_boundary_flags_of_first_part() {
        let merged = merge_tokens(&tokenize("Fin. Bou-Aziz partit."));
        let name = merged.iter().find(|t| t.text == "Bou-Aziz").unwrap();
        assert!(name.is_sent_start);
    }

    #[test]
    fn test_empty_stream() {
        let (merged, stats) = merge_tokens_with_stats(&[]);
        assert!(merged.is_empty());
        assert_eq!(stats, MergeStats::default());
    }
}
