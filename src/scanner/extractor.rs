//! Extractor: the explicitly constructed kinship extraction pipeline
//!
//! One `Extractor` owns everything a document run needs (configuration,
//! validated catalog, resolver, match engine, trigger prefilter) and holds
//! no per-document state, so a single instance can serve many documents on
//! many threads.
//!
//! # Usage
//! ```rust
//! use kincore::{Extractor, ExtractorConfig};
//!
//! let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
//! let found = extractor.extract("Comme sa femme préférée, la fille de Ben-Gana, ne lui avait pas donné d’enfants.");
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].father(), "Ben-Gana");
//! ```

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{KinError, Result};

use super::matcher::{MatchEngine, MatchSpan, SequenceMatcher};
use super::merger::merge_tokens_with_stats;
use super::pattern::{PatternCatalog, PatternId, DEFAULT_MAX_GAP};
use super::relationship::RelationshipCollection;
use super::resolver::{Resolver, ResolverConfig};
use super::token::{Token, Tokenizer};

/// Longest gap accepted in configuration
const MAX_GAP_LIMIT: usize = 500;

// ==================== TYPE DEFINITIONS ====================

/// Configuration for the Extractor
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Families to evaluate
    #[serde(default = "default_patterns")]
    pub patterns: Vec<PatternId>,
    /// Max tokens between a father's name and the relation phrase
    #[serde(default = "default_max_gap")]
    pub max_gap: usize,
    /// Skip families whose trigger phrase never occurs in the document
    #[serde(default = "default_true")]
    pub prefilter: bool,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

fn default_true() -> bool { true }

fn default_patterns() -> Vec<PatternId> { PatternId::ALL.to_vec() }

fn default_max_gap() -> usize { DEFAULT_MAX_GAP }

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            max_gap: default_max_gap(),
            prefilter: true,
            resolver: ResolverConfig::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ExtractorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.patterns.is_empty() {
            return Err(KinError::invalid_config("at least one pattern family must be enabled"));
        }
        if self.max_gap > MAX_GAP_LIMIT {
            return Err(KinError::invalid_config(format!(
                "max_gap {} exceeds limit {}",
                self.max_gap, MAX_GAP_LIMIT
            )));
        }
        Ok(())
    }
}

/// Per-document statistics
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ExtractionStats {
    pub input_tokens: usize,
    pub merged_tokens: usize,
    pub hyphenated_names: usize,
    pub quote_runs: usize,
    pub patterns_evaluated: usize,
    pub patterns_skipped: usize,
    pub spans_matched: usize,
    pub relationships_found: usize,
    pub scan_time_ms: f64,
}

/// Relationships plus statistics for one document
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ScanResult {
    pub relationships: RelationshipCollection,
    pub stats: ExtractionStats,
}

/// Trigger phrases compiled into one automaton
#[derive(Debug, Clone)]
struct TriggerFilter {
    automaton: AhoCorasick,
    /// Families each trigger (by automaton pattern id) unlocks
    owners: Vec<Vec<PatternId>>,
}

impl TriggerFilter {
    fn build(catalog: &PatternCatalog) -> Result<Self> {
        let mut phrases: Vec<&'static str> = Vec::new();
        let mut owners: Vec<Vec<PatternId>> = Vec::new();
        for def in catalog.iter() {
            for phrase in def.id().triggers() {
                match phrases.iter().position(|p| p == phrase) {
                    Some(slot) => owners[slot].push(def.id()),
                    None => {
                        phrases.push(*phrase);
                        owners.push(vec![def.id()]);
                    }
                }
            }
        }

        // Standard semantics: overlapping triggers ("sa fille de") must all fire
        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .ascii_case_insensitive(true)
            .build(&phrases)
            .map_err(|e| KinError::Automaton(e.to_string()))?;

        Ok(TriggerFilter { automaton, owners })
    }

    /// Families whose trigger occurs in the token stream. Tokens are joined
    /// with single spaces so line breaks inside a phrase do not hide it.
    fn active(&self, tokens: &[Token]) -> HashSet<PatternId> {
        let haystack = tokens
            .iter()
            .map(|t| t.text.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        self.automaton
            .find_overlapping_iter(&haystack)
            .flat_map(|m| self.owners[m.pattern().as_usize()].iter().copied())
            .collect()
    }
}

// ==================== MAIN IMPLEMENTATION ====================

/// Kinship relationship extractor
#[derive(Debug, Clone)]
pub struct Extractor<E: MatchEngine = SequenceMatcher> {
    config: ExtractorConfig,
    tokenizer: Tokenizer,
    catalog: PatternCatalog,
    resolver: Resolver,
    engine: E,
    triggers: Option<TriggerFilter>,
}

impl Extractor<SequenceMatcher> {
    /// Build with the reference match engine.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Self::with_engine(config, SequenceMatcher::new())
    }
}

impl<E: MatchEngine> Extractor<E> {
    /// Build with a caller-supplied match engine.
    pub fn with_engine(config: ExtractorConfig, engine: E) -> Result<Self> {
        config.validate()?;
        let catalog = PatternCatalog::with_families(&config.patterns, config.max_gap)?;
        let triggers = if config.prefilter {
            Some(TriggerFilter::build(&catalog)?)
        } else {
            None
        };

        Ok(Self {
            resolver: Resolver::new(&config.resolver),
            tokenizer: Tokenizer::new(),
            catalog,
            engine,
            triggers,
            config,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.catalog.iter().map(|p| p.id().as_str()).collect()
    }

    /// Tokenize, merge, match and resolve one document.
    pub fn extract(&self, text: &str) -> RelationshipCollection {
        self.extract_with_stats(text).0
    }

    pub fn extract_with_stats(&self, text: &str) -> (RelationshipCollection, ExtractionStats) {
        let start = instant::Instant::now();
        let tokens = self.tokenizer.tokenize(text);
        let (relationships, mut stats) = self.run(&tokens);
        stats.scan_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&format!(
            "[Extractor] tokens:{} spans:{} relationships:{} in {:.2}ms",
            stats.merged_tokens, stats.spans_matched, stats.relationships_found, stats.scan_time_ms
        )));

        (relationships, stats)
    }

    /// Run on tokens produced by an external parser. The merger is still
    /// applied; callers must not pre-merge.
    pub fn extract_tokens(&self, tokens: &[Token]) -> RelationshipCollection {
        self.run(tokens).0
    }

    pub fn scan(&self, text: &str) -> ScanResult {
        let (relationships, stats) = self.extract_with_stats(text);
        ScanResult { relationships, stats }
    }

    fn run(&self, tokens: &[Token]) -> (RelationshipCollection, ExtractionStats) {
        let (merged, merge_stats) = merge_tokens_with_stats(tokens);
        let mut stats = ExtractionStats {
            input_tokens: merge_stats.input_tokens,
            merged_tokens: merge_stats.output_tokens,
            hyphenated_names: merge_stats.hyphenated_names,
            quote_runs: merge_stats.quote_runs,
            ..ExtractionStats::default()
        };

        let active = self.triggers.as_ref().map(|t| t.active(&merged));

        let mut spans: Vec<MatchSpan> = Vec::new();
        for pattern in self.catalog.iter() {
            if active.as_ref().map_or(false, |set| !set.contains(&pattern.id())) {
                stats.patterns_skipped += 1;
                continue;
            }
            stats.patterns_evaluated += 1;
            self.engine.find(&merged, pattern, &mut |span| spans.push(span));
        }
        stats.spans_matched = spans.len();

        // Document order across families; per family, leftmost anchor first
        spans.sort_by_key(|s| (s.start, s.pattern));

        let mut relationships = RelationshipCollection::new();
        for span in spans {
            self.resolver.resolve(&merged, span, &mut relationships);
        }
        stats.relationships_found = relationships.len();

        (relationships, stats)
    }
}

// =============================================================================
// Tests
// =============================================================================
