//! KinCore: Kinship Relation Scanner
//!
//! A Rust/WASM pipeline that finds father–daughter relations in French
//! narrative prose and records them as `(father, daughter, pattern)` triples.
//!
//! # Architecture
//!
//! ## Scanner Components
//! - `token.rs` - Tokenizer: words, sentence and paragraph boundaries
//! - `merger.rs` - Token Merger: hyphenated names, quote runs
//! - `pattern.rs` - Pattern Catalog: FATHER_DAUGHTER_1..4 constraint rules
//! - `matcher.rs` - MatchEngine trait + SequenceMatcher
//! - `resolver.rs` - Relationship Resolver: one handler per pattern
//! - `relationship.rs` - Relationship + RelationshipCollection
//! - `extractor.rs` - Extractor: config, prefilter, pipeline, stats
//! - `wasm.rs` - KinshipScanner: JS bindings
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { KinshipScanner } from 'kincore';
//!
//! await init();
//!
//! const scanner = new KinshipScanner({ patterns: ['FATHER_DAUGHTER_1', 'FATHER_DAUGHTER_4'] });
//! const result = scanner.scan("Comme sa femme, la fille de Ben-Gana, ne lui avait pas donné d’enfants.");
//!
//! console.log(result.relationships); // [{ father: 'Ben-Gana', daughter: 'unnamed daughter', ... }]
//! console.log(result.stats);         // token counts, timings
//! ```

pub mod error;
pub mod scanner;

pub use error::{KinError, Result};
pub use scanner::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("kincore v{}", env!("CARGO_PKG_VERSION"))
}
