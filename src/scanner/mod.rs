pub mod token;
pub mod merger;
pub mod pattern;
pub mod matcher;
pub mod relationship;
pub mod resolver;
pub mod extractor;
pub mod wasm;

pub use token::*;
pub use merger::*;
pub use pattern::*;
pub use matcher::*;
pub use relationship::*;
pub use resolver::*;
pub use extractor::*;
pub use wasm::*;

#[cfg(test)]
mod tests;
