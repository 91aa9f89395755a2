//! Relationship records and the per-document collection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

use super::matcher::MatchSpan;
use super::pattern::PatternId;

/// Sentinel daughter name for surface forms that identify only the father
pub const UNNAMED_DAUGHTER: &str = "unnamed daughter";

/// Daughter slot of a relationship. Serializes as a plain string, with
/// [`UNNAMED_DAUGHTER`] standing for [`Daughter::Unnamed`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Daughter {
    Named(String),
    Unnamed,
}

impl Daughter {
    pub fn as_str(&self) -> &str {
        match self {
            Daughter::Named(name) => name,
            Daughter::Unnamed => UNNAMED_DAUGHTER,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Daughter::Named(_))
    }
}

impl From<Daughter> for String {
    fn from(daughter: Daughter) -> Self {
        match daughter {
            Daughter::Named(name) => name,
            Daughter::Unnamed => UNNAMED_DAUGHTER.to_string(),
        }
    }
}

impl From<String> for Daughter {
    fn from(name: String) -> Self {
        if name == UNNAMED_DAUGHTER {
            Daughter::Unnamed
        } else {
            Daughter::Named(name)
        }
    }
}

impl PartialEq<&str> for Daughter {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Daughter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A father–daughter mention. Built only by resolver handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RelationshipRecord")]
pub struct Relationship {
    father: String,
    daughter: Daughter,
    pattern: PatternId,
    /// Originating match span (token indices)
    span: MatchSpan,
}

impl Relationship {
    /// `None` when the father (or a named daughter) is blank.
    pub fn new(father: impl Into<String>, daughter: Daughter, span: MatchSpan) -> Option<Self> {
        let father = father.into();
        if father.trim().is_empty() {
            return None;
        }
        if let Daughter::Named(name) = &daughter {
            if name.trim().is_empty() {
                return None;
            }
        }
        Some(Relationship {
            father,
            daughter,
            pattern: span.pattern,
            span,
        })
    }

    pub fn father(&self) -> &str {
        &self.father
    }

    pub fn daughter(&self) -> &Daughter {
        &self.daughter
    }

    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    pub fn span(&self) -> MatchSpan {
        self.span
    }

    /// Same participants, same family, overlapping provenance
    pub fn duplicates(&self, other: &Relationship) -> bool {
        self.pattern == other.pattern
            && self.father == other.father
            && self.daughter == other.daughter
            && self.span.overlaps(&other.span)
    }
}

/// Unchecked wire form; every deserialized relationship passes through
/// [`Relationship::new`].
#[derive(Deserialize)]
struct RelationshipRecord {
    father: String,
    daughter: Daughter,
    pattern: PatternId,
    span: MatchSpan,
}

impl TryFrom<RelationshipRecord> for Relationship {
    type Error = String;

    fn try_from(record: RelationshipRecord) -> Result<Self, Self::Error> {
        if record.pattern != record.span.pattern {
            return Err(format!(
                "pattern {} does not match span pattern {}",
                record.pattern, record.span.pattern
            ));
        }
        Relationship::new(record.father, record.daughter, record.span)
            .ok_or_else(|| "relationship names must not be blank".to_string())
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.father, self.pattern, self.daughter)
    }
}

/// Append-only, ordered results of one document run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipCollection {
    relationships: Vec<Relationship>,
}

impl RelationshipCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Relationship> {
        self.relationships.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Relationship> {
        self.relationships.iter()
    }

    pub fn as_slice(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn into_vec(self) -> Vec<Relationship> {
        self.relationships
    }

    /// Another anchor of the same family already produced a relationship
    /// ending on the same token.
    pub fn is_resolved(&self, span: &MatchSpan) -> bool {
        self.relationships
            .iter()
            .any(|r| r.pattern == span.pattern && r.span.end == span.end)
    }

    pub fn has_duplicate(&self, candidate: &Relationship) -> bool {
        self.relationships.iter().any(|r| r.duplicates(candidate))
    }

    pub fn by_pattern(&self, pattern: PatternId) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(move |r| r.pattern == pattern)
    }
}

impl Index<usize> for RelationshipCollection {
    type Output = Relationship;

    fn index(&self, index: usize) -> &Relationship {
        &self.relationships[index]
    }
}

impl<'a> IntoIterator for &'a RelationshipCollection {
    type Item = &'a Relationship;
    type IntoIter = std::slice::Iter<'a, Relationship>;

    fn into_iter(self) -> Self::IntoIter {
        self.relationships.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================
