//! The inverted index: topic label to ranked list of scored image URLs.
//!
//! Built once per `build` run, finalized with a single sort pass, then
//! treated as read-only at query time.

mod store;

pub use store::IndexStore;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One image's entry in a label's ranked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Image URL, exactly as it appeared in the candidate list
    pub image: String,

    /// Classifier confidence for this (image, label) pair
    pub score: f64,
}

impl IndexEntry {
    pub fn new(image: impl Into<String>, score: f64) -> Self {
        Self {
            image: image.into(),
            score,
        }
    }
}

/// Inverted index mapping each label to its scored images.
///
/// Labels are stored with whatever casing the classifier produced; `lookup`
/// matches the given term exactly. Callers that lowercase queries (the
/// search command does) will therefore miss mixed-case labels — longstanding
/// behavior, pinned by tests, not to be fixed silently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// label -> entries, sorted by score descending after `finalize`
    pub terms: HashMap<String, Vec<IndexEntry>>,
}

impl Index {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to a label's list, creating the list on first use.
    pub fn insert(&mut self, label: impl Into<String>, entry: IndexEntry) {
        self.terms.entry(label.into()).or_default().push(entry);
    }

    /// Sort every label's list by score descending.
    ///
    /// The sort is stable, so ties keep insertion order and repeated calls
    /// are idempotent. NaN scores compare as equal and stay where they are.
    pub fn finalize(&mut self) {
        for entries in self.terms.values_mut() {
            entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        }
    }

    /// Exact-match lookup of a label's ranked entries.
    pub fn lookup(&self, term: &str) -> Option<&[IndexEntry]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the index holds no labels at all.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Total entries across all labels.
    pub fn entry_count(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }
}
