//! Core data model for ingestion and excerpt resolution.
//!
//! These types flow through the whole pipeline: a locator is ingested into a
//! [`SourceDocument`], an external model proposes [`ExcerptCandidate`]s over
//! its text, and the resolver turns the survivors into [`ContentChunk`]s.
//!
//! # Examples
//!
//! ```rust
//! use chunksmith::types::{ExcerptCandidate, SourceDocument};
//!
//! let document = SourceDocument::new("Alpha beta gamma delta epsilon");
//! let candidate = ExcerptCandidate {
//!     title: "T1".to_string(),
//!     start: "Alpha beta".to_string(),
//!     end: "delta epsilon".to_string(),
//! };
//! assert!(document.text.contains(&candidate.start));
//! ```

use serde::{Deserialize, Serialize};

/// The normalized plain-text result of ingesting one source locator.
///
/// Produced exactly once per successful `ingest` call and never mutated
/// afterwards. Every resolved chunk is a verbatim substring of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// UTF-8 text of the extracted document.
    pub text: String,
}

impl SourceDocument {
    /// Wrap extracted text in a document.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Length of the document text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` when the document carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<String> for SourceDocument {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// An externally proposed excerpt boundary description.
///
/// Produced by a generative model, so the `start`/`end` snippets are
/// untrusted: they are usually near-verbatim but may have drifted in
/// whitespace, punctuation, or wording. The matcher recovers the exact spans;
/// candidates whose snippets cannot be located are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcerptCandidate {
    /// Display title for the excerpt.
    pub title: String,
    /// Snippet expected near the beginning of the excerpt.
    pub start: String,
    /// Snippet expected near the end of the excerpt.
    pub end: String,
}

/// Which boundary of an excerpt a snippet anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The snippet marks the beginning of the excerpt.
    Start,
    /// The snippet marks the end of the excerpt.
    End,
}

/// A resolved span into a [`SourceDocument`].
///
/// Offsets are byte offsets on `char` boundaries, with `start <= end` and
/// both within the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// Byte offset of the first matched character.
    pub start: usize,
    /// Byte offset one past the last matched character.
    pub end: usize,
}

impl MatchSpan {
    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-length span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Final output unit of chunk resolution.
///
/// `content` is always a contiguous, verbatim substring of the document it
/// was resolved against, never the approximate snippet text. Chunks keep
/// the order of their originating candidates; overlapping and empty chunks
/// are permitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChunk {
    /// Title carried over from the candidate.
    pub title: String,
    /// Exact substring of the source document.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_reports_length() {
        let doc = SourceDocument::new("abc");
        assert_eq!(doc.len(), 3);
        assert!(!doc.is_empty());
        assert!(SourceDocument::new("").is_empty());
    }

    #[test]
    fn candidate_round_trips_through_json() {
        let candidate = ExcerptCandidate {
            title: "Intro".into(),
            start: "In the beginning".into(),
            end: "and so it ends".into(),
        };
        let json = serde_json::to_string(&candidate).unwrap();
        let back: ExcerptCandidate = serde_json::from_str(&json).unwrap();
        assert_eq!(candidate, back);
    }

    #[test]
    fn span_length() {
        let span = MatchSpan { start: 4, end: 9 };
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(MatchSpan { start: 2, end: 2 }.is_empty());
    }
}
