//! Approximate substring location with tiered fallback.
//!
//! Model-proposed excerpt boundaries are usually near-verbatim but drift in
//! whitespace, punctuation, or a stray character. The matcher recovers the
//! intended span with a fixed tier ladder, first success wins:
//!
//! 1. the full snippet, anywhere in the document, at edit distance <= 1;
//! 2. for a start anchor, the first [`ANCHOR_PROBE_CHARS`] characters of the
//!    snippet at edit distance <= 1;
//! 3. for an end anchor, the last [`ANCHOR_PROBE_CHARS`] characters likewise;
//! 4. otherwise no match.
//!
//! The distance bound of 1 and the 25-character probe are compatibility
//! constants; ties among equal-distance matches break to the earliest
//! position in the document.
//!
//! Matching runs over Unicode scalar values; returned spans carry byte
//! offsets that always fall on `char` boundaries, so they can slice the
//! original text directly.

use crate::types::{Anchor, MatchSpan};

/// Number of snippet characters retried at tiers 2 and 3.
pub const ANCHOR_PROBE_CHARS: usize = 25;

/// A document prepared for repeated matching.
///
/// Precomputes the `char` sequence and the byte offset of each character so
/// one index can serve every candidate of a resolution pass.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    chars: Vec<char>,
    byte_offsets: Vec<usize>,
}

impl DocumentIndex {
    /// Index a document's text.
    pub fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut byte_offsets = Vec::with_capacity(text.len() + 1);
        for (offset, ch) in text.char_indices() {
            byte_offsets.push(offset);
            chars.push(ch);
        }
        byte_offsets.push(text.len());
        Self {
            chars,
            byte_offsets,
        }
    }

    /// Number of characters in the indexed document.
    pub fn char_count(&self) -> usize {
        self.chars.len()
    }

    fn span(&self, start_char: usize, end_char: usize) -> MatchSpan {
        MatchSpan {
            start: self.byte_offsets[start_char],
            end: self.byte_offsets[end_char],
        }
    }
}

/// Locate `snippet` in the indexed document with the tier ladder above.
///
/// Returns the best span or `None` when every tier misses. An empty snippet
/// never matches.
pub fn locate(snippet: &str, document: &DocumentIndex, anchor: Anchor) -> Option<MatchSpan> {
    let needle: Vec<char> = snippet.chars().collect();
    if needle.is_empty() {
        return None;
    }

    if let Some(span) = search(document, &needle) {
        return Some(span);
    }

    // A snippet no longer than the probe would retry with an identical
    // needle, so the ladder ends here for short snippets.
    if needle.len() <= ANCHOR_PROBE_CHARS {
        return None;
    }

    let probe: Vec<char> = match anchor {
        Anchor::Start => needle[..ANCHOR_PROBE_CHARS].to_vec(),
        Anchor::End => needle[needle.len() - ANCHOR_PROBE_CHARS..].to_vec(),
    };
    search(document, &probe)
}

/// Scan for the leftmost position where `needle` matches within one edit.
fn search(document: &DocumentIndex, needle: &[char]) -> Option<MatchSpan> {
    let hay = &document.chars;
    for start in 0..hay.len() {
        if let Some(len) = match_at(hay, start, needle) {
            // An alignment with one leading-edge edit begins a character
            // before the verbatim text; when the same region also holds an
            // exact occurrence, that occurrence is the intended span.
            for exact in start + 1..start + len {
                if exact + needle.len() <= hay.len()
                    && hay[exact..exact + needle.len()] == *needle
                {
                    return Some(document.span(exact, exact + needle.len()));
                }
            }
            return Some(document.span(start, start + len));
        }
    }
    None
}

/// Window length of a <=1-edit alignment of `needle` starting at `start`,
/// if one exists.
///
/// Variants are tried cheapest first: an equal-length window (distance 0 or
/// one substitution), then a window one character shorter (one deletion from
/// the needle), then one character longer (one insertion). The first variant
/// that fits decides the span length. Zero-length windows never match.
fn match_at(hay: &[char], start: usize, needle: &[char]) -> Option<usize> {
    let m = needle.len();

    if start + m <= hay.len() {
        let window = &hay[start..start + m];
        let mismatches = window
            .iter()
            .zip(needle)
            .filter(|(a, b)| a != b)
            .take(2)
            .count();
        if mismatches <= 1 {
            return Some(m);
        }
    }

    if m >= 2 && start + m - 1 <= hay.len() {
        let window = &hay[start..start + m - 1];
        if one_char_removed(needle, window) {
            return Some(m - 1);
        }
    }

    if start + m + 1 <= hay.len() {
        let window = &hay[start..start + m + 1];
        if one_char_removed(window, needle) {
            return Some(m + 1);
        }
    }

    None
}

/// True when `shorter` equals `longer` with exactly one character removed.
fn one_char_removed(longer: &[char], shorter: &[char]) -> bool {
    debug_assert_eq!(longer.len(), shorter.len() + 1);
    let mut i = 0;
    let mut j = 0;
    let mut skipped = false;
    while i < longer.len() && j < shorter.len() {
        if longer[i] == shorter[j] {
            i += 1;
            j += 1;
        } else if skipped {
            return false;
        } else {
            skipped = true;
            i += 1;
        }
    }
    true
}
