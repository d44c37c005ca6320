//! Excerpt matching and chunk resolution.
//!
//! The matcher ([`locate`]) finds approximate snippet positions inside a
//! document; the resolver ([`resolve_chunks`]) applies it to a whole list of
//! model-proposed [`ExcerptCandidate`]s and emits exact, verbatim
//! [`ContentChunk`]s. Candidates that cannot be anchored are dropped, never
//! raised.
//!
//! [`ExcerptCandidate`]: crate::types::ExcerptCandidate
//! [`ContentChunk`]: crate::types::ContentChunk

pub mod matcher;
pub mod resolver;

pub use matcher::{ANCHOR_PROBE_CHARS, DocumentIndex, locate};
pub use resolver::{plan_chunks, resolve_chunks};
