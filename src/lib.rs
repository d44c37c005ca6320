//! ```text
//! Locator ──► ingestion::Ingestor ──┬─► domain rules ─► specialized extractors
//!                                   └─► GET + ByteFormat ─► byte extractors
//!                                                │
//!                               SourceDocument (normalized text)
//!                                                │
//!         capabilities::ExcerptPlanner (external model) ─► ExcerptCandidates
//!                                                │
//!               excerpt::resolve_chunks (matcher + resolver) ─► ContentChunks
//! ```
//!
//! The crate covers two tightly coupled subsystems: **ingestion** (classify
//! a source locator, run one format-specific extractor, produce a single
//! normalized text document) and **excerpt resolution** (turn approximate,
//! model-proposed boundary snippets into exact verbatim chunks of that
//! document). External model capabilities (speech transcription, verbatim
//! image description, excerpt planning) are injected behind traits; see
//! [`capabilities`].

pub mod capabilities;
pub mod config;
pub mod error;
pub mod excerpt;
pub mod ingestion;
pub mod types;

pub use config::CapabilityConfig;
pub use error::{CapabilityError, ExtractError, IngestError, UnsupportedFormat};
pub use excerpt::{DocumentIndex, locate, plan_chunks, resolve_chunks};
pub use ingestion::{ByteFormat, Ingestor};
pub use types::{Anchor, ContentChunk, ExcerptCandidate, MatchSpan, SourceDocument};
