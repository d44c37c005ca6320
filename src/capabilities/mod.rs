//! External model capabilities consumed by the pipeline.
//!
//! Three capabilities are treated as opaque collaborators: speech
//! transcription (audio extractor), verbatim image description (PDF
//! extractor), and excerpt planning (callers who want boundary proposals for
//! a freshly ingested document). Each is an object-safe async trait so
//! extractors can be constructed with any implementation: the production
//! [`OpenAiCapabilities`] provider, or the deterministic [`mock`] providers
//! used in tests.

pub mod mock;
pub mod openai;

use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::types::ExcerptCandidate;

pub use mock::{MockDescriber, MockPlanner, MockTranscriber};
pub use openai::OpenAiCapabilities;

/// Maps audio bytes to transcribed text.
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    /// Transcribe an audio payload. `file_name` hints the container format
    /// to the provider (e.g. `"audio.mp3"`).
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<String, CapabilityError>;
}

/// Maps image bytes to verbatim transcribed text.
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    /// Describe an image, transcribing any text it contains verbatim.
    async fn describe(&self, image: Vec<u8>, mime_type: &str) -> Result<String, CapabilityError>;
}

/// Proposes approximate excerpt boundaries over a document.
#[async_trait]
pub trait ExcerptPlanner: Send + Sync {
    /// Return an ordered list of excerpt candidates for the document text.
    async fn propose_excerpts(
        &self,
        document: &str,
    ) -> Result<Vec<ExcerptCandidate>, CapabilityError>;
}
