//! Error taxonomy for ingestion and extraction.
//!
//! Three layers, mirroring the pipeline: [`UnsupportedFormat`] for MIME types
//! the classifier does not recognize (permanent, not retryable),
//! [`ExtractError`] for a specific extractor failing (carries the stage name
//! and underlying cause), and [`IngestError`] as the top-level wrapper the
//! dispatcher surfaces to callers. Capability transport failures live in
//! [`CapabilityError`] and are wrapped into `ExtractError` by the extractor
//! that invoked them.
//!
//! Chunk resolution deliberately has no error type of its own: an unmatched
//! candidate is dropped, not raised.

use thiserror::Error;

/// Boxed source error carried inside [`ExtractError`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The classifier was handed a MIME type with no registered extractor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported content type: {mime_type}")]
pub struct UnsupportedFormat {
    /// The base MIME type that failed to match, parameters already stripped.
    pub mime_type: String,
}

impl UnsupportedFormat {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
        }
    }
}

/// A format extractor failed.
///
/// `stage` names the extractor (e.g. `"video"`, `"pdf"`, `"audio"`) so
/// operators can tell from a log line which strategy gave up; `source` is
/// the underlying cause.
#[derive(Debug, Error)]
#[error("{stage} extraction failed: {source}")]
pub struct ExtractError {
    /// Static name of the extraction stage that failed.
    pub stage: &'static str,
    #[source]
    source: BoxedCause,
}

impl ExtractError {
    /// Wrap an underlying error with the stage that produced it.
    pub fn new(stage: &'static str, source: impl Into<BoxedCause>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Build a stage failure from a plain message, for conditions that have
    /// no underlying error value (e.g. an expected artifact never appeared).
    pub fn msg(stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            source: message.into().into(),
        }
    }
}

/// Failure of an external model capability (transcription, image
/// description, excerpt planning).
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The HTTP request itself failed.
    #[error("capability request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("capability endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body did not deserialize.
    #[error("capability response could not be parsed: {0}")]
    Json(#[from] serde_json::Error),

    /// The response deserialized but was missing the expected content.
    #[error("capability response missing expected content")]
    MalformedResponse,
}

/// Top-level ingestion failure surfaced by [`Ingestor::ingest`].
///
/// Ingestion is all-or-nothing per locator: any of these means no document
/// was produced. No variant is retried internally.
///
/// [`Ingestor::ingest`]: crate::ingestion::Ingestor::ingest
#[derive(Debug, Error)]
pub enum IngestError {
    /// The locator string is not a valid URL.
    #[error("invalid source locator '{locator}': {source}")]
    InvalidLocator {
        locator: String,
        #[source]
        source: url::ParseError,
    },

    /// A transport-level failure (DNS, timeout, non-2xx status).
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response content type has no registered extractor.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedFormat),

    /// A format extractor failed on the fetched content.
    #[error(transparent)]
    Extraction(#[from] ExtractError),
}

impl IngestError {
    pub(crate) fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }
}
