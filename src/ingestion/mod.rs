//! Source ingestion: locator routing, fetching, and format extraction.
//!
//! [`Ingestor`] is the entry point. A locator first runs through an ordered
//! table of domain rules (video platform, academic repository, code host,
//! cloud drive) and the first matching rule picks a specialized extractor.
//! Anything else is fetched with a redirect-following GET and classified by
//! the response's declared content type.
//!
//! ```text
//! locator ──► domain rules ──► video / arxiv / codehost / drive extractor
//!     │                                        │
//!     └─ no rule ─► GET ─► ByteFormat ─► html / pdf / docx / pptx / audio
//!                                             │
//!                                    SourceDocument (normalized text)
//! ```
//!
//! Ingestion is all-or-nothing per locator: the first transport or
//! extraction failure aborts the call with an [`IngestError`] and no
//! document. One `Ingestor` serves concurrent calls; nothing is shared
//! mutably across them.

pub mod arxiv;
pub mod audio;
pub mod classify;
pub mod codehost;
pub mod drive;
pub mod html;
pub mod office;
pub mod pdf;
pub mod video;

use std::sync::Arc;

use reqwest::Client;
use tracing::info;
use url::Url;

use crate::capabilities::{ImageDescriber, OpenAiCapabilities, SpeechTranscriber};
use crate::config::CapabilityConfig;
use crate::error::IngestError;
use crate::types::SourceDocument;

pub use arxiv::ArxivExtractor;
pub use audio::{AudioExtractor, MAX_AUDIO_SECONDS};
pub use classify::{ByteFormat, DOCX_MIME, PPTX_MIME};
pub use codehost::CodeFileExtractor;
pub use drive::DriveExtractor;
pub use html::HtmlExtractor;
pub use office::{DocxExtractor, PptxExtractor};
pub use pdf::PdfExtractor;
pub use video::VideoExtractor;

/// Specialized handling selected by domain routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Video,
    AcademicPdf,
    CodeFile,
    CloudFile,
}

pub(crate) struct DomainRule {
    name: &'static str,
    matches: fn(&str) -> bool,
    pub(crate) route: Route,
}

/// Ordered dispatch table over the locator host; first match wins. New
/// sources are added as new rows, existing rows stay untouched.
static DOMAIN_RULES: &[DomainRule] = &[
    DomainRule {
        name: "video platform",
        matches: |host| host.contains("youtube.com") || host.contains("youtu.be"),
        route: Route::Video,
    },
    DomainRule {
        name: "academic repository",
        matches: |host| host.contains("arxiv.org"),
        route: Route::AcademicPdf,
    },
    DomainRule {
        name: "code host",
        matches: |host| host.contains("github.com"),
        route: Route::CodeFile,
    },
    DomainRule {
        name: "cloud drive",
        matches: |host| host.contains("drive.google.com"),
        route: Route::CloudFile,
    },
];

pub(crate) fn route_for_host(host: &str) -> Option<&'static DomainRule> {
    DOMAIN_RULES.iter().find(|rule| (rule.matches)(host))
}

/// Converts source locators into normalized text documents.
///
/// Construction goes through [`Ingestor::builder`] (or
/// [`Ingestor::from_config`] for the OpenAI-backed capabilities); the
/// transcription and image-description capabilities are injected, never
/// ambient.
///
/// # Examples
///
/// ```rust,no_run
/// use chunksmith::config::CapabilityConfig;
/// use chunksmith::ingestion::Ingestor;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let ingestor = Ingestor::from_config(CapabilityConfig::from_env()?);
/// let document = ingestor.ingest("https://example.com/article").await?;
/// println!("{} bytes of text", document.len());
/// # Ok(())
/// # }
/// ```
pub struct Ingestor {
    client: Client,
    html: HtmlExtractor,
    pdf: PdfExtractor,
    docx: DocxExtractor,
    pptx: PptxExtractor,
    audio: AudioExtractor,
    video: VideoExtractor,
    arxiv: ArxivExtractor,
    code: CodeFileExtractor,
    drive: DriveExtractor,
}

impl Ingestor {
    /// Start building an ingestor.
    pub fn builder() -> IngestorBuilder {
        IngestorBuilder::default()
    }

    /// Build an ingestor whose capabilities are served by the
    /// OpenAI-compatible provider configured by `config`.
    pub fn from_config(config: CapabilityConfig) -> Self {
        let provider = Arc::new(OpenAiCapabilities::new(config));
        Self::builder()
            .transcriber(provider.clone())
            .describer(provider)
            .build()
    }

    /// Ingest a source locator into a normalized text document.
    ///
    /// Routing order: video platform, academic repository, code host, cloud
    /// drive, then the default fetch-and-classify branch. Any failure along
    /// the chosen path aborts the whole ingestion.
    pub async fn ingest(&self, locator: &str) -> Result<SourceDocument, IngestError> {
        let url = Url::parse(locator).map_err(|source| IngestError::InvalidLocator {
            locator: locator.to_string(),
            source,
        })?;
        let host = url.host_str().unwrap_or("").to_ascii_lowercase();

        info!(%url, "ingesting source locator");

        let text = match route_for_host(&host) {
            Some(rule) => {
                info!(source = rule.name, "locator matched domain rule");
                match rule.route {
                    Route::Video => self.video.extract(&url).await?,
                    Route::AcademicPdf => self.arxiv.extract(&url).await?,
                    Route::CodeFile => self.code.extract(&url).await?,
                    Route::CloudFile => {
                        let (mime_type, bytes) = self.drive.fetch(&url).await?;
                        return self.classify(&mime_type, &bytes).await;
                    }
                }
            }
            None => {
                let (mime_type, bytes) = self.fetch(&url).await?;
                return self.classify(&mime_type, &bytes).await;
            }
        };

        Ok(SourceDocument::new(text))
    }

    /// Classify a `(MIME type, bytes)` pair and run the matching extractor.
    pub async fn classify(
        &self,
        mime_type: &str,
        content: &[u8],
    ) -> Result<SourceDocument, IngestError> {
        let format = ByteFormat::from_mime(mime_type)?;

        info!(mime_type, ?format, bytes = content.len(), "classifying content");

        let text = match format {
            ByteFormat::Html => self.html.extract(content)?,
            ByteFormat::Pdf => self.pdf.extract(content).await?,
            ByteFormat::Docx => self.docx.extract(content)?,
            ByteFormat::Pptx => self.pptx.extract(content)?,
            ByteFormat::Audio => self.audio.extract(content.to_vec()).await?,
        };

        Ok(SourceDocument::new(text))
    }

    /// Default-branch fetch: GET with redirects, returning the declared
    /// content type and body.
    async fn fetch(&self, url: &Url) -> Result<(String, Vec<u8>), IngestError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| IngestError::fetch(url.as_str(), e))?
            .error_for_status()
            .map_err(|e| IngestError::fetch(url.as_str(), e))?;

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| IngestError::fetch(url.as_str(), e))?
            .to_vec();

        Ok((mime_type, bytes))
    }
}

/// Builder for [`Ingestor`] instances.
#[derive(Default)]
pub struct IngestorBuilder {
    client: Option<Client>,
    transcriber: Option<Arc<dyn SpeechTranscriber>>,
    describer: Option<Arc<dyn ImageDescriber>>,
}

impl IngestorBuilder {
    /// Use an existing HTTP client instead of building a fresh one.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the speech-transcription capability.
    ///
    /// Required before calling [`build()`](Self::build).
    #[must_use]
    pub fn transcriber(mut self, transcriber: Arc<dyn SpeechTranscriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Set the image-description capability.
    ///
    /// Required before calling [`build()`](Self::build).
    #[must_use]
    pub fn describer(mut self, describer: Arc<dyn ImageDescriber>) -> Self {
        self.describer = Some(describer);
        self
    }

    /// Build the [`Ingestor`].
    ///
    /// # Panics
    ///
    /// Panics when a capability was not provided.
    pub fn build(self) -> Ingestor {
        self.try_build().expect("IngestorBuilder requires a transcriber and a describer")
    }

    /// Build the [`Ingestor`], returning `None` when a capability is
    /// missing.
    pub fn try_build(self) -> Option<Ingestor> {
        let transcriber = self.transcriber?;
        let describer = self.describer?;
        let client = self.client.unwrap_or_else(|| {
            Client::builder()
                .user_agent(concat!("chunksmith/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("failed to build HTTP client")
        });

        let html = HtmlExtractor::new();
        let pdf = PdfExtractor::new(describer.clone());
        let audio = AudioExtractor::new(transcriber);

        Some(Ingestor {
            video: VideoExtractor::new(audio.clone()),
            arxiv: ArxivExtractor::new(client.clone(), PdfExtractor::new(describer)),
            code: CodeFileExtractor::new(client.clone(), html),
            drive: DriveExtractor::new(client.clone()),
            docx: DocxExtractor::new(),
            pptx: PptxExtractor::new(),
            client,
            html,
            pdf,
            audio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_of(host: &str) -> Option<Route> {
        route_for_host(host).map(|rule| rule.route)
    }

    #[test]
    fn domain_rules_route_in_declared_order() {
        assert_eq!(route_of("www.youtube.com"), Some(Route::Video));
        assert_eq!(route_of("youtu.be"), Some(Route::Video));
        assert_eq!(route_of("arxiv.org"), Some(Route::AcademicPdf));
        assert_eq!(route_of("github.com"), Some(Route::CodeFile));
        assert_eq!(route_of("drive.google.com"), Some(Route::CloudFile));
        assert_eq!(route_of("example.com"), None);
    }

    #[test]
    fn routing_matches_on_host_substrings() {
        assert_eq!(route_of("m.youtube.com"), Some(Route::Video));
        assert_eq!(route_of("export.arxiv.org"), Some(Route::AcademicPdf));
    }

    #[test]
    fn builder_requires_capabilities() {
        assert!(IngestorBuilder::default().try_build().is_none());
    }

    #[test]
    fn builder_with_capabilities_succeeds() {
        use crate::capabilities::{MockDescriber, MockTranscriber};

        let built = Ingestor::builder()
            .transcriber(Arc::new(MockTranscriber::new("text")))
            .describer(Arc::new(MockDescriber))
            .try_build();
        assert!(built.is_some());
    }
}
