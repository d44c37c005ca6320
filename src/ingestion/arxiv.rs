//! Academic-repository extraction: paper id to canonical PDF.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use tracing::info;
use url::Url;

use crate::error::ExtractError;

use super::pdf::PdfExtractor;

const STAGE: &str = "arxiv";

/// Paper id inside a repository URL path. Covers the abstract, pdf,
/// postscript, source, and technical-report prefixes, with or without a
/// subject-class segment before the id.
static PAPER_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:abs|pdf|ps|src|tb)/(?:hep-th/)?(\d+\.\d+|\d+)")
        .expect("valid paper id pattern")
});

/// Resolves an academic-repository URL to its PDF and extracts it.
pub struct ArxivExtractor {
    client: Client,
    pdf: PdfExtractor,
}

impl ArxivExtractor {
    pub fn new(client: Client, pdf: PdfExtractor) -> Self {
        Self { client, pdf }
    }

    /// Canonical PDF URL for a paper page, if the path carries a paper id.
    pub fn pdf_url(url: &Url) -> Option<String> {
        PAPER_ID
            .captures(url.path())
            .map(|captures| format!("https://arxiv.org/pdf/{}.pdf", &captures[1]))
    }

    /// Download the paper's PDF and delegate to the PDF extractor.
    pub async fn extract(&self, url: &Url) -> Result<String, ExtractError> {
        let pdf_url = Self::pdf_url(url)
            .ok_or_else(|| ExtractError::msg(STAGE, format!("no paper id in {url}")))?;

        info!(%url, pdf_url, "downloading paper");

        let response = self
            .client
            .get(&pdf_url)
            .send()
            .await
            .map_err(|e| ExtractError::new(STAGE, e))?
            .error_for_status()
            .map_err(|e| ExtractError::new(STAGE, e))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExtractError::new(STAGE, e))?;

        self.pdf.extract(&bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_url_of(url: &str) -> Option<String> {
        ArxivExtractor::pdf_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn abstract_path_resolves_to_pdf() {
        assert_eq!(
            pdf_url_of("https://arxiv.org/abs/2301.12345"),
            Some("https://arxiv.org/pdf/2301.12345.pdf".to_string())
        );
    }

    #[test]
    fn pdf_and_source_paths_resolve() {
        assert_eq!(
            pdf_url_of("https://arxiv.org/pdf/2301.12345"),
            Some("https://arxiv.org/pdf/2301.12345.pdf".to_string())
        );
        assert_eq!(
            pdf_url_of("https://arxiv.org/src/1234567"),
            Some("https://arxiv.org/pdf/1234567.pdf".to_string())
        );
    }

    #[test]
    fn subject_class_prefix_is_skipped() {
        assert_eq!(
            pdf_url_of("https://arxiv.org/abs/hep-th/9901001"),
            Some("https://arxiv.org/pdf/9901001.pdf".to_string())
        );
    }

    #[test]
    fn non_paper_paths_resolve_to_none() {
        assert_eq!(pdf_url_of("https://arxiv.org/list/cs.LG/recent"), None);
        assert_eq!(pdf_url_of("https://arxiv.org/"), None);
    }
}
