//! Code-host extraction: browser URLs rewritten to raw content.

use reqwest::Client;
use tracing::info;
use url::Url;

use crate::error::ExtractError;

use super::html::HtmlExtractor;

const STAGE: &str = "codehost";

/// File extensions returned verbatim as source text.
const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "rs", "js", "ts", "jsx", "tsx", "go", "java", "c", "h", "cpp", "hpp", "cc", "cs",
    "rb", "php", "swift", "kt", "scala", "sh", "sql", "toml", "yaml", "yml", "json", "txt",
];

/// Fetches files from a code host through its raw-content endpoint.
pub struct CodeFileExtractor {
    client: Client,
    html: HtmlExtractor,
}

impl CodeFileExtractor {
    pub fn new(client: Client, html: HtmlExtractor) -> Self {
        Self { client, html }
    }

    /// Rewrite a browser-facing file URL into its raw-content equivalent:
    /// swap the host and drop the `blob` path segment.
    pub fn raw_content_url(url: &Url) -> String {
        url.as_str()
            .replace("github.com", "raw.githubusercontent.com")
            .replace("/blob/", "/")
    }

    /// True when the URL path ends in a source-code extension.
    fn is_source_file(url: &Url) -> bool {
        let path = url.path().to_ascii_lowercase();
        path.rsplit('.')
            .next()
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
    }

    /// Fetch the raw file. Source files pass through unchanged; anything
    /// else is treated as markup and normalized.
    pub async fn extract(&self, url: &Url) -> Result<String, ExtractError> {
        let raw_url = Self::raw_content_url(url);
        info!(%url, raw_url, "fetching raw file from code host");

        let response = self
            .client
            .get(&raw_url)
            .send()
            .await
            .map_err(|e| ExtractError::new(STAGE, e))?
            .error_for_status()
            .map_err(|e| ExtractError::new(STAGE, e))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExtractError::new(STAGE, e))?;

        if Self::is_source_file(url) {
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            self.html.extract(&bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_url_rewrites_to_raw_content() {
        let url = Url::parse("https://github.com/org/repo/blob/main/x.py").unwrap();
        assert_eq!(
            CodeFileExtractor::raw_content_url(&url),
            "https://raw.githubusercontent.com/org/repo/main/x.py"
        );
    }

    #[test]
    fn rewrite_keeps_nested_paths() {
        let url =
            Url::parse("https://github.com/org/repo/blob/v1.2/src/lib/util.rs").unwrap();
        assert_eq!(
            CodeFileExtractor::raw_content_url(&url),
            "https://raw.githubusercontent.com/org/repo/v1.2/src/lib/util.rs"
        );
    }

    #[test]
    fn source_extensions_are_detected_case_insensitively() {
        let source = Url::parse("https://github.com/org/repo/blob/main/Main.RS").unwrap();
        assert!(CodeFileExtractor::is_source_file(&source));
        let markup = Url::parse("https://github.com/org/repo/blob/main/README.md").unwrap();
        assert!(!CodeFileExtractor::is_source_file(&markup));
    }
}
