//! Content-type classification for byte-oriented extraction.

use crate::error::UnsupportedFormat;

/// MIME type of Office Open XML word-processor documents.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME type of Office Open XML presentations.
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// The byte-oriented formats the classifier can route.
///
/// This is a pure dispatch table: [`ByteFormat::from_mime`] strips any
/// `;`-separated parameters (charset and friends) and matches the base type;
/// the same input always selects the same extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteFormat {
    Html,
    Pdf,
    Docx,
    Pptx,
    Audio,
}

impl ByteFormat {
    /// Map a MIME type string to a format, or fail for unrecognized types.
    pub fn from_mime(mime_type: &str) -> Result<Self, UnsupportedFormat> {
        let base = mime_type.split(';').next().unwrap_or("").trim();
        match base {
            "text/html" => Ok(Self::Html),
            "application/pdf" => Ok(Self::Pdf),
            t if t == DOCX_MIME => Ok(Self::Docx),
            t if t == PPTX_MIME => Ok(Self::Pptx),
            t if t.starts_with("audio/") => Ok(Self::Audio),
            other => Err(UnsupportedFormat::new(other)),
        }
    }
}
