//! PDF extraction with embedded-image transcription.

use std::sync::Arc;

use lopdf::{Document, Object};
use tracing::{debug, warn};

use crate::capabilities::ImageDescriber;
use crate::error::ExtractError;

const STAGE: &str = "pdf";

/// Heading under which image transcriptions are appended.
const IMAGE_SECTION_HEADER: &str = "Image Descriptions:";

/// Extracts page text from PDFs and transcribes embedded raster images
/// through the image-description capability.
pub struct PdfExtractor {
    describer: Arc<dyn ImageDescriber>,
}

impl PdfExtractor {
    pub fn new(describer: Arc<dyn ImageDescriber>) -> Self {
        Self { describer }
    }

    /// Extract normalized text from PDF bytes.
    ///
    /// Pages are iterated in order and their text concatenated with blank
    /// lines. When per-page extraction yields nothing (image-only pages,
    /// exotic encodings), the whole document is retried through the
    /// fallback extractor. All image transcriptions are appended after the
    /// page text under a single labeled section.
    pub async fn extract(&self, content: &[u8]) -> Result<String, ExtractError> {
        let document =
            Document::load_mem(content).map_err(|e| ExtractError::new(STAGE, e))?;

        let mut text = String::new();
        for (page_number, _object_id) in document.get_pages() {
            match document.extract_text(&[page_number]) {
                Ok(page_text) => {
                    text.push_str(page_text.trim_end());
                    text.push_str("\n\n");
                }
                Err(err) => {
                    debug!(page_number, error = %err, "page text extraction failed");
                }
            }
        }

        if text.trim().is_empty() {
            warn!("page iteration produced no text, retrying whole document");
            text = pdf_extract::extract_text_from_mem(content)
                .map_err(|e| ExtractError::new(STAGE, e))?;
        }

        let descriptions = self.describe_images(&document).await?;
        if descriptions.is_empty() {
            return Ok(text);
        }

        Ok(format!(
            "{text}\n\n{IMAGE_SECTION_HEADER}\n{}",
            descriptions.join("\n\n")
        ))
    }

    async fn describe_images(&self, document: &Document) -> Result<Vec<String>, ExtractError> {
        let mut descriptions = Vec::new();

        for (_, object) in document.objects.iter() {
            let Object::Stream(stream) = object else {
                continue;
            };
            let is_image = matches!(
                stream.dict.get(b"Subtype").and_then(Object::as_name),
                Ok(b"Image")
            );
            if !is_image {
                continue;
            }

            let mime_type = image_mime_type(stream);
            let description = self
                .describer
                .describe(stream.content.clone(), mime_type)
                .await
                .map_err(|e| ExtractError::new(STAGE, e))?;
            descriptions.push(description);
        }

        Ok(descriptions)
    }
}

/// Classify an image stream's color space to a MIME type.
///
/// Single-channel (DeviceGray) images are treated as JPEG, everything else
/// as PNG, matching the downstream capability's accepted formats.
fn image_mime_type(stream: &lopdf::Stream) -> &'static str {
    let gray = matches!(
        stream.dict.get(b"ColorSpace").and_then(Object::as_name),
        Ok(b"DeviceGray")
    );
    if gray { "image/jpeg" } else { "image/png" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Stream;
    use lopdf::dictionary;

    #[test]
    fn gray_images_classify_as_jpeg() {
        let stream = Stream::new(
            dictionary! {
                "Subtype" => "Image",
                "ColorSpace" => "DeviceGray",
            },
            vec![0u8; 4],
        );
        assert_eq!(image_mime_type(&stream), "image/jpeg");
    }

    #[test]
    fn rgb_images_classify_as_png() {
        let stream = Stream::new(
            dictionary! {
                "Subtype" => "Image",
                "ColorSpace" => "DeviceRGB",
            },
            vec![0u8; 4],
        );
        assert_eq!(image_mime_type(&stream), "image/png");
    }

    #[test]
    fn missing_color_space_defaults_to_png() {
        let stream = Stream::new(dictionary! { "Subtype" => "Image" }, vec![0u8; 4]);
        assert_eq!(image_mime_type(&stream), "image/png");
    }
}
