//! Word-processor and slide-deck extraction.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::ExtractError;

/// Extracts paragraph text from Office Open XML word-processor documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate paragraph texts, blank-line separated.
    pub fn extract(&self, content: &[u8]) -> Result<String, ExtractError> {
        let document =
            docx_rs::read_docx(content).map_err(|e| ExtractError::new("docx", e))?;

        let mut paragraphs = Vec::new();
        for child in document.document.children {
            let docx_rs::DocumentChild::Paragraph(paragraph) = child else {
                continue;
            };
            let mut text = String::new();
            for child in paragraph.children {
                let docx_rs::ParagraphChild::Run(run) = child else {
                    continue;
                };
                for child in run.children {
                    if let docx_rs::RunChild::Text(t) = child {
                        text.push_str(&t.text);
                    }
                }
            }
            paragraphs.push(text);
        }

        Ok(paragraphs.join("\n\n"))
    }
}

/// Extracts shape text from Office Open XML presentations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxExtractor;

impl PptxExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate the text of every text-bearing shape across every slide,
    /// blank-line separated, slides in numeric order.
    pub fn extract(&self, content: &[u8]) -> Result<String, ExtractError> {
        let cursor = Cursor::new(content);
        let mut archive =
            zip::ZipArchive::new(cursor).map_err(|e| ExtractError::new("pptx", e))?;

        let mut slide_names: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
            .map(str::to_string)
            .collect();
        slide_names.sort_by_key(|name| slide_ordinal(name));

        let mut shapes = Vec::new();
        for slide_name in slide_names {
            let mut file = archive
                .by_name(&slide_name)
                .map_err(|e| ExtractError::new("pptx", e))?;
            let mut xml = String::new();
            file.read_to_string(&mut xml)
                .map_err(|e| ExtractError::new("pptx", e))?;
            shapes.extend(shape_texts(&xml));
        }

        Ok(shapes.join("\n\n"))
    }
}

fn slide_ordinal(name: &str) -> u32 {
    name.trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(0)
}

/// Collect the text of each text body (`<p:txBody>`) in a slide's XML.
///
/// Text runs (`<a:t>`) within one body concatenate; paragraph ends
/// (`</a:p>`) become line breaks inside the shape's text.
fn shape_texts(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut shapes = Vec::new();
    let mut current_shape: Option<String> = None;
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"txBody" => current_shape = Some(String::new()),
                b"t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_run
                    && let Some(shape) = current_shape.as_mut()
                    && let Ok(text) = e.unescape()
                {
                    shape.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if let Some(shape) = current_shape.as_mut() {
                        shape.push('\n');
                    }
                }
                b"txBody" => {
                    if let Some(shape) = current_shape.take() {
                        let trimmed = shape.trim();
                        if !trimmed.is_empty() {
                            shapes.push(trimmed.to_string());
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    shapes
}
