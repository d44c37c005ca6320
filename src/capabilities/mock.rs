//! Deterministic in-memory capability providers for tests and offline runs.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::CapabilityError;
use crate::types::ExcerptCandidate;

use super::{ExcerptPlanner, ImageDescriber, SpeechTranscriber};

/// Transcriber that returns a fixed string and records call payload sizes.
#[derive(Debug, Default)]
pub struct MockTranscriber {
    text: String,
    calls: Mutex<Vec<usize>>,
}

impl MockTranscriber {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Byte sizes of the audio payloads this mock has seen.
    pub fn call_sizes(&self) -> Vec<usize> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl SpeechTranscriber for MockTranscriber {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        _file_name: &str,
    ) -> Result<String, CapabilityError> {
        self.calls.lock().expect("mock lock poisoned").push(audio.len());
        Ok(self.text.clone())
    }
}

/// Describer that echoes the MIME type it was handed.
#[derive(Debug, Default)]
pub struct MockDescriber;

#[async_trait]
impl ImageDescriber for MockDescriber {
    async fn describe(&self, _image: Vec<u8>, mime_type: &str) -> Result<String, CapabilityError> {
        Ok(format!("[image transcription: {mime_type}]"))
    }
}

/// Planner that returns a fixed candidate list regardless of input.
#[derive(Debug, Default)]
pub struct MockPlanner {
    candidates: Vec<ExcerptCandidate>,
}

impl MockPlanner {
    pub fn new(candidates: Vec<ExcerptCandidate>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl ExcerptPlanner for MockPlanner {
    async fn propose_excerpts(
        &self,
        _document: &str,
    ) -> Result<Vec<ExcerptCandidate>, CapabilityError> {
        Ok(self.candidates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_transcriber_is_deterministic_and_records_calls() {
        let transcriber = MockTranscriber::new("spoken words");
        let first = transcriber.transcribe(vec![0; 16], "a.mp3").await.unwrap();
        let second = transcriber.transcribe(vec![0; 32], "b.mp3").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(transcriber.call_sizes(), vec![16, 32]);
    }

    #[tokio::test]
    async fn mock_describer_reports_mime() {
        let describer = MockDescriber;
        let text = describer.describe(vec![1], "image/png").await.unwrap();
        assert!(text.contains("image/png"));
    }
}
