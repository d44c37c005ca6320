//! Audio truncation and transcription.

use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, info};

use crate::capabilities::SpeechTranscriber;
use crate::error::ExtractError;

const STAGE: &str = "audio";

/// Maximum audio duration submitted for transcription, in seconds.
///
/// Longer recordings are cut at this mark before the capability call to
/// bound transcription cost and latency.
pub const MAX_AUDIO_SECONDS: u32 = 8 * 60;

/// Truncates audio to [`MAX_AUDIO_SECONDS`] and transcribes it.
#[derive(Clone)]
pub struct AudioExtractor {
    transcriber: Arc<dyn SpeechTranscriber>,
}

impl AudioExtractor {
    pub fn new(transcriber: Arc<dyn SpeechTranscriber>) -> Self {
        Self { transcriber }
    }

    /// Transcribe an audio payload.
    ///
    /// The payload is staged in a temporary file, truncated with `ffmpeg`
    /// into a second temporary file, and the clipped bytes are sent to the
    /// transcription capability. Both files are scoped guards, removed on
    /// every exit path including transcription failure.
    pub async fn extract(&self, content: Vec<u8>) -> Result<String, ExtractError> {
        let source = tempfile::Builder::new()
            .prefix("chunksmith-audio-")
            .suffix(".mp3")
            .tempfile()
            .map_err(|e| ExtractError::new(STAGE, e))?;
        let clipped = tempfile::Builder::new()
            .prefix("chunksmith-clip-")
            .suffix(".mp3")
            .tempfile()
            .map_err(|e| ExtractError::new(STAGE, e))?;

        tokio::fs::write(source.path(), &content)
            .await
            .map_err(|e| ExtractError::new(STAGE, e))?;

        debug!(bytes = content.len(), "truncating audio before transcription");
        let output = Command::new("ffmpeg")
            .arg("-y")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(source.path())
            .arg("-t")
            .arg(MAX_AUDIO_SECONDS.to_string())
            .arg("-acodec")
            .arg("copy")
            .arg(clipped.path())
            .output()
            .await
            .map_err(|e| ExtractError::new(STAGE, e))?;

        if !output.status.success() {
            return Err(ExtractError::msg(
                STAGE,
                format!(
                    "ffmpeg exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let clipped_bytes = tokio::fs::read(clipped.path())
            .await
            .map_err(|e| ExtractError::new(STAGE, e))?;

        info!(bytes = clipped_bytes.len(), "transcribing audio");
        self.transcriber
            .transcribe(clipped_bytes, "audio.mp3")
            .await
            .map_err(|e| ExtractError::new(STAGE, e))
    }
}
