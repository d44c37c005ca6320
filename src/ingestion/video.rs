//! Video platform extraction: audio download plus transcription.

use tokio::process::Command;
use tracing::info;
use url::Url;

use crate::error::ExtractError;

use super::audio::AudioExtractor;

const STAGE: &str = "video";

/// Downloads a video's audio track and delegates to the audio extractor.
///
/// The download lands in a scoped temporary directory that is removed on
/// every exit path, whether or not `yt-dlp` or the transcription succeed.
#[derive(Clone)]
pub struct VideoExtractor {
    audio: AudioExtractor,
}

impl VideoExtractor {
    pub fn new(audio: AudioExtractor) -> Self {
        Self { audio }
    }

    /// Resolve the canonical video id from a platform URL.
    ///
    /// Supported shapes: `youtu.be/<id>`, `watch?v=<id>`, `/shorts/<id>`,
    /// `/embed/<id>`, `/live/<id>`.
    pub fn video_id(url: &Url) -> Option<String> {
        let host = url.host_str()?.to_ascii_lowercase();
        let mut segments = url.path_segments()?;

        if host.contains("youtu.be") {
            return segments.next().filter(|s| !s.is_empty()).map(str::to_string);
        }

        if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v") {
            if !id.is_empty() {
                return Some(id.into_owned());
            }
        }

        match segments.next() {
            Some("shorts") | Some("embed") | Some("live") => segments
                .next()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            _ => None,
        }
    }

    /// Download best-available audio for the video and transcribe it.
    pub async fn extract(&self, url: &Url) -> Result<String, ExtractError> {
        let video_id = Self::video_id(url)
            .ok_or_else(|| ExtractError::msg(STAGE, format!("no video id in {url}")))?;

        info!(%url, video_id, "downloading video audio track");

        let workspace = tempfile::tempdir().map_err(|e| ExtractError::new(STAGE, e))?;
        let template = workspace.path().join(format!("{video_id}.%(ext)s"));

        let output = Command::new("yt-dlp")
            .arg("--format")
            .arg("bestaudio/best")
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg("mp3")
            .arg("--audio-quality")
            .arg("192K")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("--output")
            .arg(&template)
            .arg(url.as_str())
            .output()
            .await
            .map_err(|e| ExtractError::new(STAGE, e))?;

        if !output.status.success() {
            return Err(ExtractError::msg(
                STAGE,
                format!(
                    "yt-dlp exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let audio_path = workspace.path().join(format!("{video_id}.mp3"));
        let bytes = tokio::fs::read(&audio_path).await.map_err(|_| {
            ExtractError::msg(STAGE, "no audio artifact produced by download")
        })?;

        self.audio.extract(bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(url: &str) -> Option<String> {
        VideoExtractor::video_id(&Url::parse(url).unwrap())
    }

    #[test]
    fn watch_urls_use_the_v_parameter() {
        assert_eq!(
            id_of("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            id_of("https://www.youtube.com/watch?list=PL123&v=abc123xyz00"),
            Some("abc123xyz00".to_string())
        );
    }

    #[test]
    fn short_link_hosts_use_the_first_segment() {
        assert_eq!(
            id_of("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn shorts_and_embed_paths_resolve() {
        assert_eq!(
            id_of("https://www.youtube.com/shorts/abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(
            id_of("https://www.youtube.com/embed/xyz789"),
            Some("xyz789".to_string())
        );
    }

    #[test]
    fn urls_without_an_id_resolve_to_none() {
        assert_eq!(id_of("https://www.youtube.com/feed/library"), None);
        assert_eq!(id_of("https://www.youtube.com/"), None);
    }
}
