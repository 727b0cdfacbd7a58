pub mod config;
pub mod error;
pub mod keypoints;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod quiz;
pub mod server;
pub mod store;
pub mod summarize;
pub mod transcript;
pub mod youtube;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use error::{Error, GenerationError, Stage, StageError};

/// Known URL shapes, checked in order; the first capture wins
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:https?://)?(?:www\.)?youtube\.com/watch\?(?:[^#\s]*&)?v=([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtu\.be/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtube\.com/v/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtube\.com/shorts/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?m\.youtube\.com/watch\?(?:[^#\s]*&)?v=([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static BARE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap());

/// An 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VideoId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if BARE_ID.is_match(&value) {
            Ok(VideoId(value))
        } else {
            Err(Error::InvalidVideoId(value))
        }
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single captioned segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Transcripts whose trimmed text is shorter than this are rejected
pub const MIN_TRANSCRIPT_CHARS: usize = 50;

/// Complete transcript for a video, built once from provider segments
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    video_id: VideoId,
    language: String,
    segments: Vec<Segment>,
    text: String,
    word_count: usize,
    char_count: usize,
}

impl Transcript {
    /// Join segment texts and compute counts, rejecting near-empty transcripts
    pub fn from_segments(video_id: VideoId, language: impl Into<String>, segments: Vec<Segment>) -> Result<Self, Error> {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let trimmed_chars = text.trim().chars().count();
        if trimmed_chars < MIN_TRANSCRIPT_CHARS {
            return Err(Error::TranscriptTooShort { chars: trimmed_chars });
        }

        Ok(Transcript {
            video_id,
            language: language.into(),
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            segments,
            text,
        })
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }
}

/// Extract video ID from various YouTube URL formats, or accept a bare ID
pub fn extract_video_id(input: &str) -> Result<VideoId, Error> {
    let input = input.trim();

    for pattern in URL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(input) {
            return Ok(VideoId(caps[1].to_string()));
        }
    }

    VideoId::try_from(input.to_string())
}
