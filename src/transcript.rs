use log::{debug, info};

use crate::youtube::CaptionsProvider;
use crate::{Error, Transcript, VideoId};

/// Caption languages tried in order before falling back to any track
pub const LANGUAGE_PREFERENCES: &[&str] = &["en", "en-US", "en-GB", "hi", "hi-IN", "es", "fr", "de", "pt", "ja", "ko"];

/// Language recorded when the unconstrained fallback succeeds
pub const AUTO_DETECTED: &str = "auto-detected";

/// At most this many provider errors are quoted in an unavailable-transcript error
const MAX_REPORTED_ERRORS: usize = 3;

/// Fetch a transcript, trying each preferred language and then any available track
pub async fn fetch_transcript(provider: &dyn CaptionsProvider, video_id: &VideoId) -> Result<Transcript, Error> {
    fetch_transcript_with(provider, video_id, LANGUAGE_PREFERENCES).await
}

pub async fn fetch_transcript_with(
    provider: &dyn CaptionsProvider,
    video_id: &VideoId,
    languages: &[&str],
) -> Result<Transcript, Error> {
    info!("Fetching transcript for video ID: {video_id}");

    let attempts = languages
        .iter()
        .map(|lang| (Some(*lang), *lang))
        .chain(std::iter::once((None, AUTO_DETECTED)));

    let mut failures = Vec::new();
    for (language, label) in attempts {
        match provider.fetch_segments(video_id, language).await {
            Ok(segments) => {
                info!("Found transcript in language: {label} ({} segments)", segments.len());
                let transcript = Transcript::from_segments(video_id.clone(), label, segments)?;
                info!(
                    "Transcript for {video_id}: {} chars, {} words",
                    transcript.char_count(),
                    transcript.word_count()
                );
                return Ok(transcript);
            }
            Err(e) => {
                debug!("No {label} transcript for {video_id}: {e}");
                failures.push(format!("{label}: {e}"));
            }
        }
    }

    let skip = failures.len().saturating_sub(MAX_REPORTED_ERRORS);
    Err(Error::TranscriptUnavailable {
        tried: languages.iter().map(|l| l.to_string()).collect(),
        detail: failures[skip..].join("; "),
    })
}
