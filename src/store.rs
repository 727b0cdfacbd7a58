use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::Serialize;

use crate::{Segment, Transcript};

/// On-disk record written for every fetched transcript
#[derive(Debug, Serialize)]
struct StoredTranscript<'a> {
    video_id: &'a str,
    timestamp: &'a str,
    full_transcript: &'a str,
    segments: &'a [Segment],
    word_count: usize,
}

/// Write-only archive of raw transcripts, one JSON file per fetch
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

pub fn default_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytlearn")
        .join("transcripts")
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save a transcript as `{video_id}_{YYYYMMDD_HHMMSS}.json`
    pub fn save(&self, transcript: &Transcript) -> Result<PathBuf> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let path = self
            .dir
            .join(format!("{}_{timestamp}.json", transcript.video_id()));

        let record = StoredTranscript {
            video_id: transcript.video_id().as_str(),
            timestamp: &timestamp,
            full_transcript: transcript.text(),
            segments: transcript.segments(),
            word_count: transcript.word_count(),
        };

        std::fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_string_pretty(&record)?;
        std::fs::write(&path, data)?;
        debug!("Saved transcript: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_video_id;

    fn sample_transcript() -> Transcript {
        Transcript::from_segments(
            extract_video_id("dQw4w9WgXcQ").unwrap(),
            "en",
            vec![
                Segment {
                    text: "Mitochondria are the powerhouse of the cell.".to_string(),
                    start: 0.0,
                    duration: 3.0,
                },
                Segment {
                    text: "They produce ATP through respiration.".to_string(),
                    start: 3.0,
                    duration: 2.5,
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_save_writes_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path().join("nested"));
        let path = store.save(&sample_transcript()).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("dQw4w9WgXcQ_"));
        assert!(name.ends_with(".json"));
        // dQw4w9WgXcQ_YYYYMMDD_HHMMSS.json
        assert_eq!(name.len(), 11 + 1 + 15 + 5);

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["video_id"], "dQw4w9WgXcQ");
        assert_eq!(
            json["full_transcript"],
            "Mitochondria are the powerhouse of the cell. They produce ATP through respiration."
        );
        assert_eq!(json["word_count"], 12);
        assert_eq!(json["segments"].as_array().unwrap().len(), 2);
        assert_eq!(json["segments"][1]["start"], 3.0);
        assert_eq!(json["timestamp"].as_str().unwrap().len(), 15);
    }

    #[test]
    fn test_save_fails_when_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = TranscriptStore::new(&blocker);
        assert!(store.save(&sample_transcript()).is_err());
    }
}
