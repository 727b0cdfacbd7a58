use serde::{Deserialize, Serialize};

/// Failures the learning pipeline can report to a caller
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error(
        "Invalid YouTube URL. Please provide a valid YouTube video link. \
         Supported formats: youtube.com/watch?v=..., youtu.be/..., youtube.com/shorts/..."
    )]
    InvalidVideoId(String),

    #[error(
        "No transcript available for this video. The video may not have captions/subtitles enabled. \
         Tried languages: {}. Error: {detail}",
        .tried.join(", ")
    )]
    TranscriptUnavailable { tried: Vec<String>, detail: String },

    #[error("Transcript is too short or empty. Please try a different video.")]
    TranscriptTooShort { chars: usize },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Classified failures from the generation provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid API key. Please check your OPENAI_API_KEY.")]
    Auth,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("OpenAI API error: {0}")]
    Provider(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

/// Pipeline step a failure originated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    TranscriptExtraction,
    SummaryGeneration,
    KeypointsGeneration,
    QuizGeneration,
    ServerError,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Stage::Validation => "validation",
            Stage::TranscriptExtraction => "transcript_extraction",
            Stage::SummaryGeneration => "summary_generation",
            Stage::KeypointsGeneration => "keypoints_generation",
            Stage::QuizGeneration => "quiz_generation",
            Stage::ServerError => "server_error",
        };
        write!(f, "{tag}")
    }
}

/// An [`Error`] tagged with the stage that produced it
#[derive(Debug, thiserror::Error)]
#[error("{stage}: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl StageError {
    pub fn new(stage: Stage, source: impl Into<Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
