use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::quiz::QuizQuestion;
use crate::{Segment, Stage, Transcript};

const SUMMARY_PLACEHOLDER: &str = "Summary not available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPackage {
    pub success: bool,
    pub video_id: String,
    pub generated_at: String,
    pub transcript: TranscriptSection,
    pub summary: SummarySection,
    pub key_points: KeyPointsSection,
    pub quiz: QuizSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSection {
    pub text: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySection {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPointsSection {
    pub points: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSection {
    pub questions: Vec<QuizQuestion>,
    pub total_questions: usize,
}

/// Body of every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    pub stage: Stage,
    pub timestamp: String,
}

/// Body of a successful transcript-only request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub success: bool,
    pub video_id: String,
    pub transcript: String,
    pub segments: Vec<Segment>,
    pub word_count: usize,
    pub char_count: usize,
    pub language: String,
}

fn timestamp(at: DateTime<Local>) -> String {
    at.to_rfc3339()
}

pub fn format_learning_package(
    transcript: &Transcript,
    summary: Option<String>,
    key_points: Vec<String>,
    quiz: Vec<QuizQuestion>,
) -> LearningPackage {
    format_learning_package_at(Local::now(), transcript, summary, key_points, quiz)
}

/// Assemble the response envelope; deterministic for a fixed `generated_at`
pub fn format_learning_package_at(
    generated_at: DateTime<Local>,
    transcript: &Transcript,
    summary: Option<String>,
    key_points: Vec<String>,
    quiz: Vec<QuizQuestion>,
) -> LearningPackage {
    LearningPackage {
        success: true,
        video_id: transcript.video_id().to_string(),
        generated_at: timestamp(generated_at),
        transcript: TranscriptSection {
            text: transcript.text().to_string(),
            word_count: transcript.word_count(),
        },
        summary: SummarySection {
            text: summary.unwrap_or_else(|| SUMMARY_PLACEHOLDER.to_string()),
        },
        key_points: KeyPointsSection {
            total: key_points.len(),
            points: key_points,
        },
        quiz: QuizSection {
            total_questions: quiz.len(),
            questions: quiz,
        },
    }
}

pub fn format_error(message: impl Into<String>, stage: Stage) -> ErrorEnvelope {
    ErrorEnvelope {
        success: false,
        error: message.into(),
        stage,
        timestamp: timestamp(Local::now()),
    }
}

pub fn format_transcript(transcript: &Transcript) -> TranscriptResult {
    TranscriptResult {
        success: true,
        video_id: transcript.video_id().to_string(),
        transcript: transcript.text().to_string(),
        segments: transcript.segments().to_vec(),
        word_count: transcript.word_count(),
        char_count: transcript.char_count(),
        language: transcript.language().to_string(),
    }
}
