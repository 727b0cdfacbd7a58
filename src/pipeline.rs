use std::sync::Arc;

use log::{info, warn};

use crate::keypoints::generate_key_points;
use crate::llm::TextGenerator;
use crate::output::{LearningPackage, format_learning_package};
use crate::quiz::generate_quiz;
use crate::store::TranscriptStore;
use crate::summarize::generate_summary;
use crate::transcript::fetch_transcript;
use crate::youtube::CaptionsProvider;
use crate::{Error, Stage, StageError, Transcript, extract_video_id};

/// The collaborators one request runs against, built once at startup
#[derive(Clone)]
pub struct Pipeline {
    captions: Arc<dyn CaptionsProvider>,
    generator: Arc<dyn TextGenerator>,
    store: TranscriptStore,
}

impl Pipeline {
    pub fn new(captions: Arc<dyn CaptionsProvider>, generator: Arc<dyn TextGenerator>, store: TranscriptStore) -> Self {
        Self {
            captions,
            generator,
            store,
        }
    }

    /// Resolve the URL, fetch its transcript and archive it
    pub async fn transcript(&self, youtube_url: &str) -> Result<Transcript, StageError> {
        let video_id = extract_video_id(youtube_url).map_err(|e| StageError::new(Stage::Validation, e))?;

        let transcript = fetch_transcript(self.captions.as_ref(), &video_id)
            .await
            .map_err(|e| StageError::new(Stage::TranscriptExtraction, e))?;

        let store = self.store.clone();
        let record = transcript.clone();
        match tokio::task::spawn_blocking(move || store.save(&record)).await {
            Ok(Ok(path)) => info!("Transcript saved to: {}", path.display()),
            Ok(Err(e)) => warn!("Could not save transcript for {video_id}: {e}"),
            Err(e) => warn!("Transcript save task for {video_id} failed: {e}"),
        }
        Ok(transcript)
    }

    /// Run every stage and assemble the learning package
    pub async fn process(&self, youtube_url: &str) -> Result<LearningPackage, StageError> {
        info!("Extracting transcript for: {youtube_url}");
        let transcript = self.transcript(youtube_url).await?;
        let text = transcript.text();
        let generator = self.generator.as_ref();

        let (summary, key_points, quiz) = tokio::join!(
            generate_summary(generator, text),
            generate_key_points(generator, text),
            generate_quiz(generator, text),
        );

        let summary = summary.map_err(|e| StageError::new(Stage::SummaryGeneration, Error::from(e)))?;
        let key_points = key_points.map_err(|e| StageError::new(Stage::KeypointsGeneration, Error::from(e)))?;
        let quiz = quiz.map_err(|e| StageError::new(Stage::QuizGeneration, Error::from(e)))?;

        info!(
            "Generated learning package for {}: {} key points, {} quiz questions",
            transcript.video_id(),
            key_points.len(),
            quiz.len()
        );
        Ok(format_learning_package(&transcript, Some(summary), key_points, quiz))
    }
}
