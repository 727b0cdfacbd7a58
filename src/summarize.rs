use log::{debug, info};

use crate::GenerationError;
use crate::llm::TextGenerator;
use crate::prompts::{SUMMARY_PROMPT, render};

const MAX_TRANSCRIPT_CHARS: usize = 8000;
const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.5;

/// Summarize a transcript; the generated text is returned as-is
pub async fn generate_summary(generator: &dyn TextGenerator, transcript: &str) -> Result<String, GenerationError> {
    info!("Generating summary...");
    let prompt = render(SUMMARY_PROMPT, transcript, MAX_TRANSCRIPT_CHARS);
    let generation = generator.generate(&prompt, MAX_TOKENS, TEMPERATURE).await?;
    debug!("Summary used {:?} tokens", generation.tokens_used);
    Ok(generation.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    #[tokio::test]
    async fn test_summary_passthrough() {
        let generator = ScriptedGenerator::new().reply("**Summary:**", "## Overview\n- Plants make sugar");
        let summary = generate_summary(&generator, "transcript text").await.unwrap();
        assert_eq!(summary, "## Overview\n- Plants make sugar");
        assert_eq!(generator.calls(), vec![(800, 0.5)]);
    }

    #[tokio::test]
    async fn test_summary_propagates_failure() {
        let generator = ScriptedGenerator::new().fail("**Summary:**", GenerationError::Auth);
        let err = generate_summary(&generator, "transcript text").await.unwrap_err();
        assert_eq!(err, GenerationError::Auth);
    }
}
