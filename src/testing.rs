//! Scripted stand-ins for the captions and generation providers

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use eyre::{Result, bail};

use crate::llm::{Generation, TextGenerator};
use crate::youtube::CaptionsProvider;
use crate::{GenerationError, Segment, VideoId};

/// Serves fixed caption text per language and records every attempt
#[derive(Default)]
pub struct ScriptedCaptions {
    by_language: HashMap<String, String>,
    any: Option<String>,
    attempts: Mutex<Vec<Option<String>>>,
}

impl ScriptedCaptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, language: &str, text: &str) -> Self {
        self.by_language.insert(language.to_string(), text.to_string());
        self
    }

    pub fn with_any(mut self, text: &str) -> Self {
        self.any = Some(text.to_string());
        self
    }

    pub fn attempts(&self) -> Vec<Option<String>> {
        self.attempts.lock().unwrap().clone()
    }
}

fn segments_of(text: &str) -> Vec<Segment> {
    text.split(". ")
        .enumerate()
        .map(|(i, part)| Segment {
            text: part.to_string(),
            start: i as f64 * 2.0,
            duration: 2.0,
        })
        .collect()
}

#[async_trait]
impl CaptionsProvider for ScriptedCaptions {
    async fn fetch_segments(&self, video_id: &VideoId, language: Option<&str>) -> Result<Vec<Segment>> {
        self.attempts.lock().unwrap().push(language.map(str::to_string));
        let text = match language {
            Some(lang) => self.by_language.get(lang),
            None => self.any.as_ref(),
        };
        match text {
            Some(text) => Ok(segments_of(text)),
            None => bail!("no {} captions for {video_id}", language.unwrap_or("any")),
        }
    }
}

/// Panics on every fetch, standing in for a bug inside a handler
pub struct PanickingCaptions;

#[async_trait]
impl CaptionsProvider for PanickingCaptions {
    async fn fetch_segments(&self, _video_id: &VideoId, _language: Option<&str>) -> Result<Vec<Segment>> {
        panic!("captions backend exploded");
    }
}

/// Answers each prompt by matching a marker phrase in the prompt text
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Vec<(&'static str, Result<String, GenerationError>)>,
    calls: Mutex<Vec<(u32, f32)>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `text` to any prompt containing `marker`
    pub fn reply(mut self, marker: &'static str, text: &str) -> Self {
        self.replies.push((marker, Ok(text.to_string())));
        self
    }

    pub fn fail(mut self, marker: &'static str, err: GenerationError) -> Self {
        self.replies.push((marker, Err(err)));
        self
    }

    /// (max_tokens, temperature) of every call so far
    pub fn calls(&self) -> Vec<(u32, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<Generation, GenerationError> {
        self.calls.lock().unwrap().push((max_tokens, temperature));
        let (_, reply) = self
            .replies
            .iter()
            .find(|(marker, _)| prompt.contains(marker))
            .ok_or_else(|| GenerationError::Unknown("no scripted reply".to_string()))?;
        reply.clone().map(|text| Generation {
            text,
            tokens_used: Some(42),
        })
    }
}

/// A well-formed quiz block in the prompt's format
pub fn quiz_block(n: usize, answer: char) -> String {
    format!(
        "Question {n}: What is fact number {n}?\n\
         A) First option\n\
         B) Second option\n\
         C) Third option\n\
         D) Fourth option\n\
         Correct Answer: {answer}\n"
    )
}
