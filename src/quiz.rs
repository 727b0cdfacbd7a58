use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::GenerationError;
use crate::llm::TextGenerator;
use crate::prompts::{QUIZ_PROMPT, render};

const MAX_TRANSCRIPT_CHARS: usize = 9000;
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.6;

pub const QUIZ_SIZE: usize = 10;

/// Question text, four options and an answer line
const MIN_BLOCK_LINES: usize = 6;

static QUESTION_DELIMITER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Question\s+\d+:").unwrap());
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-D])\)\s*(.*)$").unwrap());
static ANSWER_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b([A-D])\b").unwrap());

/// One of the four answer slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" => Some(Choice::A),
            "B" => Some(Choice::B),
            "C" => Some(Choice::C),
            "D" => Some(Choice::D),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The four options of a question, keyed "A" through "D" on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl QuizOptions {
    pub fn get(&self, choice: Choice) -> &str {
        match choice {
            Choice::A => &self.a,
            Choice::B => &self.b,
            Choice::C => &self.c,
            Choice::D => &self.d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: QuizOptions,
    pub correct_answer: Choice,
}

/// Generate up to ten multiple-choice questions from a transcript
pub async fn generate_quiz(generator: &dyn TextGenerator, transcript: &str) -> Result<Vec<QuizQuestion>, GenerationError> {
    info!("Generating quiz questions...");
    let prompt = render(QUIZ_PROMPT, transcript, MAX_TRANSCRIPT_CHARS);
    let generation = generator.generate(&prompt, MAX_TOKENS, TEMPERATURE).await?;
    debug!("Quiz used {:?} tokens", generation.tokens_used);

    let questions = parse_quiz(&generation.text);
    // Fewer than ten parsed questions are returned as-is
    if questions.len() < QUIZ_SIZE {
        warn!("Quiz parsed {} of {QUIZ_SIZE} questions", questions.len());
    }
    Ok(questions)
}

/// Parse "Question N:" blocks, dropping any block that is not a complete question
pub fn parse_quiz(text: &str) -> Vec<QuizQuestion> {
    QUESTION_DELIMITER
        .split(text)
        .skip(1)
        .filter_map(parse_block)
        .take(QUIZ_SIZE)
        .collect()
}

fn parse_block(block: &str) -> Option<QuizQuestion> {
    let lines: Vec<&str> = block.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.len() < MIN_BLOCK_LINES {
        debug!("Skipping quiz block with {} lines", lines.len());
        return None;
    }

    let question = lines[0].trim_matches('*').trim();
    if question.is_empty() {
        return None;
    }

    let mut options: [Option<String>; 4] = Default::default();
    let mut correct_answer = None;

    for line in &lines[1..] {
        if let Some(caps) = OPTION_LINE.captures(line) {
            if let Some(choice) = Choice::from_letter(&caps[1]) {
                options[choice.index()] = Some(caps[2].trim().to_string());
            }
        } else if correct_answer.is_none() && line.to_lowercase().contains("correct answer") {
            correct_answer = ANSWER_LETTER
                .captures(line)
                .and_then(|caps| Choice::from_letter(&caps[1]));
        }
    }

    let [Some(a), Some(b), Some(c), Some(d)] = options else {
        debug!("Skipping quiz block missing options: {question}");
        return None;
    };
    let correct_answer = correct_answer?;

    Some(QuizQuestion {
        question: question.to_string(),
        options: QuizOptions { a, b, c, d },
        correct_answer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGenerator, quiz_block};

    #[test]
    fn test_parse_single_question() {
        let text = "Here is your quiz.\n\nQuestion 1: What do plants release?\nA) Oxygen\nB) Nitrogen\nC) Helium\nD) Argon\nCorrect Answer: A\n";
        let questions = parse_quiz(text);
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.question, "What do plants release?");
        assert_eq!(q.options.get(Choice::A), "Oxygen");
        assert_eq!(q.options.d, "Argon");
        assert_eq!(q.correct_answer, Choice::A);
    }

    #[test]
    fn test_answer_ignores_letters_inside_words() {
        let text = quiz_block(1, 'B');
        assert_eq!(parse_quiz(&text)[0].correct_answer, Choice::B);

        let text = "Question 1: Pick one\nA) w\nB) x\nC) y\nD) z\nThe correct answer is D) z";
        assert_eq!(parse_quiz(text)[0].correct_answer, Choice::D);
    }

    #[test]
    fn test_markdown_delimiters() {
        let text = "**Question 1:** What is **bold**?\nA) a\nB) b\nC) c\nD) d\n**Correct Answer: C**";
        let questions = parse_quiz(text);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is **bold**?");
        assert_eq!(questions[0].correct_answer, Choice::C);
    }

    #[test]
    fn test_drops_block_with_three_options() {
        let text = format!(
            "Question 1: Incomplete\nA) a\nB) b\nC) c\nExtra line\nCorrect Answer: A\n{}",
            quiz_block(2, 'D')
        );
        let questions = parse_quiz(&text);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is fact number 2?");
    }

    #[test]
    fn test_drops_block_without_answer() {
        let text = "Question 1: No answer\nA) a\nB) b\nC) c\nD) d\nAnswer: it's complicated";
        assert!(parse_quiz(text).is_empty());
    }

    #[test]
    fn test_drops_short_block() {
        let text = "Question 1: Too short\nA) a\nB) b\nCorrect Answer: A";
        assert!(parse_quiz(text).is_empty());
    }

    #[test]
    fn test_nine_questions_not_padded() {
        let text: String = (1..=9).map(|n| quiz_block(n, 'A')).collect();
        assert_eq!(parse_quiz(&text).len(), 9);
    }

    #[test]
    fn test_truncates_to_ten() {
        let text: String = (1..=13).map(|n| quiz_block(n, 'C')).collect();
        let questions = parse_quiz(&text);
        assert_eq!(questions.len(), QUIZ_SIZE);
        assert_eq!(questions[9].question, "What is fact number 10?");
    }

    #[test]
    fn test_no_delimiters() {
        assert!(parse_quiz("I could not create a quiz for this video.").is_empty());
    }

    #[test]
    fn test_question_serializes_letter_keys() {
        let q = &parse_quiz(&quiz_block(1, 'B'))[0];
        let json = serde_json::to_value(q).unwrap();
        assert_eq!(json["options"]["A"], "First option");
        assert_eq!(json["correct_answer"], "B");
    }

    #[tokio::test]
    async fn test_generate_quiz() {
        let raw: String = (1..=10).map(|n| quiz_block(n, 'D')).collect();
        let generator = ScriptedGenerator::new().reply("**Quiz (10 Questions):**", &raw);
        let questions = generate_quiz(&generator, "transcript").await.unwrap();
        assert_eq!(questions.len(), 10);
        assert!(questions.iter().all(|q| q.correct_answer == Choice::D));
        assert_eq!(generator.calls(), vec![(2000, 0.6)]);
    }
}
