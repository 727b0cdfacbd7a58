use log::{debug, info};

use crate::GenerationError;
use crate::llm::TextGenerator;
use crate::prompts::{KEYPOINTS_PROMPT, render};

const MAX_TRANSCRIPT_CHARS: usize = 8000;
const MAX_TOKENS: u32 = 600;
const TEMPERATURE: f32 = 0.5;

pub const MAX_KEY_POINTS: usize = 8;

/// Leading list markers, checked in order; only the first match is stripped
const MARKER_PREFIXES: &[&str] = &[
    "1.", "2.", "3.", "4.", "5.", "6.", "7.", "8.", "1)", "2)", "3)", "4)", "5)", "6)", "7)", "8)", "-", "•", "*",
];

/// Extract the core learning points from a transcript
pub async fn generate_key_points(
    generator: &dyn TextGenerator,
    transcript: &str,
) -> Result<Vec<String>, GenerationError> {
    info!("Generating key points...");
    let prompt = render(KEYPOINTS_PROMPT, transcript, MAX_TRANSCRIPT_CHARS);
    let generation = generator.generate(&prompt, MAX_TOKENS, TEMPERATURE).await?;
    debug!("Key points used {:?} tokens", generation.tokens_used);
    Ok(parse_key_points(&generation.text))
}

/// Pull list items out of generated text, falling back to the whole text as one point
pub fn parse_key_points(text: &str) -> Vec<String> {
    let mut points: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '•'))
        .map(strip_marker)
        .filter(|point| !point.is_empty())
        .map(str::to_string)
        .collect();

    if points.is_empty() {
        return vec![text.to_string()];
    }
    points.truncate(MAX_KEY_POINTS);
    points
}

fn strip_marker(line: &str) -> &str {
    MARKER_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .map(str::trim)
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    #[test]
    fn test_numbered_points() {
        let text = "Here are the points:\n1. Light drives photosynthesis.\n2) Chlorophyll absorbs red and blue light.\n\n3. Oxygen is a by-product.";
        assert_eq!(
            parse_key_points(text),
            vec![
                "Light drives photosynthesis.",
                "Chlorophyll absorbs red and blue light.",
                "Oxygen is a by-product."
            ]
        );
    }

    #[test]
    fn test_bullet_points() {
        let text = "- First idea\n  • Second idea  \n* starred lines are not list items here";
        assert_eq!(parse_key_points(text), vec!["First idea", "Second idea"]);
    }

    #[test]
    fn test_caps_at_eight() {
        let text = (1..=12).map(|i| format!("- Point {i}")).collect::<Vec<_>>().join("\n");
        let points = parse_key_points(&text);
        assert_eq!(points.len(), MAX_KEY_POINTS);
        assert_eq!(points[7], "Point 8");
    }

    #[test]
    fn test_empty_markers_skipped() {
        let text = "1.\n2. Real point\n-";
        assert_eq!(parse_key_points(text), vec!["Real point"]);
    }

    #[test]
    fn test_unknown_number_prefix_kept() {
        assert_eq!(parse_key_points("9. Ninth"), vec!["9. Ninth"]);
    }

    #[test]
    fn test_fallback_to_whole_text() {
        let text = "The video explains photosynthesis in plain prose without any list.";
        assert_eq!(parse_key_points(text), vec![text]);
    }

    #[test]
    fn test_output_is_never_empty() {
        for text in ["", "1.", "plain", "- a\n- b"] {
            let n = parse_key_points(text).len();
            assert!((1..=MAX_KEY_POINTS).contains(&n), "{text:?} gave {n} points");
        }
    }

    #[tokio::test]
    async fn test_generate_key_points() {
        let generator = ScriptedGenerator::new().reply("**Key Learning Points:**", "1. One\n2. Two");
        let points = generate_key_points(&generator, "transcript").await.unwrap();
        assert_eq!(points, vec!["One", "Two"]);
        assert_eq!(generator.calls(), vec![(600, 0.5)]);
    }
}
