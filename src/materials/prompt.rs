//! Prompt templates for flashcard and question generation.

use super::types::MaterialType;

/// Maximum number of characters of study material included in a prompt.
pub const MAX_CONTENT_CHARS: usize = 4000;

/// Hard character cut of the study material; no word-boundary handling.
pub fn truncate_content(content: &str) -> &str {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((byte_index, _)) => &content[..byte_index],
        None => content,
    }
}

/// Build the instruction prompt for the requested material type.
pub fn build_prompt(content: &str, material_type: MaterialType) -> String {
    let material = truncate_content(content);
    match material_type {
        MaterialType::Flashcards => flashcards_prompt(material),
        MaterialType::Questions => questions_prompt(material),
    }
}

fn flashcards_prompt(material: &str) -> String {
    format!(
        r#"You are a study assistant. Based on the following study material, create exactly 10 flashcards that will help a student learn the key concepts.

Study Material:
{material}

Instructions:
- Create 10 flashcards with clear, concise terms and definitions
- Focus on the most important concepts, terms, and ideas
- Make definitions clear and educational
- Return ONLY a valid JSON array with this exact format:

[
  {{"term": "concept or term", "definition": "clear explanation"}},
  {{"term": "another concept", "definition": "another explanation"}}
]

Return only the JSON array, no other text."#
    )
}

fn questions_prompt(material: &str) -> String {
    format!(
        r#"You are a study assistant. Based on the following study material, create exactly 8 multiple choice questions to test understanding.

Study Material:
{material}

Instructions:
- Create 8 multiple choice questions
- Each question should have 4 options (A, B, C, D)
- Make questions challenging but fair
- Ensure correct answers are accurate
- Return ONLY a valid JSON array with this exact format:

[
  {{
    "question": "What is...?",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correctIndex": 0
  }}
]

The correctIndex is 0 for A, 1 for B, 2 for C, 3 for D.
Return only the JSON array, no other text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_character_count() {
        let content = "é".repeat(MAX_CONTENT_CHARS + 25);
        let truncated = truncate_content(&content);
        assert_eq!(truncated.chars().count(), MAX_CONTENT_CHARS);

        assert_eq!(truncate_content("short"), "short");
    }

    #[test]
    fn flashcard_prompt_embeds_material_and_keys() {
        let prompt = build_prompt("Mitochondria produce ATP.", MaterialType::Flashcards);
        assert!(prompt.contains("exactly 10 flashcards"));
        assert!(prompt.contains("Mitochondria produce ATP."));
        assert!(prompt.contains(r#"{"term": "concept or term", "definition": "clear explanation"}"#));
        assert!(prompt.ends_with("Return only the JSON array, no other text."));
    }

    #[test]
    fn question_prompt_describes_correct_index() {
        let prompt = build_prompt("Rivers erode valleys.", MaterialType::Questions);
        assert!(prompt.contains("exactly 8 multiple choice questions"));
        assert!(prompt.contains("\"correctIndex\": 0"));
        assert!(prompt.contains("0 for A, 1 for B, 2 for C, 3 for D"));
        assert!(prompt.ends_with("Return only the JSON array, no other text."));
    }

    #[test]
    fn prompt_excludes_material_past_the_limit() {
        let content = format!("{}TAIL-MARKER", "x".repeat(MAX_CONTENT_CHARS));
        let prompt = build_prompt(&content, MaterialType::Flashcards);
        assert!(!prompt.contains("TAIL-MARKER"));
        assert_eq!(build_prompt(&content, MaterialType::Flashcards), prompt);
    }
}
