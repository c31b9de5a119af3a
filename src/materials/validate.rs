//! Shape checks on decoded model output and the fallback artifacts.

use super::types::{Flashcard, GenerationFailure, GenerationResult, MaterialType, Question};
use serde_json::Value;

const FLASHCARD_FALLBACK_TERM: &str = "Study Tip";
const FLASHCARD_FALLBACK_DEFINITION: &str =
    "There was an error generating flashcards. Please try again with different content.";
const QUESTION_FALLBACK_PROMPT: &str = "There was an error generating questions. Please try again.";
const QUESTION_FALLBACK_OPTIONS: [&str; 4] =
    ["Try again", "Check content", "Verify format", "Contact support"];

/// Turn the outcome of generate-and-parse into a non-empty result.
///
/// Entries are not checked field by field; any non-empty array is accepted and capped.
pub fn validate_materials(
    parsed: Result<Value, GenerationFailure>,
    material_type: MaterialType,
) -> GenerationResult {
    match parsed.and_then(|value| check_shape(value, material_type)) {
        Ok(materials) => GenerationResult::Generated(materials),
        Err(cause) => GenerationResult::Fallback {
            materials: fallback_materials(material_type),
            cause,
        },
    }
}

fn check_shape(
    value: Value,
    material_type: MaterialType,
) -> Result<Vec<Value>, GenerationFailure> {
    let Value::Array(mut entries) = value else {
        return Err(GenerationFailure::NotAnArray);
    };
    if entries.is_empty() {
        return Err(GenerationFailure::Empty);
    }
    entries.truncate(material_type.max_items());
    Ok(entries)
}

/// The single placeholder entry returned when generation fails.
pub fn fallback_materials(material_type: MaterialType) -> Vec<Value> {
    let entry = match material_type {
        MaterialType::Flashcards => Value::from(Flashcard {
            term: FLASHCARD_FALLBACK_TERM.to_string(),
            definition: FLASHCARD_FALLBACK_DEFINITION.to_string(),
        }),
        MaterialType::Questions => Value::from(Question {
            question: QUESTION_FALLBACK_PROMPT.to_string(),
            options: QUESTION_FALLBACK_OPTIONS.map(String::from),
            correct_index: 0,
        }),
    };
    vec![entry]
}
