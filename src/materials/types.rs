//! Core data types and error definitions for the study material pipeline.

use crate::generation::GenerationClientError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Requested output shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    /// Term/definition pairs.
    #[default]
    Flashcards,
    /// Four-option multiple-choice questions.
    Questions,
}

impl MaterialType {
    /// Interpret a caller supplied `materialType` value, defaulting to flashcards when the
    /// field is missing or unrecognized.
    pub fn from_field(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("questions") => Self::Questions,
            _ => Self::Flashcards,
        }
    }

    /// Upper bound on entries returned for this material type.
    pub const fn max_items(self) -> usize {
        match self {
            Self::Flashcards => 10,
            Self::Questions => 8,
        }
    }

    /// Wire name of the material type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::Questions => "questions",
        }
    }
}

/// A single term/definition card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Concept or term on the front of the card.
    pub term: String,
    /// Explanation on the back of the card.
    pub definition: String,
}

/// A multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Question prompt.
    pub question: String,
    /// Answer options in display order (A through D).
    pub options: [String; 4],
    /// Zero-based index of the correct option.
    pub correct_index: u8,
}

impl From<Flashcard> for Value {
    fn from(card: Flashcard) -> Self {
        json!({ "term": card.term, "definition": card.definition })
    }
}

impl From<Question> for Value {
    fn from(question: Question) -> Self {
        json!({
            "question": question.question,
            "options": question.options,
            "correctIndex": question.correct_index,
        })
    }
}

/// Reasons a generation attempt was replaced by the fallback artifact.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    /// The provider call itself failed.
    #[error(transparent)]
    Client(#[from] GenerationClientError),
    /// The model output did not decode as JSON.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The decoded JSON was not an array.
    #[error("model output is not a JSON array")]
    NotAnArray,
    /// The decoded JSON array had no entries.
    #[error("model output is an empty array")]
    Empty,
}

impl GenerationFailure {
    /// Short error class used in structured logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Client(_) => "generation",
            Self::Parse(_) => "parse",
            Self::NotAnArray | Self::Empty => "shape",
        }
    }
}

/// Model output could not be decoded as JSON after fence stripping.
#[derive(Debug, Error)]
#[error("model output is not valid JSON: {0}")]
pub struct ParseError(#[from] pub serde_json::Error);

/// Errors raised while turning a request into study content.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The multipart stream could not be read.
    #[error("failed to read multipart form: {0}")]
    Multipart(String),
    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(String),
    /// The uploaded file is not a readable PDF.
    #[error("could not read PDF file: {0}")]
    Pdf(#[from] lopdf::Error),
    /// The blocking extraction task did not complete.
    #[error("PDF extraction task failed: {0}")]
    Task(String),
}

/// Outcome of a generation attempt. Always carries at least one entry.
#[derive(Debug)]
pub enum GenerationResult {
    /// Entries produced by the model, capped to the material type's maximum.
    Generated(Vec<Value>),
    /// Single placeholder entry substituted after a failure.
    Fallback {
        /// Placeholder entries returned to the caller.
        materials: Vec<Value>,
        /// Failure that triggered the substitution.
        cause: GenerationFailure,
    },
}

impl GenerationResult {
    /// Entries that will be returned to the caller.
    pub fn materials(&self) -> &[Value] {
        match self {
            Self::Generated(materials) | Self::Fallback { materials, .. } => materials,
        }
    }

    /// Consume the result, yielding the entries.
    pub fn into_materials(self) -> Vec<Value> {
        match self {
            Self::Generated(materials) | Self::Fallback { materials, .. } => materials,
        }
    }

    /// Whether the fallback artifact was substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Content pulled out of a request, ready for the length gate and prompting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Raw study text.
    pub content: String,
    /// Requested output shape.
    pub material_type: MaterialType,
}
