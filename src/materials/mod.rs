//! Study material pipeline: extraction, prompting, parsing, and fallback handling.

pub mod extract;
pub mod parse;
pub mod prompt;
pub(crate) mod service;
pub mod types;
pub mod validate;

pub use service::{StudyApi, StudyService};
pub use types::{
    ExtractedContent, ExtractionError, Flashcard, GenerationFailure, GenerationResult,
    MaterialType, ParseError, Question,
};
