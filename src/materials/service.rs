//! Generation service coordinating prompting, the model call, parsing, and validation.

use crate::{
    config::Config,
    generation::{GenerationClient, GenerationClientError, VertexGenerationClient},
    materials::{
        parse::parse_response,
        prompt::build_prompt,
        types::{GenerationFailure, GenerationResult, MaterialType},
        validate::validate_materials,
    },
};
use async_trait::async_trait;

/// Turns study content into flashcards or questions.
///
/// The service owns the long-lived generation client. Construct it once near process start and
/// share it with the router through an `Arc`.
pub struct StudyService {
    client: Box<dyn GenerationClient>,
}

/// Abstraction over the generation pipeline used by the HTTP surface.
#[async_trait]
pub trait StudyApi: Send + Sync {
    /// Generate materials for already validated content. Never fails; upstream problems are
    /// reported through [`GenerationResult::Fallback`].
    async fn generate_materials(
        &self,
        content: &str,
        material_type: MaterialType,
    ) -> GenerationResult;
}

impl StudyService {
    /// Wrap an existing generation client.
    pub fn new(client: Box<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Build the service with a Vertex AI client for the configured project.
    pub fn from_config(config: &Config) -> Result<Self, GenerationClientError> {
        tracing::info!(project = %config.gcp_project_id, "Initializing Vertex AI client");
        let client = VertexGenerationClient::from_config(config)?;
        tracing::info!(endpoint = client.endpoint(), "Vertex AI client initialized");
        Ok(Self::new(Box::new(client)))
    }

    async fn generate_and_parse(
        &self,
        content: &str,
        material_type: MaterialType,
    ) -> Result<serde_json::Value, GenerationFailure> {
        let prompt = build_prompt(content, material_type);
        let raw = self.client.generate_text(&prompt).await?;
        tracing::debug!(response_chars = raw.chars().count(), "Received model output");
        Ok(parse_response(&raw)?)
    }
}

#[async_trait]
impl StudyApi for StudyService {
    async fn generate_materials(
        &self,
        content: &str,
        material_type: MaterialType,
    ) -> GenerationResult {
        let parsed = self.generate_and_parse(content, material_type).await;
        let result = validate_materials(parsed, material_type);
        match &result {
            GenerationResult::Generated(materials) => tracing::info!(
                material_type = material_type.as_str(),
                count = materials.len(),
                "Materials generated"
            ),
            GenerationResult::Fallback { cause, .. } => tracing::warn!(
                material_type = material_type.as_str(),
                error_class = cause.kind(),
                error = %cause,
                "Generation failed; returning fallback material"
            ),
        }
        result
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::materials::validate::fallback_materials;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Generation client returning a canned response and recording every prompt.
    #[derive(Clone)]
    pub(crate) struct StubGenerationClient {
        response: Arc<dyn Fn() -> Result<String, GenerationClientError> + Send + Sync>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl StubGenerationClient {
        pub(crate) fn replying(text: impl Into<String>) -> Self {
            let text = text.into();
            Self::with(move || Ok(text.clone()))
        }

        pub(crate) fn failing() -> Self {
            Self::with(|| {
                Err(GenerationClientError::ProviderUnavailable(
                    "connection refused".into(),
                ))
            })
        }

        fn with(
            response: impl Fn() -> Result<String, GenerationClientError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                response: Arc::new(response),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn prompts(&self) -> Vec<String> {
            self.prompts.lock().expect("prompts lock").clone()
        }
    }

    #[async_trait]
    impl GenerationClient for StubGenerationClient {
        async fn generate_text(&self, prompt: &str) -> Result<String, GenerationClientError> {
            self.prompts
                .lock()
                .expect("prompts lock")
                .push(prompt.to_string());
            (self.response)()
        }
    }

    pub(crate) fn flashcards_json(count: usize) -> String {
        let cards: Vec<_> = (0..count)
            .map(|idx| json!({ "term": format!("Term {idx}"), "definition": format!("Definition {idx}") }))
            .collect();
        serde_json::to_string(&cards).expect("serialize cards")
    }

    fn service(client: &StubGenerationClient) -> StudyService {
        StudyService::new(Box::new(client.clone()))
    }

    #[tokio::test]
    async fn generated_flashcards_are_capped() {
        let client = StubGenerationClient::replying(flashcards_json(12));
        let result = service(&client)
            .generate_materials("Cellular respiration notes", MaterialType::Flashcards)
            .await;

        assert!(!result.is_fallback());
        assert_eq!(result.materials().len(), 10);
        let prompts = client.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Cellular respiration notes"));
        assert!(prompts[0].contains("exactly 10 flashcards"));
    }

    #[tokio::test]
    async fn fenced_questions_are_parsed() {
        let questions: Vec<_> = (0..9)
            .map(|idx| {
                json!({
                    "question": format!("Question {idx}?"),
                    "options": ["a", "b", "c", "d"],
                    "correctIndex": idx % 4
                })
            })
            .collect();
        let raw = format!(
            "Here are your questions:\n```json\n{}\n```",
            serde_json::to_string_pretty(&questions).expect("serialize")
        );
        let client = StubGenerationClient::replying(raw);
        let result = service(&client)
            .generate_materials("Plate tectonics notes", MaterialType::Questions)
            .await;

        assert!(!result.is_fallback());
        assert_eq!(result.materials().len(), 8);
        assert_eq!(result.materials()[7]["question"], "Question 7?");
        assert!(client.prompts()[0].contains("exactly 8 multiple choice questions"));
    }

    #[tokio::test]
    async fn transport_error_yields_fallback() {
        let client = StubGenerationClient::failing();
        let result = service(&client)
            .generate_materials("Some notes", MaterialType::Flashcards)
            .await;

        match result {
            GenerationResult::Fallback { materials, cause } => {
                assert_eq!(cause.kind(), "generation");
                assert_eq!(materials, fallback_materials(MaterialType::Flashcards));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn prose_reply_yields_fallback() {
        let client = StubGenerationClient::replying("Sorry, I can't help with that.");
        let result = service(&client)
            .generate_materials("Some notes", MaterialType::Questions)
            .await;

        match result {
            GenerationResult::Fallback { materials, cause } => {
                assert_eq!(cause.kind(), "parse");
                assert_eq!(materials, fallback_materials(MaterialType::Questions));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_array_yields_fallback() {
        let client = StubGenerationClient::replying("[]");
        let result = service(&client)
            .generate_materials("Some notes", MaterialType::Flashcards)
            .await;

        assert!(result.is_fallback());
        assert_eq!(result.materials().len(), 1);
        assert_eq!(result.materials()[0]["term"], "Study Tip");
    }
}
