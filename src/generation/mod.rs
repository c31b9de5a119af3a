//! Text generation against Vertex AI Gemini.
//!
//! The client issues a single non-streaming `generateContent` call per prompt. Region and model
//! are fixed at compile time; only the project (and optionally a static bearer token) come from
//! configuration. Without a static token the client asks the GCE metadata server for one on every
//! call, which is how Cloud Run and Cloud Functions hand out credentials.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Vertex AI processing region.
pub const VERTEX_LOCATION: &str = "us-central1";
/// Gemini model used for every generation request.
pub const VERTEX_MODEL: &str = "gemini-1.5-flash";

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Errors surfaced while requesting a completion from the provider.
#[derive(Debug, Error)]
pub enum GenerationClientError {
    /// Provider could not be reached or the HTTP client could not be built.
    #[error("Generation provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider answered with a non-success status.
    #[error("Failed to generate content: {0}")]
    GenerationFailed(String),
    /// Provider response could not be decoded or carried no text.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
    /// No bearer token could be obtained for the request.
    #[error("Failed to obtain access token: {0}")]
    Credentials(String),
}

/// Interface implemented by text generation providers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send a single prompt and return the raw completion text.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationClientError>;
}

/// Where the client obtains the bearer token attached to each request.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// Fixed token supplied through configuration.
    Static(String),
    /// Token minted by the metadata server at `url` on each call.
    MetadataServer {
        /// Token endpoint of the metadata server.
        url: String,
    },
}

impl TokenSource {
    /// Metadata server token source pointing at the standard GCE endpoint.
    pub fn metadata_server() -> Self {
        Self::MetadataServer {
            url: METADATA_TOKEN_URL.to_string(),
        }
    }
}

/// Vertex AI backed [`GenerationClient`].
pub struct VertexGenerationClient {
    http: Client,
    endpoint: String,
    token_source: TokenSource,
}

impl VertexGenerationClient {
    /// Build a client for the configured project against the regional Vertex endpoint.
    pub fn from_config(config: &Config) -> Result<Self, GenerationClientError> {
        let token_source = config
            .gcp_access_token
            .clone()
            .map(TokenSource::Static)
            .unwrap_or_else(TokenSource::metadata_server);
        Self::with_base_url(
            format!("https://{VERTEX_LOCATION}-aiplatform.googleapis.com"),
            &config.gcp_project_id,
            token_source,
        )
    }

    /// Build a client against an arbitrary base URL (used by tests and private endpoints).
    pub fn with_base_url(
        base_url: impl AsRef<str>,
        project_id: &str,
        token_source: TokenSource,
    ) -> Result<Self, GenerationClientError> {
        let http = Client::builder()
            .user_agent("studygen/vertex")
            .build()
            .map_err(|error| {
                GenerationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        let endpoint = format!(
            "{}/v1/projects/{project_id}/locations/{VERTEX_LOCATION}/publishers/google/models/{VERTEX_MODEL}:generateContent",
            base_url.as_ref().trim_end_matches('/')
        );
        Ok(Self {
            http,
            endpoint,
            token_source,
        })
    }

    /// Fully qualified `generateContent` URL this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn access_token(&self) -> Result<String, GenerationClientError> {
        let url = match &self.token_source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::MetadataServer { url } => url,
        };

        let response = self
            .http
            .get(url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|error| {
                GenerationClientError::Credentials(format!(
                    "failed to reach metadata server: {error}"
                ))
            })?;

        if !response.status().is_success() {
            return Err(GenerationClientError::Credentials(format!(
                "metadata server returned {}",
                response.status()
            )));
        }

        let token: MetadataToken = response.json().await.map_err(|error| {
            GenerationClientError::Credentials(format!("failed to decode token: {error}"))
        })?;
        Ok(token.access_token)
    }
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it produced any.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|part| part.text).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

#[async_trait]
impl GenerationClient for VertexGenerationClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationClientError> {
        let token = self.access_token().await?;
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        tracing::debug!(
            model = VERTEX_MODEL,
            prompt_chars = prompt.chars().count(),
            "Requesting completion"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GenerationClientError::ProviderUnavailable(format!(
                    "failed to reach Vertex AI at {}: {error}",
                    self.endpoint
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationClientError::ProviderUnavailable(format!(
                "Vertex endpoint {} returned 404",
                self.endpoint
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationClientError::GenerationFailed(format!(
                "Vertex AI returned {status}: {body}"
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|error| {
            GenerationClientError::InvalidResponse(format!(
                "failed to decode Vertex response: {error}"
            ))
        })?;

        body.into_text().ok_or_else(|| {
            GenerationClientError::InvalidResponse("response carried no candidate text".into())
        })
    }
}
