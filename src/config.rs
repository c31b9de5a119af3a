use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Listen port used when neither `PORT` nor `--port` is provided.
pub const DEFAULT_PORT: u16 = 8080;

/// Request body ceiling applied when `MAX_UPLOAD_BYTES` is unset.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the study material service.
///
/// The Vertex AI region and model are compiled in; only the hosting project and transport
/// knobs are read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Cloud project that hosts the Vertex AI endpoint.
    pub gcp_project_id: String,
    /// Optional static bearer token; the metadata server is queried when absent.
    pub gcp_access_token: Option<String>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// Optional log file path; `logs/studygen.log` is used when unset.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gcp_project_id: load_env("GCP_PROJECT_ID")?,
            gcp_access_token: load_env_optional("GCP_ACCESS_TOKEN"),
            server_port: load_env_optional("PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("PORT".into()))
                })
                .transpose()?,
            max_upload_bytes: load_env_optional("MAX_UPLOAD_BYTES")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("MAX_UPLOAD_BYTES".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            log_file: load_env_optional("STUDYGEN_LOG_FILE").map(PathBuf::from),
        })
    }

    /// Port the server should bind, honoring the environment override.
    pub fn port(&self) -> u16 {
        self.server_port.unwrap_or(DEFAULT_PORT)
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Load `.env` (when present) and the process environment into a [`Config`].
///
/// Call this before [`crate::logging::init_tracing`] so `RUST_LOG` and `STUDYGEN_LOG_FILE`
/// from `.env` reach the subscriber.
pub fn init_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    Config::from_env()
}

impl Config {
    /// Emit the loaded settings at debug level. Secrets are reported only by presence.
    pub fn log_summary(&self) {
        tracing::debug!(
            project = %self.gcp_project_id,
            static_token = self.gcp_access_token.is_some(),
            server_port = ?self.server_port,
            max_upload_bytes = self.max_upload_bytes,
            log_file = ?self.log_file,
            "Loaded configuration"
        );
    }
}
