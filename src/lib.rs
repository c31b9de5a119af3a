#![deny(missing_docs)]

//! Core library for the study material generator.

/// HTTP routing and the generation endpoint.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text generation client abstraction and the Vertex AI adapter.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Extraction, prompting, parsing, and fallback pipeline.
pub mod materials;
