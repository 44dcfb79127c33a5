// src/api/config.rs

/// Base URL for the Anthropic API.
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Value sent in the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20240620";

pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Sampling temperature for the single-shot backend.
pub const TEMPERATURE: f32 = 0.0;

pub const DEFAULT_VERTEX_MODEL: &str = "gemini-1.5-pro-001";

pub const DEFAULT_VERTEX_LOCATION: &str = "us-central1";

/// System prompt shared by both backends.
pub const TUTOR_SYSTEM_PROMPT: &str =
    "You are a coding expert and a tutor to help the user learn more about the codebase.";

/// Second system instruction line for the conversational backend.
pub const TUTOR_MISSION: &str =
    "Your mission is to answer all code related questions with given context and instructions.";

/// Regional Vertex AI endpoint for `location`.
pub fn vertex_base_url(location: &str) -> String {
    format!("https://{}-aiplatform.googleapis.com", location)
}
