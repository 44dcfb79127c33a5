use reqwest;
use serde_json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("API returned an error (status {status}): {body}")]
    ApiError { status: u16, body: String },
    #[error("stream error: {0}")]
    StreamError(String),
    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },
    #[error("credentials unavailable: {0}")]
    Credentials(String),
}
