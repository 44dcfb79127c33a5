use crate::api::errors::GatewayError;
use std::fmt;
use std::path::PathBuf;
use toml;

#[derive(Debug)]
pub enum AppError {
    IoError(std::io::Error),
    TomlError(toml::de::Error),
    TomlSerializeError(toml::ser::Error),
    FetchFailed { url: String, cause: String },
    ReadFailed { path: PathBuf, source: std::io::Error },
    GenerationFailed(GatewayError),
    CorpusTooLarge { size: usize, limit: usize },
    NotIngested,
    AlreadyIngested,
    MissingApiKey,
    MissingProjectId,
    InvalidInput(String),
    Interrupted,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::IoError(e) => write!(f, "IO error: {}", e),
            AppError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            AppError::TomlSerializeError(e) => write!(f, "TOML serialization error: {}", e),
            AppError::FetchFailed { url, cause } => {
                write!(f, "Failed to clone repository {}: {}", url, cause)
            }
            AppError::ReadFailed { path, source } => {
                write!(f, "Error reading file {}: {}", path.display(), source)
            }
            AppError::GenerationFailed(e) => write!(f, "Error generating response: {}", e),
            AppError::CorpusTooLarge { size, limit } => write!(
                f,
                "Prompt is {} bytes, above the configured limit of {} bytes",
                size, limit
            ),
            AppError::NotIngested => write!(f, "No repository has been processed yet"),
            AppError::AlreadyIngested => {
                write!(f, "A repository was already processed in this session")
            }
            AppError::MissingApiKey => write!(f, "Anthropic API key is required"),
            AppError::MissingProjectId => write!(f, "Vertex AI project id is required"),
            AppError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
            AppError::Interrupted => write!(f, "Interrupted"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::IoError(e) => Some(e),
            AppError::TomlError(e) => Some(e),
            AppError::TomlSerializeError(e) => Some(e),
            AppError::ReadFailed { source, .. } => Some(source),
            AppError::GenerationFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::TomlError(err)
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::TomlSerializeError(err)
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::GenerationFailed(err)
    }
}
