// src/api/vertex.rs

use super::{
    config,
    errors::GatewayError,
    sse::{self, FragmentStream},
};
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use tokio::process::Command;

/// Environment variable consulted for a Vertex AI OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "VERTEX_ACCESS_TOKEN";

/// Connection to Vertex AI for one project and location.
#[derive(Clone)]
pub struct VertexSession {
    client: Client,
    base_url: String,
    project: String,
    location: String,
    access_token: String,
}

impl fmt::Debug for VertexSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexSession")
            .field("base_url", &self.base_url)
            .field("project", &self.project)
            .field("location", &self.location)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl VertexSession {
    pub fn init(project: &str, location: &str, access_token: String) -> Self {
        log::debug!("Initializing Vertex AI session for {}/{}", project, location);
        Self {
            client: Client::new(),
            base_url: config::vertex_base_url(location),
            project: project.to_string(),
            location: location.to_string(),
            access_token,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Creates a model handle bound to this session.
    pub fn generative_model(&self, model_id: &str, system_instruction: &[&str]) -> GenerativeModel {
        GenerativeModel {
            session: self.clone(),
            model_id: model_id.to_string(),
            system_instruction: system_instruction.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A Gemini model with a fixed system instruction.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    session: VertexSession,
    model_id: String,
    system_instruction: Vec<String>,
}

impl GenerativeModel {
    pub fn start_chat(&self) -> ChatSession {
        ChatSession {
            model: self.clone(),
            history: Vec::new(),
        }
    }

    fn stream_url(&self) -> String {
        let session = &self.session;
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:streamGenerateContent?alt=sse",
            session.base_url, session.project, session.location, self.model_id
        )
    }
}

/// A conversation whose turn history is kept on the client and replayed on
/// every request.
#[derive(Debug, Clone)]
pub struct ChatSession {
    model: GenerativeModel,
    history: Vec<Content>,
}

impl ChatSession {
    /// Sends `prompt` after the recorded history and returns the reply as a
    /// stream of text fragments. The history itself is not touched; call
    /// [`ChatSession::record_exchange`] once the full reply is in.
    pub async fn send_message_streaming(
        &self,
        prompt: &str,
    ) -> Result<FragmentStream, GatewayError> {
        let mut contents = self.history.clone();
        contents.push(Content::user(prompt));

        let system_instruction = SystemInstruction {
            parts: self
                .model
                .system_instruction
                .iter()
                .map(|text| Part { text: text.clone() })
                .collect(),
        };
        let body = RequestBody {
            contents: &contents,
            system_instruction: &system_instruction,
        };

        log::debug!(
            "Calling Vertex AI streamGenerateContent (model {}, {} prior turns)",
            self.model.model_id,
            self.history.len()
        );

        let response = self
            .model
            .session
            .client
            .post(self.model.stream_url())
            .bearer_auth(&self.model.session.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            log::error!("Vertex AI streaming request error {}: {}", status, error_text);
            return Err(GatewayError::ApiError {
                status: status.as_u16(),
                body: error_text,
            });
        }

        Ok(sse::vertex_sse_to_stream(response))
    }

    pub fn record_exchange(&mut self, prompt: &str, answer: &str) {
        self.history.push(Content::user(prompt));
        self.history.push(Content::model(answer));
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

/// Resolves the OAuth token: explicit value, then `VERTEX_ACCESS_TOKEN`, then
/// `gcloud auth print-access-token`.
pub async fn resolve_access_token(configured: Option<&str>) -> Result<String, GatewayError> {
    if let Some(token) = configured.filter(|t| !t.trim().is_empty()) {
        return Ok(token.trim().to_string());
    }
    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
        if !token.trim().is_empty() {
            return Ok(token.trim().to_string());
        }
    }

    log::debug!("Requesting access token from gcloud");
    let output = Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .await
        .map_err(|e| {
            GatewayError::Credentials(format!(
                "set {} or install the gcloud CLI ({})",
                ACCESS_TOKEN_ENV, e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GatewayError::Credentials(format!(
            "gcloud auth print-access-token failed: {}",
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(GatewayError::Credentials(
            "gcloud returned an empty access token".to_string(),
        ));
    }
    Ok(token)
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: "user",
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    fn model(text: &str) -> Self {
        Self {
            role: "model",
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    contents: &'a [Content],
    system_instruction: &'a SystemInstruction,
}
