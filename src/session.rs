use crate::api::anthropic::AnthropicApi;
use crate::api::config as api_config;
use crate::api::gateway::{ActiveBackend, AnswerBackend};
use crate::api::vertex::{self, VertexSession};
use crate::errors::AppError;
use crate::file_processing::extractor::{self, ExtractOptions};
use crate::file_processing::fetcher;
use crate::models::{Backend, CodeCorpus, CodeIndex, RepositorySnapshot};
use crate::prompt;
use crate::utils::config::Config;
use std::path::Path;

pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const VERTEX_PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Everything one user session knows: the ingested repository, the selected
/// backend and, once a question was asked, that backend's live state.
#[derive(Debug)]
pub struct Session {
    config: Config,
    backend: Backend,
    ingested: Option<(CodeIndex, CodeCorpus)>,
    active: Option<ActiveBackend>,
}

impl Session {
    pub fn new(backend: Backend, config: Config) -> Self {
        Self {
            config,
            backend,
            ingested: None,
            active: None,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn code_index(&self) -> Option<&CodeIndex> {
        self.ingested.as_ref().map(|(index, _)| index)
    }

    pub fn code_corpus(&self) -> Option<&CodeCorpus> {
        self.ingested.as_ref().map(|(_, corpus)| corpus)
    }

    #[cfg(test)]
    pub fn has_live_backend(&self) -> bool {
        self.active.is_some()
    }

    /// Clones `source_url` into `target_dir` and extracts it.
    pub async fn ingest(&mut self, source_url: &str, target_dir: &Path) -> Result<(), AppError> {
        if self.ingested.is_some() {
            return Err(AppError::AlreadyIngested);
        }
        let snapshot = fetcher::fetch(source_url, target_dir, self.config.shallow_clone).await?;
        self.ingest_snapshot(&snapshot).await
    }

    /// Extracts an already materialized snapshot.
    pub async fn ingest_snapshot(&mut self, snapshot: &RepositorySnapshot) -> Result<(), AppError> {
        if self.ingested.is_some() {
            return Err(AppError::AlreadyIngested);
        }
        let options = ExtractOptions {
            skip_vcs_metadata: self.config.skip_vcs_metadata,
        };
        let (code_index, code_corpus) = extractor::extract(snapshot, &options).await?;
        self.ingested = Some((code_index, code_corpus));
        Ok(())
    }

    /// Answers one question about the ingested repository.
    ///
    /// The backend handle is created on first use. When a call fails the
    /// session is left exactly as it was before the call.
    pub async fn ask(&mut self, question: &str) -> Result<String, AppError> {
        let (code_index, code_corpus) = self.ingested.as_ref().ok_or(AppError::NotIngested)?;
        let prompt = prompt::assemble(question, code_index, code_corpus);

        if let Some(limit) = self.config.max_prompt_bytes {
            if prompt.len() > limit {
                return Err(AppError::CorpusTooLarge {
                    size: prompt.len(),
                    limit,
                });
            }
        }

        let (mut backend, reused) = match self.active.take() {
            Some(backend) => (backend, true),
            None => (self.connect().await?, false),
        };

        log::info!(
            "Asking {} ({} prompt bytes)",
            backend.name(),
            prompt.len()
        );
        let result = backend.generate(&prompt).await;

        if reused || result.is_ok() {
            self.active = Some(backend);
        }
        result.map_err(AppError::GenerationFailed)
    }

    /// Selects another backend. Backend state is dropped; the ingested
    /// repository is kept.
    pub fn switch_backend(&mut self, backend: Backend) {
        if backend != self.backend {
            log::info!("Switching backend from {} to {}", self.backend, backend);
            self.backend = backend;
            self.active = None;
        }
    }

    async fn connect(&self) -> Result<ActiveBackend, AppError> {
        match self.backend {
            Backend::Claude => {
                let api_key = non_empty(self.config.anthropic_api_key.clone())
                    .or_else(|| non_empty(std::env::var(ANTHROPIC_API_KEY_ENV).ok()))
                    .ok_or(AppError::MissingApiKey)?;
                let mut api = AnthropicApi::new(
                    api_key,
                    self.config.anthropic_model.clone(),
                    self.config.max_tokens,
                );
                if let Some(base_url) = &self.config.anthropic_base_url {
                    api = api.with_base_url(base_url.as_str());
                }
                Ok(ActiveBackend::SingleShot(api))
            }
            Backend::Gemini => {
                let project = non_empty(self.config.vertex_project.clone())
                    .or_else(|| non_empty(std::env::var(VERTEX_PROJECT_ENV).ok()))
                    .ok_or(AppError::MissingProjectId)?;
                let access_token =
                    vertex::resolve_access_token(self.config.vertex_access_token.as_deref())
                        .await?;
                let mut session =
                    VertexSession::init(&project, &self.config.vertex_location, access_token);
                if let Some(base_url) = &self.config.vertex_base_url {
                    session = session.with_base_url(base_url.as_str());
                }
                let model = session.generative_model(
                    &self.config.vertex_model,
                    &[api_config::TUTOR_SYSTEM_PROMPT, api_config::TUTOR_MISSION],
                );
                Ok(ActiveBackend::Streaming(model.start_chat()))
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
