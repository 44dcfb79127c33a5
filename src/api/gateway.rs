use super::{anthropic::AnthropicApi, errors::GatewayError, vertex::ChatSession};
use std::future::Future;
use tokio_stream::{Stream, StreamExt};

/// Something that turns an assembled prompt into answer text.
pub trait AnswerBackend: Send {
    /// Sends the prompt and waits for the complete answer.
    fn generate(&mut self, prompt: &str) -> impl Future<Output = Result<String, GatewayError>> + Send;

    fn name(&self) -> &'static str;
}

impl AnswerBackend for ChatSession {
    async fn generate(&mut self, prompt: &str) -> Result<String, GatewayError> {
        let stream = self.send_message_streaming(prompt).await?;
        let answer = collect_fragments(stream).await?;
        if answer.is_empty() {
            log::warn!("Vertex stream ended without any text");
            return Ok(answer);
        }
        self.record_exchange(prompt, &answer);
        log::debug!("Conversation now holds {} turns", self.history_len());
        Ok(answer)
    }

    fn name(&self) -> &'static str {
        "vertex"
    }
}

impl AnswerBackend for AnthropicApi {
    async fn generate(&mut self, prompt: &str) -> Result<String, GatewayError> {
        self.create_message(prompt).await
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

/// The backend a session is currently talking to, with its own state.
#[derive(Debug)]
pub enum ActiveBackend {
    Streaming(ChatSession),
    SingleShot(AnthropicApi),
}

impl AnswerBackend for ActiveBackend {
    async fn generate(&mut self, prompt: &str) -> Result<String, GatewayError> {
        match self {
            ActiveBackend::Streaming(chat) => chat.generate(prompt).await,
            ActiveBackend::SingleShot(api) => api.generate(prompt).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ActiveBackend::Streaming(chat) => chat.name(),
            ActiveBackend::SingleShot(api) => api.name(),
        }
    }
}

/// Concatenates every fragment in arrival order. The first error aborts and
/// discards what was received so far.
pub async fn collect_fragments<S>(mut stream: S) -> Result<String, GatewayError>
where
    S: Stream<Item = Result<String, GatewayError>> + Unpin,
{
    let mut answer = String::new();
    while let Some(fragment) = stream.next().await {
        answer.push_str(&fragment?);
    }
    Ok(answer)
}
