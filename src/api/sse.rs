use eventsource_stream::Eventsource;
use serde::Deserialize;
use std::pin::Pin;
use tokio_stream::{Stream, StreamExt};

use super::errors::GatewayError;

/// Incremental answer text in arrival order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send>>;

/// Convert a Vertex AI `streamGenerateContent?alt=sse` response into a `FragmentStream`.
pub(crate) fn vertex_sse_to_stream(response: reqwest::Response) -> FragmentStream {
    let event_stream = response.bytes_stream().eventsource();
    let mapped = event_stream.filter_map(|event| match event {
        Ok(event) => parse_vertex_sse_event(&event.data),
        Err(e) => Some(Err(GatewayError::StreamError(e.to_string()))),
    });
    Box::pin(mapped)
}

fn parse_vertex_sse_event(data: &str) -> Option<Result<String, GatewayError>> {
    if data.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<VertexStreamChunk>(data) {
        Ok(chunk) => {
            if let Some(err) = chunk.error {
                return Some(Err(GatewayError::StreamError(format!(
                    "Vertex stream error ({}): {}",
                    err.status, err.message
                ))));
            }

            let text: String = chunk
                .candidates
                .first()
                .and_then(|c| c.content.as_ref())
                .map(|content| {
                    content
                        .parts
                        .iter()
                        .filter_map(|part| part.text.as_deref())
                        .collect()
                })
                .unwrap_or_default();

            if text.is_empty() {
                None
            } else {
                Some(Ok(text))
            }
        }
        Err(e) => Some(Err(GatewayError::StreamError(format!(
            "failed to parse SSE data: {e}"
        )))),
    }
}

#[derive(Deserialize)]
struct VertexStreamChunk {
    #[serde(default)]
    candidates: Vec<VertexCandidate>,
    #[serde(default)]
    error: Option<VertexStreamError>,
}

#[derive(Deserialize)]
struct VertexCandidate {
    #[serde(default)]
    content: Option<VertexContent>,
}

#[derive(Deserialize)]
struct VertexContent {
    #[serde(default)]
    parts: Vec<VertexPart>,
}

#[derive(Deserialize)]
struct VertexPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct VertexStreamError {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_text_chunk() {
        let data = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello"}]}}]}"#;
        assert_eq!(parse_vertex_sse_event(data).unwrap().unwrap(), "Hello");
    }

    #[test]
    fn parse_joins_multiple_parts() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}}]}"#;
        assert_eq!(parse_vertex_sse_event(data).unwrap().unwrap(), "ab");
    }

    #[test]
    fn parse_final_chunk_without_text_skipped() {
        let data = r#"{"candidates":[{"finishReason":"STOP"}],"usageMetadata":{"totalTokenCount":12}}"#;
        assert!(parse_vertex_sse_event(data).is_none());
    }

    #[test]
    fn parse_blank_data_skipped() {
        assert!(parse_vertex_sse_event("  ").is_none());
    }

    #[test]
    fn parse_error_chunk() {
        let data = r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED","message":"Quota exceeded"}}"#;
        let err = parse_vertex_sse_event(data).unwrap().unwrap_err();
        assert!(err.to_string().contains("RESOURCE_EXHAUSTED"));
    }

    #[test]
    fn parse_invalid_json() {
        let err = parse_vertex_sse_event("not json").unwrap().unwrap_err();
        assert!(err.to_string().contains("failed to parse SSE data"));
    }
}
