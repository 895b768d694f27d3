//! Chat-completion client for the OpenAI API.

use super::{ChatModel, ChatRequest};
use crate::config::AssistantConfig;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{preview_body, AppError};
use crate::types::ValidatedUrl;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;

#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    base_url: ValidatedUrl,
}

impl OpenAiChatClient {
    pub fn new(config: &AssistantConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.api_key.as_str())).map_err(
                |e| AppError::MissingConfiguration(format!("Invalid API key format: {}", e)),
            )?,
        );

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl ChatModel for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, AppError> {
        let url = self.base_url.join_endpoint("chat/completions");
        log::debug!("POST {} (model: {})", url, request.model);

        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        parse_completion(status, &body)
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extracts the first choice's content from a chat-completion response.
pub fn parse_completion(status: StatusCode, body: &str) -> Result<String, AppError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| preview_body(body, ERROR_BODY_PREVIEW_LENGTH));
        return Err(AppError::ChatService { status, message });
    }

    let response: CompletionResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| AppError::MalformedResponse("completion returned no choices".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_choice_wins() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "first" }, "finish_reason": "stop" },
                { "index": 1, "message": { "role": "assistant", "content": "second" }, "finish_reason": "stop" }
            ]
        }"#;
        assert_eq!(parse_completion(StatusCode::OK, body).unwrap(), "first");
    }

    #[test]
    fn empty_choices_are_malformed() {
        assert!(matches!(
            parse_completion(StatusCode::OK, r#"{"choices": []}"#),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn api_errors_carry_the_service_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        match parse_completion(StatusCode::UNAUTHORIZED, body) {
            Err(AppError::ChatService { status, message }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected ChatService error, got {:?}", other),
        }
    }
}
