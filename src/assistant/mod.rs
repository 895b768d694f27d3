//! Question answering over a page's content.
//!
//! The page text and its first image are analysed separately, then a third
//! call merges both analyses into one short reply.

mod openai;
mod prompts;

pub use openai::{parse_completion, OpenAiChatClient};
pub use prompts::PromptTemplates;

use crate::config::AssistantConfig;
use crate::constants::{NO_IMAGE_ANALYSIS, NO_RELEVANT_INFORMATION, NO_TEXT_ANALYSIS};
use crate::error::AppError;
use crate::reader::PageContent;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user question about one image.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

/// Body of a chat-completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// The ability to complete a chat.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the first choice's message content.
    async fn complete(&self, request: ChatRequest) -> Result<String, AppError>;
}

/// The assistant's reply together with the analyses it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub text_analysis: String,
    pub image_analysis: String,
    pub reply: String,
}

/// Answers questions about pages with a chat model.
pub struct Assistant {
    model: Arc<dyn ChatModel>,
    config: AssistantConfig,
    prompts: PromptTemplates,
}

impl Assistant {
    pub fn new(model: Arc<dyn ChatModel>, config: AssistantConfig) -> Result<Self, AppError> {
        Ok(Self {
            model,
            config,
            prompts: PromptTemplates::new()?,
        })
    }

    /// Creates an assistant backed by the OpenAI API.
    pub fn connect(config: &AssistantConfig) -> Result<Self, AppError> {
        let client = OpenAiChatClient::new(config)?;
        Self::new(Arc::new(client), config.clone())
    }

    /// Answers `query` from the page's text and first reported image.
    pub async fn answer(&self, query: &str, content: &PageContent) -> Result<Answer, AppError> {
        let context = content.context_text();
        let images = content.image_urls();

        if context.is_empty() && images.is_empty() {
            log::info!("Page {} has no usable content", content.page_id);
            return Ok(Answer {
                text_analysis: NO_TEXT_ANALYSIS.to_string(),
                image_analysis: NO_IMAGE_ANALYSIS.to_string(),
                reply: NO_RELEVANT_INFORMATION.to_string(),
            });
        }

        let text_analysis = if context.is_empty() {
            NO_TEXT_ANALYSIS.to_string()
        } else {
            self.analyze_text(&context, query).await?
        };

        let image_analysis = match images.first() {
            Some(url) => self.analyze_image(url, query).await?,
            None => NO_IMAGE_ANALYSIS.to_string(),
        };

        let reply = self
            .synthesize(&text_analysis, &image_analysis, query)
            .await?;

        Ok(Answer {
            text_analysis,
            image_analysis,
            reply,
        })
    }

    async fn analyze_text(&self, context: &str, query: &str) -> Result<String, AppError> {
        log::debug!("Text analysis with {} ({} chars)", self.config.text_model, context.len());
        self.model
            .complete(ChatRequest {
                model: self.config.text_model.clone(),
                messages: vec![ChatMessage::system(context), ChatMessage::user(query)],
                max_tokens: self.config.analysis_max_tokens,
            })
            .await
    }

    async fn analyze_image(&self, image_url: &str, query: &str) -> Result<String, AppError> {
        log::debug!("Image analysis with {}", self.config.vision_model);
        self.model
            .complete(ChatRequest {
                model: self.config.vision_model.clone(),
                messages: vec![ChatMessage::user_with_image(query, image_url)],
                max_tokens: self.config.analysis_max_tokens,
            })
            .await
    }

    async fn synthesize(&self, text: &str, image: &str, query: &str) -> Result<String, AppError> {
        log::debug!("Synthesis with {}", self.config.synthesis_model);
        self.model
            .complete(ChatRequest {
                model: self.config.synthesis_model.clone(),
                messages: vec![
                    ChatMessage::system(self.prompts.synthesis_context(text, image)?),
                    ChatMessage::user(self.prompts.synthesis_request(query)?),
                ],
                max_tokens: self.config.synthesis_max_tokens,
            })
            .await
    }
}
