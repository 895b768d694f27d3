// src/lib.rs
//! notion-context library: reads a Notion page's children into text and image
//! context, and answers questions about it with a chat model.
//!
//! # Public API
//!
//! - **Error handling**: `AppError`, `NotionErrorCode`, `ValidationError`
//! - **Configuration**: `AppConfig`, `ReaderConfig`, `AssistantConfig`, `HeartbeatConfig`
//! - **Domain model**: `Block`, `BlockKind`, `RichTextSpan`, `ImageSource`
//! - **Domain types**: `PageId`, `ApiKey`, `PageSize`, `ValidatedUrl`
//! - **API client**: `BlockSource`, `NotionHttpClient`, `fetch_all_blocks`, parsers
//! - **Extraction**: `extract_text`, `extract_image_urls`, `ImagePolicy`
//! - **Assistant**: `Assistant`, `ChatModel`, `OpenAiChatClient`

mod analytics;
#[cfg(feature = "bench")]
pub mod api;
#[cfg(not(feature = "bench"))]
mod api;

mod assistant;
mod config;
mod constants;
mod error;

#[cfg(feature = "bench")]
pub mod extract;
#[cfg(not(feature = "bench"))]
mod extract;

mod health;
mod model;
mod output;
mod pipeline;
mod reader;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{
    AppConfig, AssistantConfig, Command, CommandLineInput, HeartbeatConfig, ModelArgs,
    OutputFormat, PageArgs, ReaderConfig, RunMode,
};

// --- Constants ---
pub use crate::constants::{
    NOTION_API_PAGE_SIZE, NOTION_API_VERSION, NO_IMAGE_ANALYSIS, NO_RELEVANT_INFORMATION,
    NO_TEXT_ANALYSIS,
};

// --- Domain Model ---
pub use crate::model::{
    concat_spans, Block, BlockKind, CodeBlock, ImageBlock, ImageSource, MalformedBlock,
    RichTextSpan, TextBlock,
};

// --- Domain Types ---
pub use crate::types::{ApiKey, PageId, PageSize, ValidatedUrl};

// --- API Client ---
pub use crate::api::{
    client::ApiResponse,
    fetch_all_blocks, fetch_all_pages,
    parser::{convert_block, parse_children_response},
    BlockBatch, BlockSource, ChildrenRequest, NotionHttpClient, PaginatedResponse,
    PaginationResult,
};

// --- Extraction ---
pub use crate::extract::{
    extract_image_urls, extract_text, join_fragments, malformed_blocks, text_fragments,
    ImagePolicy,
};
pub use crate::reader::{PageContent, PageContentReader, PageProjection};
pub use crate::analytics::{describe, is_content_empty, measure_content, ContentSummary};

// --- Assistant ---
pub use crate::assistant::{
    parse_completion, Answer, Assistant, ChatMessage, ChatModel, ChatRequest, ContentPart,
    ImageUrl, MessageContent, OpenAiChatClient, PromptTemplates, Role,
};

// --- Service Support ---
pub use crate::health::{spawn_heartbeat, HeartbeatHandle};
pub use crate::output::{
    deliver, render_projection, CompletedOperation, DeliveryTarget, ExecutionStats,
    FailedOperation, OutputPlan, OutputReport,
};

// --- Pipeline Traits ---
pub use crate::pipeline::{answer_query, AnswerComposer, ContentSource, LocalDelivery, ResultDelivery};
