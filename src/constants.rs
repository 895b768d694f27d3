// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many blocks the listing endpoint returns per request, at most.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// API version pinned in every request's `Notion-Version` header.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Default base URL of the Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

// ---------------------------------------------------------------------------
// Chat model boundaries
// ---------------------------------------------------------------------------

/// Default base URL of the OpenAI REST API.
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Model that answers questions against the page's text.
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4-turbo-preview";

/// Model that answers questions against the page's first image.
pub const DEFAULT_VISION_MODEL: &str = "gpt-4-vision-preview";

/// Model that merges the text and image analyses into one reply.
pub const DEFAULT_SYNTHESIS_MODEL: &str = "gpt-3.5-turbo-0125";

/// Completion cap for the text and image analyses.
pub const ANALYSIS_MAX_TOKENS: u32 = 4000;

/// Completion cap for the synthesised reply, which should stay short.
pub const SYNTHESIS_MAX_TOKENS: u32 = 150;

// ---------------------------------------------------------------------------
// Fallback replies
// ---------------------------------------------------------------------------

pub const NO_TEXT_ANALYSIS: &str = "No text content found.";
pub const NO_IMAGE_ANALYSIS: &str = "No image content found.";
pub const NO_RELEVANT_INFORMATION: &str = "I couldn't find any relevant information.";

// ---------------------------------------------------------------------------
// Liveness
// ---------------------------------------------------------------------------

/// Where the heartbeat task writes by default.
pub const DEFAULT_HEALTH_FILE: &str = "/tmp/healthz";

/// How often the heartbeat task rewrites the health file.
pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters kept when carrying error response bodies around.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
