// src/reader.rs
//! Reads a page once and exposes both of its projections.

use crate::api::{fetch_all_blocks, BlockSource, NotionHttpClient};
use crate::config::ReaderConfig;
use crate::error::AppError;
use crate::extract::{self, ImagePolicy};
use crate::model::{Block, MalformedBlock};
use crate::types::{PageId, PageSize};
use serde::Serialize;
use std::sync::Arc;

/// Fetches a page's children and hands back a [`PageContent`].
///
/// Holds no per-read state, so one reader may serve concurrent reads.
#[derive(Clone)]
pub struct PageContentReader {
    source: Arc<dyn BlockSource>,
    page_size: PageSize,
    image_policy: ImagePolicy,
}

impl PageContentReader {
    /// Creates a reader over any listing source.
    pub fn new(source: Arc<dyn BlockSource>, page_size: PageSize, image_policy: ImagePolicy) -> Self {
        Self {
            source,
            page_size,
            image_policy,
        }
    }

    /// Creates a reader that talks to the Notion API over HTTP.
    pub fn connect(config: &ReaderConfig) -> Result<Self, AppError> {
        let client = NotionHttpClient::new(config)?;
        Ok(Self::new(
            Arc::new(client),
            config.page_size,
            config.image_policy,
        ))
    }

    /// Fetches every child block of `page_id` exactly once.
    pub async fn read(&self, page_id: &PageId) -> Result<PageContent, AppError> {
        let blocks = fetch_all_blocks(self.source.as_ref(), page_id, self.page_size).await?;
        Ok(PageContent {
            page_id: page_id.clone(),
            blocks,
            image_policy: self.image_policy,
        })
    }
}

/// The complete, ordered children of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub page_id: PageId,
    pub blocks: Vec<Block>,
    pub image_policy: ImagePolicy,
}

impl PageContent {
    /// Non-empty text fragments, one per text-bearing block.
    pub fn text_fragments(&self) -> Vec<String> {
        extract::extract_text(&self.blocks)
    }

    /// The fragments joined into a single context string.
    pub fn context_text(&self) -> String {
        extract::join_fragments(&self.text_fragments())
    }

    /// Image URLs admitted by the reader's policy.
    pub fn image_urls(&self) -> Vec<String> {
        extract::extract_image_urls(&self.blocks, self.image_policy)
    }

    pub fn malformed(&self) -> Vec<&MalformedBlock> {
        extract::malformed_blocks(&self.blocks).collect()
    }

    /// Both projections in a serializable form.
    pub fn projection(&self) -> PageProjection {
        PageProjection {
            page_id: self.page_id.clone(),
            text: self.text_fragments(),
            images: self.image_urls(),
        }
    }
}

/// What `read --format json` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageProjection {
    pub page_id: PageId,
    pub text: Vec<String>,
    pub images: Vec<String>,
}
