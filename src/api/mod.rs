// src/api/mod.rs
//! Notion API interaction: listing a page's children to completion.
//!
//! Business logic depends on [`BlockSource`], never on HTTP details.

pub mod client;
mod pagination;
pub mod parser;
mod types;

use crate::error::AppError;
use crate::model::Block;
use crate::types::{PageId, PageSize};

pub use client::{ApiResponse, NotionHttpClient};
pub use pagination::fetch_all_pages;
pub use types::{BlockBatch, ChildrenRequest, PaginatedResponse, PaginationResult};

/// The ability to list one page of a block's children.
#[async_trait::async_trait]
pub trait BlockSource: Send + Sync {
    async fn list_children(&self, request: ChildrenRequest) -> Result<BlockBatch, AppError>;
}

/// Fetches every direct child of `page_id`, in server order.
///
/// Issues listing requests one after another, each resuming from the
/// previous response's cursor, until the server reports no more results.
/// Any failed request aborts the fetch; no partial list is returned.
pub async fn fetch_all_blocks(
    source: &dyn BlockSource,
    page_id: &PageId,
    page_size: PageSize,
) -> Result<Vec<Block>, AppError> {
    let result = fetch_all_pages(page_size, |page_size, start_cursor| {
        source.list_children(ChildrenRequest {
            page_id: page_id.clone(),
            page_size,
            start_cursor,
        })
    })
    .await?;

    log::debug!(
        "Fetched {} blocks for {} in {} request(s)",
        result.items.len(),
        page_id,
        result.requests
    );

    Ok(result.items)
}
