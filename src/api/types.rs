// src/api/types.rs
//! Type definitions for the listing API seam.

use crate::model::Block;
use crate::types::{PageId, PageSize};
use serde::Deserialize;

/// One listing request: which page, how many, and where to resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildrenRequest {
    pub page_id: PageId,
    pub page_size: PageSize,
    pub start_cursor: Option<String>,
}

/// One batch of results plus the continuation state the server reported.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A parsed page of child blocks.
pub type BlockBatch = PaginatedResponse<Block>;

/// Block children exactly as they arrive, before per-record conversion.
pub type RawBlockBatch = PaginatedResponse<serde_json::Value>;

/// Result of draining a cursor to its end.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    /// Number of listing requests issued.
    pub requests: u32,
}
