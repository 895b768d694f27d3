use crate::model::{Block, ImageSource};
use serde::{Deserialize, Serialize};

/// Which image blocks count as "downloadable".
///
/// `NotionHostedOnly` reports only files uploaded to Notion, skipping images
/// that the page merely links to. That is the long-standing behaviour, so it
/// is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePolicy {
    #[default]
    NotionHostedOnly,
    IncludeExternal,
}

impl ImagePolicy {
    pub fn admits(self, source: &ImageSource) -> bool {
        match self {
            ImagePolicy::NotionHostedOnly => source.is_notion_hosted(),
            ImagePolicy::IncludeExternal => true,
        }
    }
}

/// Image URLs in block order; no deduplication. Empty means no images qualify.
pub fn extract_image_urls(blocks: &[Block], policy: ImagePolicy) -> Vec<String> {
    blocks
        .iter()
        .filter_map(Block::image)
        .filter(|source| policy.admits(source))
        .map(|source| source.url().to_string())
        .collect()
}
