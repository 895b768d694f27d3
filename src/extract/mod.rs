//! Projections of a fetched block sequence.
//!
//! Both projections read the same `&[Block]`, so one fetch serves both.
//! Neither ever reorders blocks, and malformed records are skipped by each.

mod images;
mod text;

pub use images::{extract_image_urls, ImagePolicy};
pub use text::{extract_text, join_fragments, text_fragments};

use crate::model::{Block, MalformedBlock};

/// Records that extraction skipped because their payload was unreadable.
pub fn malformed_blocks(blocks: &[Block]) -> impl Iterator<Item = &MalformedBlock> {
    blocks.iter().filter_map(Block::as_malformed)
}
