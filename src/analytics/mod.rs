//! Content measurement for a fetched page.

use crate::model::Block;
use crate::reader::PageContent;
use std::collections::BTreeMap;

/// Quick statistics for progress messages and logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSummary {
    pub total_blocks: usize,
    pub text_fragments: usize,
    pub context_chars: usize,
    pub images_reported: usize,
    /// Images present on the page but filtered out by the image policy.
    pub images_withheld: usize,
    pub malformed_blocks: usize,
    /// Block count per `type` tag, for kinds outside the extracted vocabulary.
    pub unsupported_kinds: BTreeMap<String, usize>,
}

/// Measures a fetched page.
pub fn measure_content(content: &PageContent) -> ContentSummary {
    let fragments = content.text_fragments();
    let images_reported = content.image_urls().len();
    let images_total = count_images(&content.blocks);

    ContentSummary {
        total_blocks: content.blocks.len(),
        text_fragments: fragments.len(),
        context_chars: fragments.iter().map(|f| f.chars().count()).sum::<usize>()
            + fragments.len().saturating_sub(1),
        images_reported,
        images_withheld: images_total - images_reported,
        malformed_blocks: content.malformed().len(),
        unsupported_kinds: unsupported_kinds(&content.blocks),
    }
}

fn count_images(blocks: &[Block]) -> usize {
    blocks.iter().filter(|b| b.image().is_some()).count()
}

fn unsupported_kinds(blocks: &[Block]) -> BTreeMap<String, usize> {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Other { tag } => Some(tag.clone()),
            _ => None,
        })
        .fold(BTreeMap::new(), |mut counts, tag| {
            *counts.entry(tag).or_insert(0) += 1;
            counts
        })
}

/// One-line description of a summary, for user-facing output.
pub fn describe(summary: &ContentSummary) -> String {
    let mut line = format!(
        "{} blocks, {} text fragments ({} chars), {} images",
        summary.total_blocks, summary.text_fragments, summary.context_chars, summary.images_reported
    );
    if summary.images_withheld > 0 {
        line.push_str(&format!(", {} external images skipped", summary.images_withheld));
    }
    if summary.malformed_blocks > 0 {
        line.push_str(&format!(", {} malformed blocks skipped", summary.malformed_blocks));
    }
    line
}

/// Whether the page had anything the assistant could use.
pub fn is_content_empty(summary: &ContentSummary) -> bool {
    summary.text_fragments == 0 && summary.images_reported == 0
}
