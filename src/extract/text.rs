use crate::model::{concat_spans, Block, BlockKind};

/// Lazily yields one non-empty string per text-bearing block, in block order.
///
/// Paragraphs, headings, list items and code blocks qualify; their span
/// contents are concatenated without a separator. Everything else,
/// images included, yields nothing.
pub fn text_fragments(blocks: &[Block]) -> impl Iterator<Item = String> + '_ {
    blocks.iter().filter_map(fragment_of)
}

/// Eager form of [`text_fragments`].
pub fn extract_text(blocks: &[Block]) -> Vec<String> {
    text_fragments(blocks).collect()
}

/// Flattens fragments into one newline-separated context string.
///
/// Block boundaries are not recoverable from the result.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    let capacity = fragments.iter().map(|f| f.as_ref().len() + 1).sum();
    let mut joined = String::with_capacity(capacity);
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        joined.push_str(fragment.as_ref());
    }
    joined
}

fn fragment_of(block: &Block) -> Option<String> {
    let kind = block.kind();
    if !(kind.is_prose() || kind == BlockKind::Code) {
        return None;
    }
    let text = concat_spans(block.rich_text()?);
    (!text.is_empty()).then_some(text)
}
