//! Domain model for the children of a page.
//!
//! Blocks are request-scoped: they are built from one listing response,
//! read by the extractors, and dropped with the [`crate::PageContent`]
//! that owns them.

mod block;
mod rich_text;

pub use block::{Block, BlockKind, CodeBlock, ImageBlock, ImageSource, MalformedBlock, TextBlock};
pub use rich_text::{concat_spans, RichTextSpan};
