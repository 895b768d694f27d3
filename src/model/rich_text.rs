use serde::{Deserialize, Serialize};

/// One styled fragment of a block's text.
///
/// Only the plain `content` matters downstream; annotations and links are
/// not carried.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RichTextSpan {
    pub content: String,
}

impl RichTextSpan {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Concatenates span contents in order, with no separator.
pub fn concat_spans(spans: &[RichTextSpan]) -> String {
    let capacity = spans.iter().map(|s| s.content.len()).sum();
    spans
        .iter()
        .fold(String::with_capacity(capacity), |mut acc, span| {
            acc.push_str(&span.content);
            acc
        })
}
