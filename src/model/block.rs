use super::rich_text::RichTextSpan;
use serde::Serialize;
use std::fmt;

/// The fixed vocabulary of block kinds this crate distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    NumberedListItem,
    BulletedListItem,
    Code,
    Image,
    /// Any tag outside the vocabulary above, kept verbatim.
    Other(String),
}

impl BlockKind {
    /// Maps the listing API's `type` tag onto a kind.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "paragraph" => Self::Paragraph,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "numbered_list_item" => Self::NumberedListItem,
            "bulleted_list_item" => Self::BulletedListItem,
            "code" => Self::Code,
            "image" => Self::Image,
            other => Self::Other(other.to_string()),
        }
    }

    /// The `type` tag, which is also the key of the kind-specific payload.
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::NumberedListItem => "numbered_list_item",
            Self::BulletedListItem => "bulleted_list_item",
            Self::Code => "code",
            Self::Image => "image",
            Self::Other(tag) => tag,
        }
    }

    /// Kinds whose payload is a plain rich-text list.
    pub fn is_prose(&self) -> bool {
        matches!(
            self,
            Self::Paragraph
                | Self::Heading1
                | Self::Heading2
                | Self::Heading3
                | Self::NumberedListItem
                | Self::BulletedListItem
        )
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        kind.as_tag().to_string()
    }
}

/// Payload shared by paragraph, heading and list-item blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TextBlock {
    pub rich_text: Vec<RichTextSpan>,
}

/// Code block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CodeBlock {
    pub rich_text: Vec<RichTextSpan>,
    pub language: Option<String>,
}

/// Where an image's bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// Uploaded to Notion; the URL is signed and expires.
    File {
        url: String,
        expiry_time: Option<String>,
    },
    /// Hosted elsewhere and only referenced by the page.
    External { url: String },
}

impl ImageSource {
    pub fn url(&self) -> &str {
        match self {
            Self::File { url, .. } | Self::External { url } => url,
        }
    }

    pub fn is_notion_hosted(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

/// Image block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageBlock {
    pub source: ImageSource,
}

/// A record whose kind-specific payload was missing or unreadable.
///
/// Extraction skips these; they are kept so callers can report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedBlock {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub reason: String,
}

impl fmt::Display for MalformedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} block {}: {}",
            self.kind.as_deref().unwrap_or("untyped"),
            self.id.as_deref().unwrap_or("<no id>"),
            self.reason
        )
    }
}

/// One child of a page, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph(TextBlock),
    #[serde(rename = "heading_1")]
    Heading1(TextBlock),
    #[serde(rename = "heading_2")]
    Heading2(TextBlock),
    #[serde(rename = "heading_3")]
    Heading3(TextBlock),
    NumberedListItem(TextBlock),
    BulletedListItem(TextBlock),
    Code(CodeBlock),
    Image(ImageBlock),
    Other { tag: String },
    Malformed(MalformedBlock),
}

impl Block {
    /// The block's kind. Malformed records report the kind they claimed, or
    /// `Other("")` when they carried no `type` at all.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Paragraph(_) => BlockKind::Paragraph,
            Block::Heading1(_) => BlockKind::Heading1,
            Block::Heading2(_) => BlockKind::Heading2,
            Block::Heading3(_) => BlockKind::Heading3,
            Block::NumberedListItem(_) => BlockKind::NumberedListItem,
            Block::BulletedListItem(_) => BlockKind::BulletedListItem,
            Block::Code(_) => BlockKind::Code,
            Block::Image(_) => BlockKind::Image,
            Block::Other { tag } => BlockKind::Other(tag.clone()),
            Block::Malformed(m) => BlockKind::from_tag(m.kind.as_deref().unwrap_or_default()),
        }
    }

    /// Rich-text spans of text-bearing blocks.
    pub fn rich_text(&self) -> Option<&[RichTextSpan]> {
        match self {
            Block::Paragraph(t)
            | Block::Heading1(t)
            | Block::Heading2(t)
            | Block::Heading3(t)
            | Block::NumberedListItem(t)
            | Block::BulletedListItem(t) => Some(&t.rich_text),
            Block::Code(code) => Some(&code.rich_text),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageSource> {
        match self {
            Block::Image(image) => Some(&image.source),
            _ => None,
        }
    }

    pub fn as_malformed(&self) -> Option<&MalformedBlock> {
        match self {
            Block::Malformed(m) => Some(m),
            _ => None,
        }
    }

    /// Builds a prose block of the given kind; `None` for non-prose kinds.
    pub fn prose(kind: &BlockKind, rich_text: Vec<RichTextSpan>) -> Option<Self> {
        let text = TextBlock { rich_text };
        Some(match kind {
            BlockKind::Paragraph => Block::Paragraph(text),
            BlockKind::Heading1 => Block::Heading1(text),
            BlockKind::Heading2 => Block::Heading2(text),
            BlockKind::Heading3 => Block::Heading3(text),
            BlockKind::NumberedListItem => Block::NumberedListItem(text),
            BlockKind::BulletedListItem => Block::BulletedListItem(text),
            _ => return None,
        })
    }
}
