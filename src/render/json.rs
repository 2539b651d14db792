//! Content-store wire format for blocks.
//!
//! The store expects every block as
//! `{"object": "block", "type": <kind>, <kind>: {...}}` where the payload
//! key repeats the type name. Text payloads carry a `rich_text` array of
//! run objects with their annotations, link and `href`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Block, BlockKind, ContentRun, Link, StyleSet};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// One block as sent to the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireBlock {
    /// Always `"block"`
    #[serde(default = "block_object")]
    pub object: String,

    /// Typed payload
    #[serde(flatten)]
    pub body: BlockBody,
}

fn block_object() -> String {
    "block".to_string()
}

fn text_type() -> String {
    "text".to_string()
}

fn external_type() -> String {
    "external".to_string()
}

/// Typed payload of a wire block, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockBody {
    /// Paragraph
    Paragraph {
        /// Rich text payload
        paragraph: RichTextBody,
    },
    /// Bulleted list item
    BulletedListItem {
        /// Rich text payload
        bulleted_list_item: RichTextBody,
    },
    /// Numbered list item
    NumberedListItem {
        /// Rich text payload
        numbered_list_item: RichTextBody,
    },
    /// Externally hosted image
    Image {
        /// Image file
        image: FileObject,
    },
    /// Embedded URL (audio player, video, ...)
    Embed {
        /// Embed target
        embed: EmbedBody,
    },
}

/// Rich text payload of a text block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichTextBody {
    /// Runs in order
    pub rich_text: Vec<RichText>,
}

/// One run in the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    /// Always `"text"`
    #[serde(rename = "type", default = "text_type")]
    pub kind: String,

    /// Content and link
    pub text: TextContent,

    /// Style flags
    #[serde(default)]
    pub annotations: StyleSet,

    /// Same as `text.content`
    #[serde(default)]
    pub plain_text: String,

    /// Link URL, `null` for unlinked runs
    #[serde(default)]
    pub href: Option<String>,
}

/// Text content of a wire run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// The text
    pub content: String,

    /// Link target, `null` for unlinked runs
    #[serde(default)]
    pub link: Option<Link>,
}

/// An externally hosted file (images, page covers, page icons).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    /// Always `"external"`
    #[serde(rename = "type", default = "external_type")]
    pub kind: String,

    /// Location of the file
    pub external: ExternalUrl,

    /// Optional caption runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<RichText>,
}

impl FileObject {
    /// Create an external file reference.
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            kind: external_type(),
            external: ExternalUrl { url: url.into() },
            caption: Vec::new(),
        }
    }

    /// Attach a plain-text caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = vec![RichText::from(&ContentRun::new(caption))];
        self
    }

    /// URL of the file.
    pub fn url(&self) -> &str {
        &self.external.url
    }
}

/// URL wrapper used by external files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrl {
    /// The URL
    pub url: String,
}

/// Payload of an embed block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedBody {
    /// Embedded URL
    pub url: String,
}

impl WireBlock {
    /// Wrap a payload.
    pub fn new(body: BlockBody) -> Self {
        Self {
            object: block_object(),
            body,
        }
    }

    /// External image block with a caption.
    pub fn image(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Self::new(BlockBody::Image {
            image: FileObject::external(url).with_caption(caption),
        })
    }

    /// Embed block.
    pub fn embed(url: impl Into<String>) -> Self {
        Self::new(BlockBody::Embed {
            embed: EmbedBody { url: url.into() },
        })
    }

    /// The `type` name of this block.
    pub fn type_name(&self) -> &'static str {
        match &self.body {
            BlockBody::Paragraph { .. } => "paragraph",
            BlockBody::BulletedListItem { .. } => "bulleted_list_item",
            BlockBody::NumberedListItem { .. } => "numbered_list_item",
            BlockBody::Image { .. } => "image",
            BlockBody::Embed { .. } => "embed",
        }
    }

    /// Convert back into a model block. Non-text blocks yield `None`.
    pub fn to_block(&self) -> Option<Block> {
        let (kind, body) = match &self.body {
            BlockBody::Paragraph { paragraph } => (BlockKind::Paragraph, paragraph),
            BlockBody::BulletedListItem { bulleted_list_item } => {
                (BlockKind::BulletedListItem, bulleted_list_item)
            }
            BlockBody::NumberedListItem { numbered_list_item } => {
                (BlockKind::NumberedListItem, numbered_list_item)
            }
            BlockBody::Image { .. } | BlockBody::Embed { .. } => return None,
        };
        let runs = body.rich_text.iter().map(RichText::to_run).collect();
        Some(Block::new(kind, runs))
    }
}

impl From<&Block> for WireBlock {
    fn from(block: &Block) -> Self {
        let body = RichTextBody {
            rich_text: block.runs.iter().map(RichText::from).collect(),
        };
        let body = match block.kind {
            BlockKind::Paragraph => BlockBody::Paragraph { paragraph: body },
            BlockKind::BulletedListItem => BlockBody::BulletedListItem {
                bulleted_list_item: body,
            },
            BlockKind::NumberedListItem => BlockBody::NumberedListItem {
                numbered_list_item: body,
            },
        };
        WireBlock::new(body)
    }
}

impl From<&ContentRun> for RichText {
    fn from(run: &ContentRun) -> Self {
        Self {
            kind: text_type(),
            text: TextContent {
                content: run.text.clone(),
                link: run.link.clone(),
            },
            annotations: run.style,
            plain_text: run.text.clone(),
            href: run.href().map(str::to_string),
        }
    }
}

impl RichText {
    /// Convert back into a model run.
    pub fn to_run(&self) -> ContentRun {
        ContentRun {
            text: self.text.content.clone(),
            link: self.text.link.clone(),
            style: self.annotations,
        }
    }
}

/// Convert blocks into their wire representation.
pub fn to_wire(blocks: &[Block]) -> Vec<WireBlock> {
    blocks.iter().map(WireBlock::from).collect()
}

/// Convert blocks to a JSON array in the content store's wire format.
pub fn to_json(blocks: &[Block], format: JsonFormat) -> Result<String> {
    let wire = to_wire(blocks);
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&wire),
        JsonFormat::Compact => serde_json::to_string(&wire),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
