//! Block-level types.

use super::ContentRun;
use serde::{Deserialize, Serialize};

/// A structural unit of a page body: a paragraph or a list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// What kind of block this is
    pub kind: BlockKind,

    /// Text runs in document order
    pub runs: Vec<ContentRun>,
}

impl Block {
    /// Create a block of the given kind.
    pub fn new(kind: BlockKind, runs: Vec<ContentRun>) -> Self {
        Self { kind, runs }
    }

    /// Create a paragraph block.
    pub fn paragraph(runs: Vec<ContentRun>) -> Self {
        Self::new(BlockKind::Paragraph, runs)
    }

    /// Create a bulleted list item block.
    pub fn bulleted(runs: Vec<ContentRun>) -> Self {
        Self::new(BlockKind::BulletedListItem, runs)
    }

    /// Create a numbered list item block.
    pub fn numbered(runs: Vec<ContentRun>) -> Self {
        Self::new(BlockKind::NumberedListItem, runs)
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the block has no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Check if this is a list item of either kind.
    pub fn is_list_item(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::BulletedListItem | BlockKind::NumberedListItem
        )
    }

    /// Number of runs carrying a link.
    pub fn link_count(&self) -> usize {
        self.runs.iter().filter(|r| r.link.is_some()).count()
    }
}

/// Kind of block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// `<p>`
    Paragraph,
    /// `<li>` of a `<ul>`
    BulletedListItem,
    /// `<li>` of an `<ol>` (only when ordered lists are enabled)
    NumberedListItem,
}

impl BlockKind {
    /// Type name used by the content store's wire format.
    pub fn wire_name(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::NumberedListItem => "numbered_list_item",
        }
    }
}
