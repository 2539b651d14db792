//! Conversion statistics.

use crate::model::{Block, BlockKind};
use serde::{Deserialize, Serialize};

/// Statistics collected over a converted block list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of paragraph blocks
    pub paragraph_count: u32,

    /// Number of list item blocks (bulleted and numbered)
    pub list_item_count: u32,

    /// Number of runs across all blocks
    pub run_count: u32,

    /// Number of runs carrying a link
    pub link_count: u32,

    /// Number of runs with at least one style flag
    pub styled_run_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics over a block list.
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut stats = Self::new();
        for block in blocks {
            stats.add_block(block);
        }
        stats
    }

    /// Count one block.
    pub fn add_block(&mut self, block: &Block) {
        match block.kind {
            BlockKind::Paragraph => self.paragraph_count += 1,
            BlockKind::BulletedListItem | BlockKind::NumberedListItem => {
                self.list_item_count += 1
            }
        }
        for run in &block.runs {
            self.run_count += 1;
            if run.link.is_some() {
                self.link_count += 1;
            }
            if run.style.has_styling() {
                self.styled_run_count += 1;
            }
            self.count_text(&run.text);
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Total number of blocks.
    pub fn block_count(&self) -> u32 {
        self.paragraph_count + self.list_item_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.paragraph_count += other.paragraph_count;
        self.list_item_count += other.list_item_count;
        self.run_count += other.run_count;
        self.link_count += other.link_count;
        self.styled_run_count += other.styled_run_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
