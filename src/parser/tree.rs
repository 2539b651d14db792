//! Block tree assembly.

use crate::model::Block;

/// Accumulates converted blocks in order and enforces that no empty block
/// leaves the pipeline.
#[derive(Debug, Default)]
pub struct BlockTreeBuilder {
    blocks: Vec<Block>,
    dropped: usize,
}

impl BlockTreeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block. Blocks without runs are dropped; returns whether the
    /// block was kept.
    pub fn push(&mut self, block: Block) -> bool {
        if block.is_empty() {
            log::debug!("dropping empty {} block", block.kind.wire_name());
            self.dropped += 1;
            return false;
        }
        self.blocks.push(block);
        true
    }

    /// Number of blocks kept so far.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if no block has been kept.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of empty blocks that were dropped.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Return the accumulated blocks.
    pub fn finish(self) -> Vec<Block> {
        self.blocks
    }
}

impl Extend<Block> for BlockTreeBuilder {
    fn extend<T: IntoIterator<Item = Block>>(&mut self, iter: T) {
        for block in iter {
            self.push(block);
        }
    }
}

impl FromIterator<Block> for BlockTreeBuilder {
    fn from_iter<T: IntoIterator<Item = Block>>(iter: T) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}
