//! Parsing options and configuration.

use super::cleanup::{CleanupOptions, CleanupPreset};

/// Options for converting HTML into blocks.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// How block elements nested inside other block elements are handled
    pub nested_blocks: NestedBlocks,

    /// Whether `<ol>` items become numbered list items
    pub ordered_lists: bool,

    /// Text cleanup applied to every text node before trimming
    pub cleanup: Option<CleanupOptions>,

    /// Whether to use parallel processing for batches of documents
    pub parallel: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nested block policy.
    pub fn with_nested_blocks(mut self, policy: NestedBlocks) -> Self {
        self.nested_blocks = policy;
        self
    }

    /// Select nested `<p>`/`<ul>` again as separate blocks.
    pub fn repeat_nested(mut self) -> Self {
        self.nested_blocks = NestedBlocks::Repeat;
        self
    }

    /// Enable or disable numbered list items for `<ol>`.
    pub fn with_ordered_lists(mut self, enabled: bool) -> Self {
        self.ordered_lists = enabled;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, options: CleanupOptions) -> Self {
        self.cleanup = Some(options);
        self
    }

    /// Set cleanup options from a preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            nested_blocks: NestedBlocks::TopLevel,
            ordered_lists: false,
            cleanup: None,
            parallel: true,
        }
    }
}

/// Policy for block elements found inside an already selected block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestedBlocks {
    /// Only the outermost block is selected; nested content flows into its runs
    #[default]
    TopLevel,
    /// Nested `<p>`/`<ul>` are selected again and emitted as their own blocks
    Repeat,
}
