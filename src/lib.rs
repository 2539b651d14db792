//! # richblocks
//!
//! Converts rich-text editor HTML into the typed content blocks of a hosted
//! content database, and ships the small services built around that
//! conversion: review submission, podcast feed import and published-post
//! listing.
//!
//! ## Quick Start
//!
//! ```
//! use richblocks::{parse_html, render};
//!
//! let blocks = parse_html(r#"<p>See <a href="https://example.com">this</a></p>"#);
//! assert_eq!(blocks.len(), 1);
//!
//! let json = render::to_json(&blocks, render::JsonFormat::Compact).unwrap();
//! assert!(json.contains(r#""href":"https://example.com""#));
//! ```
//!
//! ## Features
//!
//! - **Block pipeline**: paragraphs and list items with per-run styles and links
//! - **Multiple output formats**: content-store wire JSON, plain text, HTML
//! - **Content store client**: page creation and paginated database queries
//! - **Services**: review submission, author search, podcast import, posts
//! - **Parallel processing**: Uses Rayon for document batches and imports

pub mod convert;
pub mod error;
pub mod model;
pub mod parser;
pub mod podcast;
pub mod posts;
pub mod render;
pub mod store;
pub mod submit;

// Re-export commonly used types
pub use convert::{convert, convert_many, ConvertOptions, ConvertResult, OutputFormat};
pub use error::{Error, Result};
pub use model::{Block, BlockKind, Color, ContentRun, Link, StyleSet};
pub use parser::{CleanupOptions, CleanupPreset, HtmlParser, NestedBlocks, ParseOptions};
pub use render::{ExtractionStats, JsonFormat, RenderOptions, WireBlock};
pub use store::{ContentStore, NotionClient};

/// Convert HTML into blocks with default options.
///
/// # Example
///
/// ```
/// use richblocks::{parse_html, BlockKind};
///
/// let blocks = parse_html("<ul><li>one</li><li>two</li></ul>");
/// assert!(blocks.iter().all(|b| b.kind == BlockKind::BulletedListItem));
/// ```
pub fn parse_html(html: &str) -> Vec<Block> {
    HtmlParser::new().parse(html)
}

/// Convert HTML into blocks with custom options.
///
/// # Example
///
/// ```
/// use richblocks::{parse_html_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_ordered_lists(true);
/// let blocks = parse_html_with_options("<ol><li>first</li></ol>", options);
/// assert_eq!(blocks.len(), 1);
/// ```
pub fn parse_html_with_options(html: &str, options: ParseOptions) -> Vec<Block> {
    HtmlParser::with_options(options).parse(html)
}

/// Convert HTML to wire JSON.
pub fn to_json(html: &str, format: JsonFormat) -> Result<String> {
    render::to_json(&parse_html(html), format)
}

/// Convert HTML to plain text.
pub fn to_text(html: &str, options: &RenderOptions) -> String {
    render::to_text(&parse_html(html), options)
}

/// Normalize HTML by converting it to blocks and rendering them back.
pub fn to_html(html: &str) -> String {
    render::to_html(&parse_html(html))
}

/// Builder for converting editor HTML.
///
/// # Example
///
/// ```
/// use richblocks::Richblocks;
///
/// let text = Richblocks::new()
///     .with_ordered_lists()
///     .with_list_marker('-')
///     .parse("<ul><li>a</li></ul><ol><li>b</li></ol>")
///     .to_text();
/// assert_eq!(text, "- a\n\n1. b");
/// ```
pub struct Richblocks {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Richblocks {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Select nested block elements again as separate blocks.
    pub fn repeat_nested(mut self) -> Self {
        self.parse_options = self.parse_options.repeat_nested();
        self
    }

    /// Emit numbered list items for `<ol>`.
    pub fn with_ordered_lists(mut self) -> Self {
        self.parse_options = self.parse_options.with_ordered_lists(true);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.parse_options = self.parse_options.with_cleanup_preset(preset);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Set the bulleted list marker for text output.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.render_options = self.render_options.with_list_marker(marker);
        self
    }

    /// Append link targets in text output.
    pub fn with_link_urls(mut self) -> Self {
        self.render_options = self.render_options.with_link_urls(true);
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.render_options = self.render_options.with_json_format(format);
        self
    }

    /// Convert HTML and return a result wrapper.
    pub fn parse(self, html: &str) -> RichblocksResult {
        let blocks = HtmlParser::with_options(self.parse_options).parse(html);
        RichblocksResult {
            blocks,
            render_options: self.render_options,
        }
    }
}

impl Default for Richblocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of converting HTML.
pub struct RichblocksResult {
    /// The converted blocks
    pub blocks: Vec<Block>,
    /// Render options to use
    render_options: RenderOptions,
}

impl RichblocksResult {
    /// Convert to wire JSON.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.blocks, self.render_options.json_format)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.blocks, &self.render_options)
    }

    /// Convert to HTML.
    pub fn to_html(&self) -> String {
        render::to_html(&self.blocks)
    }

    /// Wire blocks ready for a page request.
    pub fn to_wire(&self) -> Vec<WireBlock> {
        render::to_wire(&self.blocks)
    }

    /// Statistics over the converted blocks.
    pub fn stats(&self) -> ExtractionStats {
        ExtractionStats::from_blocks(&self.blocks)
    }

    /// Get the blocks.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let builder = Richblocks::default();
        assert_eq!(builder.parse_options.nested_blocks, NestedBlocks::TopLevel);
        assert!(!builder.parse_options.ordered_lists);
        assert_eq!(builder.render_options.list_marker, '•');
    }

    #[test]
    fn test_builder_chained() {
        let builder = Richblocks::new()
            .repeat_nested()
            .with_ordered_lists()
            .with_cleanup(CleanupPreset::Standard)
            .with_link_urls()
            .sequential();

        assert_eq!(builder.parse_options.nested_blocks, NestedBlocks::Repeat);
        assert!(builder.parse_options.ordered_lists);
        assert!(builder.parse_options.cleanup.is_some());
        assert!(builder.render_options.include_link_urls);
        assert!(!builder.parse_options.parallel);
    }

    #[test]
    fn test_result_outputs() {
        let result = Richblocks::new()
            .with_json_format(JsonFormat::Compact)
            .parse(r#"<p><b>Bold</b> and <a href="https://x">link</a></p>"#);

        assert_eq!(result.blocks().len(), 1);
        assert!(!result.to_json().unwrap().contains('\n'));
        assert_eq!(result.to_text(), "Bold and link");
        assert!(result.to_html().contains(r#"<a href="https://x">"#));
        assert_eq!(result.to_wire()[0].type_name(), "paragraph");
        assert_eq!(result.stats().link_count, 1);
    }

    #[test]
    fn test_convenience_functions() {
        assert!(parse_html("").is_empty());
        assert_eq!(to_text("<p>a</p><p>b</p>", &RenderOptions::default()), "a\n\nb");
        assert_eq!(to_json("<div>x</div>", JsonFormat::Compact).unwrap(), "[]");
        assert!(to_html("<ul><li>x</li></ul>").starts_with("<ul>"));
    }
}
