//! HTML to block conversion pipeline.
//!
//! The pipeline is pure: each call parses its own DOM, walks it once and
//! returns freshly built blocks. It never fails; unrecognized or malformed
//! structure simply contributes nothing.
//!
//! ```
//! use richblocks::parser::HtmlParser;
//!
//! let blocks = HtmlParser::new().parse("<p>Hello <b>world</b></p>");
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].plain_text(), "Hello world ");
//! ```

pub mod annotate;
mod cleanup;
pub mod dom;
pub mod inline;
mod options;
pub mod segment;
mod tree;

pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use options::{NestedBlocks, ParseOptions};
pub use tree::BlockTreeBuilder;

use rayon::prelude::*;

use crate::model::Block;

/// Per-conversion state shared by the recursive walkers.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Active options
    pub options: &'a ParseOptions,
    /// Cleanup applied to text nodes, if enabled
    pub cleanup: Option<&'a CleanupPipeline>,
}

/// Converter from HTML strings to ordered block lists.
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParseOptions,
    cleanup: Option<CleanupPipeline>,
}

impl HtmlParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        let cleanup = options.cleanup.clone().map(CleanupPipeline::new);
        Self { options, cleanup }
    }

    /// Get the parser options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Borrow the walking context for this parser.
    pub fn context(&self) -> Context<'_> {
        Context {
            options: &self.options,
            cleanup: self.cleanup.as_ref(),
        }
    }

    /// Convert one HTML string into blocks.
    pub fn parse(&self, html: &str) -> Vec<Block> {
        let dom = dom::parse(html);
        let builder: BlockTreeBuilder = segment::segment(&dom.document, &self.context())
            .into_iter()
            .collect();

        log::debug!(
            "converted {} bytes of HTML into {} blocks ({} empty dropped)",
            html.len(),
            builder.len(),
            builder.dropped()
        );
        builder.finish()
    }

    /// Convert several HTML strings, in parallel unless disabled.
    ///
    /// Results are returned in input order.
    pub fn parse_many<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Vec<Vec<Block>> {
        if self.options.parallel {
            documents
                .par_iter()
                .map(|html| self.parse(html.as_ref()))
                .collect()
        } else {
            documents.iter().map(|html| self.parse(html.as_ref())).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockKind, ContentRun};

    #[test]
    fn test_plain_paragraph() {
        let blocks = HtmlParser::new().parse("<p>Hello there</p>");
        assert_eq!(
            blocks,
            vec![Block::paragraph(vec![ContentRun::new("Hello there ")])]
        );
    }

    #[test]
    fn test_whitespace_paragraph_is_dropped() {
        assert!(HtmlParser::new().parse("<p>   </p>").is_empty());
    }

    #[test]
    fn test_link_paragraph() {
        let blocks = HtmlParser::new().parse(r#"<p><a href="https://x">L</a></p>"#);
        assert_eq!(
            blocks,
            vec![Block::paragraph(vec![
                ContentRun::linked("L", "https://x"),
                ContentRun::space(),
            ])]
        );
    }

    #[test]
    fn test_unordered_list() {
        let blocks = HtmlParser::new().parse("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::BulletedListItem));
        assert_eq!(blocks[0].runs, vec![ContentRun::new("one ")]);
        assert_eq!(blocks[1].runs, vec![ContentRun::new("two ")]);
    }

    #[test]
    fn test_no_structure_yields_empty_list() {
        assert!(HtmlParser::new().parse("just text").is_empty());
        assert!(HtmlParser::new().parse("").is_empty());
        assert!(HtmlParser::new().parse("<h1>title</h1><div>x</div>").is_empty());
    }

    #[test]
    fn test_malformed_html_degrades() {
        let blocks = HtmlParser::new().parse("<p>open <b>bold<p>next</i>");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].runs[0].text, "open ");
        assert!(blocks[0].runs[1].style.bold);
    }

    #[test]
    fn test_parse_many_keeps_order() {
        let parser = HtmlParser::new();
        let docs = ["<p>a</p>", "<p>b</p><p>c</p>", "nothing"];
        let results = parser.parse_many(&docs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].len(), 1);
        assert_eq!(results[1].len(), 2);
        assert!(results[2].is_empty());

        let sequential = HtmlParser::with_options(ParseOptions::new().sequential());
        assert_eq!(sequential.parse_many(&docs), results);
    }
}
