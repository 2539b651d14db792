//! One-call conversion from editor HTML to a rendered output.
//!
//! # Example
//!
//! ```
//! use richblocks::convert::{convert, ConvertOptions, OutputFormat};
//!
//! let options = ConvertOptions::new()
//!     .with_format(OutputFormat::Text)
//!     .with_stats(true);
//! let result = convert("<ul><li>milk</li><li>eggs</li></ul>", &options).unwrap();
//! assert_eq!(result.content, "• milk\n• eggs");
//! assert_eq!(result.stats.unwrap().list_item_count, 2);
//! ```

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::Block;
use crate::parser::{HtmlParser, ParseOptions};
use crate::render::{self, ExtractionStats, RenderOptions};

/// Options for a conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Pipeline options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,

    /// Whether to collect statistics during conversion
    pub collect_stats: bool,

    /// Output format
    pub output_format: OutputFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pipeline options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Wire JSON accepted by the content store
    #[default]
    Json,

    /// Plain text
    Text,

    /// HTML fragment
    Html,
}

impl OutputFormat {
    /// MIME type of the rendered output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Text => "text/plain; charset=utf-8",
            OutputFormat::Html => "text/html; charset=utf-8",
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
            OutputFormat::Html => "html",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" => Ok(OutputFormat::Text),
            "html" | "htm" => Ok(OutputFormat::Html),
            other => Err(Error::Other(format!("Unknown output format: {}", other))),
        }
    }
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Rendered content
    pub content: String,

    /// Converted blocks
    pub blocks: Vec<Block>,

    /// Extraction statistics (if collected)
    pub stats: Option<ExtractionStats>,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// Whether the input produced no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Render already converted blocks.
pub fn render_blocks(blocks: Vec<Block>, options: &ConvertOptions) -> Result<ConvertResult> {
    let content = match options.output_format {
        OutputFormat::Json => render::to_json(&blocks, options.render.json_format)?,
        OutputFormat::Text => render::to_text(&blocks, &options.render),
        OutputFormat::Html => render::to_html(&blocks),
    };
    let stats = options
        .collect_stats
        .then(|| ExtractionStats::from_blocks(&blocks));

    Ok(ConvertResult {
        content,
        blocks,
        stats,
        mime_type: options.output_format.mime_type(),
    })
}

/// Convert one HTML string.
pub fn convert(html: &str, options: &ConvertOptions) -> Result<ConvertResult> {
    let parser = HtmlParser::with_options(options.parse.clone());
    render_blocks(parser.parse(html), options)
}

/// Convert several HTML strings in parallel, keeping input order.
pub fn convert_many<S: AsRef<str> + Sync>(
    documents: &[S],
    options: &ConvertOptions,
) -> Vec<Result<ConvertResult>> {
    let parser = HtmlParser::with_options(options.parse.clone().sequential());
    let run = |html: &S| render_blocks(parser.parse(html.as_ref()), options);

    if options.parse.parallel {
        documents.par_iter().map(run).collect()
    } else {
        documents.iter().map(run).collect()
    }
}
