//! Rendering module for converting blocks to output formats.

mod html;
mod json;
mod options;
mod result;
mod text;

pub use html::to_html;
pub use json::{
    to_json, to_wire, BlockBody, EmbedBody, ExternalUrl, FileObject, JsonFormat, RichText,
    RichTextBody, TextContent, WireBlock,
};
pub use options::RenderOptions;
pub use result::ExtractionStats;
pub use text::to_text;
