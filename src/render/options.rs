//! Rendering options and configuration.

use super::JsonFormat;

/// Options for rendering converted blocks.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Character to use for bulleted list markers in text output
    pub list_marker: char,

    /// Append link targets after linked runs in text output
    pub include_link_urls: bool,

    /// JSON layout
    pub json_format: JsonFormat,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bulleted list marker.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Enable or disable link targets in text output.
    pub fn with_link_urls(mut self, include: bool) -> Self {
        self.include_link_urls = include;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            list_marker: '•',
            include_link_urls: false,
            json_format: JsonFormat::Pretty,
        }
    }
}
