//! Run-level types: text runs, their links and style flags.

use serde::{Deserialize, Serialize};

/// A run of text with consistent styling and link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRun {
    /// The text content (never empty)
    pub text: String,

    /// Hyperlink target, present iff the run came from inside an `<a>`
    pub link: Option<Link>,

    /// Propagated style flags
    pub style: StyleSet,
}

impl ContentRun {
    /// Create a new text run with default style and no link.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
            style: StyleSet::default(),
        }
    }

    /// The space-only run appended after every hyperlink.
    pub fn space() -> Self {
        Self::new(" ")
    }

    /// Create a linked run.
    pub fn linked(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            link: Some(Link::new(url)),
            ..Self::new(text)
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            style: StyleSet {
                bold: true,
                ..Default::default()
            },
            ..Self::new(text)
        }
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            style: StyleSet {
                italic: true,
                ..Default::default()
            },
            ..Self::new(text)
        }
    }

    /// Replace the style of this run.
    pub fn with_style(mut self, style: StyleSet) -> Self {
        self.style = style;
        self
    }

    /// URL of the link, if any.
    pub fn href(&self) -> Option<&str> {
        self.link.as_ref().map(|l| l.url.as_str())
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if this run contains only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Hyperlink target of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL (empty when the source anchor had no `href`)
    pub url: String,
}

impl Link {
    /// Create a new link.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Style flags attached to a run.
///
/// Flags are only ever switched on while walking down the tree, so merging
/// is a plain OR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSet {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Underlined text
    pub underline: bool,

    /// Inline code
    pub code: bool,

    /// Text color
    #[serde(default)]
    pub color: Color,
}

impl StyleSet {
    /// Flags contributed by a formatting element, looked up by tag name.
    ///
    /// Unrecognized tags contribute nothing.
    pub fn for_tag(tag: &str) -> Self {
        let mut style = Self::default();
        match tag {
            "b" | "strong" => style.bold = true,
            "i" | "em" => style.italic = true,
            "s" | "del" | "strike" => style.strikethrough = true,
            "u" => style.underline = true,
            "code" => style.code = true,
            _ => {}
        }
        style
    }

    /// OR another set of flags into this one.
    pub fn merge(&mut self, other: &StyleSet) {
        self.bold |= other.bold;
        self.italic |= other.italic;
        self.strikethrough |= other.strikethrough;
        self.underline |= other.underline;
        self.code |= other.code;
        if self.color == Color::Default {
            self.color = other.color;
        }
    }

    /// Check if any flag is set.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.strikethrough || self.underline || self.code
    }
}

/// Text color from the content store's palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Store default (the only color the converter produces)
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    GrayBackground,
    BrownBackground,
    OrangeBackground,
    YellowBackground,
    GreenBackground,
    BlueBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
}
