//! Page and query payloads of the content store API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::render::{FileObject, WireBlock};

/// Most child blocks the store accepts in one create or append request.
pub const MAX_CHILDREN_PER_REQUEST: usize = 100;

/// Request body for creating a page inside a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Database the page is created in
    pub parent: Parent,

    /// Page properties keyed by property name
    pub properties: BTreeMap<String, PropertyValue>,

    /// Page cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<FileObject>,

    /// Page icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<FileObject>,

    /// Body blocks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<WireBlock>,
}

impl PageRequest {
    /// Start a page request for a database.
    pub fn in_database(database_id: impl Into<String>) -> Self {
        Self {
            parent: Parent {
                database_id: database_id.into(),
            },
            properties: BTreeMap::new(),
            cover: None,
            icon: None,
            children: Vec::new(),
        }
    }

    /// Set a title property.
    pub fn title(mut self, property: &str, text: impl Into<String>) -> Self {
        self.properties.insert(
            property.to_string(),
            PropertyValue::Title(vec![PlainText::new(text)]),
        );
        self
    }

    /// Set a relation property pointing at one page.
    pub fn relation(mut self, property: &str, page_id: impl Into<String>) -> Self {
        self.properties.insert(
            property.to_string(),
            PropertyValue::Relation(vec![PageId { id: page_id.into() }]),
        );
        self
    }

    /// Set a date property.
    pub fn date(mut self, property: &str, start: impl Into<String>) -> Self {
        self.properties.insert(
            property.to_string(),
            PropertyValue::Date(DateValue {
                start: start.into(),
            }),
        );
        self
    }

    /// Set a select property.
    pub fn select(mut self, property: &str, name: impl Into<String>) -> Self {
        self.properties.insert(
            property.to_string(),
            PropertyValue::Select(SelectValue { name: name.into() }),
        );
        self
    }

    /// Set the cover image.
    pub fn with_cover(mut self, cover: Option<FileObject>) -> Self {
        self.cover = cover;
        self
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: Option<FileObject>) -> Self {
        self.icon = icon;
        self
    }

    /// Append body blocks.
    pub fn with_children(mut self, children: impl IntoIterator<Item = WireBlock>) -> Self {
        self.children.extend(children);
        self
    }

    /// Split the body so no request carries more than
    /// [`MAX_CHILDREN_PER_REQUEST`] blocks.
    ///
    /// Returns the create request holding the first blocks and the remaining
    /// blocks in append-sized chunks, in document order.
    pub fn split_children(&self) -> (PageRequest, Vec<Vec<WireBlock>>) {
        let mut first = self.clone();
        let rest = if first.children.len() > MAX_CHILDREN_PER_REQUEST {
            first.children.split_off(MAX_CHILDREN_PER_REQUEST)
        } else {
            Vec::new()
        };
        let chunks = rest
            .chunks(MAX_CHILDREN_PER_REQUEST)
            .map(<[WireBlock]>::to_vec)
            .collect();
        (first, chunks)
    }

    /// Plain text of a title property, if set.
    pub fn title_text(&self, property: &str) -> Option<&str> {
        match self.properties.get(property)? {
            PropertyValue::Title(parts) => parts.first().map(|p| p.text.content.as_str()),
            _ => None,
        }
    }
}

/// Parent database of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    /// Database identifier
    pub database_id: String,
}

/// A property value in a page request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// Title property
    Title(Vec<PlainText>),
    /// Relation to other pages
    Relation(Vec<PageId>),
    /// Date property
    Date(DateValue),
    /// Single select property
    Select(SelectValue),
}

/// Minimal text object used in titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainText {
    /// Text payload
    pub text: PlainContent,
}

impl PlainText {
    /// Create a text object.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            text: PlainContent {
                content: content.into(),
            },
        }
    }
}

/// Content of a minimal text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainContent {
    /// The text
    pub content: String,
}

/// Reference to a page by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageId {
    /// Page identifier
    pub id: String,
}

/// Date property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    /// ISO 8601 start date
    pub start: String,
}

/// Select property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectValue {
    /// Option name
    pub name: String,
}

/// Page returned by the store after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRef {
    /// Page identifier
    pub id: String,

    /// Public URL of the page
    #[serde(default)]
    pub url: Option<String>,
}

/// A page as returned by a database query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageObject {
    /// Page identifier
    pub id: String,

    /// Raw property values
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl PageObject {
    /// First text fragment of a title property.
    pub fn title_text(&self, property: &str) -> Option<String> {
        let first = self.properties.get(property)?.get("title")?.get(0)?;
        first
            .pointer("/text/content")
            .or_else(|| first.get("plain_text"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Body of a database query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseQuery {
    /// Filter object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    /// Pagination cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,

    /// Page size (store maximum is 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl DatabaseQuery {
    /// Query without filter.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a status property equal to a value.
    pub fn status_equals(property: &str, value: &str) -> Self {
        Self {
            filter: Some(json!({
                "property": property,
                "status": { "equals": value }
            })),
            ..Self::default()
        }
    }

    /// Continue from a cursor.
    pub fn after(&self, cursor: impl Into<String>) -> Self {
        Self {
            start_cursor: Some(cursor.into()),
            ..self.clone()
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// Matching pages
    #[serde(default)]
    pub results: Vec<PageObject>,

    /// Whether more results are available
    #[serde(default)]
    pub has_more: bool,

    /// Cursor for the next page
    #[serde(default)]
    pub next_cursor: Option<String>,
}
