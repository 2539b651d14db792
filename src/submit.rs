//! Draft review submission.
//!
//! A review arrives from the editor either as pre-converted wire blocks or
//! as raw editor HTML, is validated, and becomes a page in the database
//! configured for its review type.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::HtmlParser;
use crate::render::{to_wire, FileObject, WireBlock};
use crate::store::{ContentStore, DatabaseQuery, PageRef, PageRequest};

/// Prefix of the hosted image URLs used for covers and icons.
pub const FILE_URL_PREFIX: &str = "https://drive.google.com/uc?export=view&id=";

const DEFAULT_COVER_ID: &str = "1cTazbHzIIAvmSu3wH9beVavJrf5aSkbz";

/// Title property of review and author pages.
pub const NAME_PROPERTY: &str = "Name";

/// Relation property linking a review to its author.
pub const AUTHOR_PROPERTY: &str = "Author";

/// Kind of review, each stored in its own database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewType {
    /// Review of a chapter book
    BookReview,
    /// Review of a picture book
    PictureBookReview,
    /// Free-form reflection
    Reflection,
}

impl ReviewType {
    /// All review types.
    pub const ALL: [ReviewType; 3] = [
        ReviewType::BookReview,
        ReviewType::PictureBookReview,
        ReviewType::Reflection,
    ];

    /// Name used in URLs and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::BookReview => "bookReview",
            ReviewType::PictureBookReview => "pictureBookReview",
            ReviewType::Reflection => "reflection",
        }
    }

    /// Default page icon for this review type.
    pub fn default_icon(&self) -> FileObject {
        let id = match self {
            ReviewType::BookReview => "1Dy-i3AR7CP0yu3K6cVbfMhxXiGlpV_MC",
            ReviewType::PictureBookReview => "1M7PawIFoO2bR5g3KoR9v6fX88rJY7yEl",
            ReviewType::Reflection => "1dvT4G75URxVY5V1LZFTDeokDWJ0alLRR",
        };
        FileObject::external(format!("{}{}", FILE_URL_PREFIX, id))
    }
}

impl fmt::Display for ReviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ReviewType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidReviewType(s.to_string()))
    }
}

/// Default page cover shared by all review types.
pub fn default_cover() -> FileObject {
    FileObject::external(format!("{}{}", FILE_URL_PREFIX, DEFAULT_COVER_ID))
}

/// Destination database per review type.
#[derive(Debug, Clone, Default)]
pub struct Destinations {
    databases: HashMap<ReviewType, String>,
}

impl Destinations {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a review type to a database. Blank ids are ignored.
    pub fn with(mut self, review_type: ReviewType, database_id: impl Into<String>) -> Self {
        let id = database_id.into();
        if !id.trim().is_empty() {
            self.databases.insert(review_type, id);
        }
        self
    }

    /// Route a review type if an id is configured.
    pub fn with_optional(self, review_type: ReviewType, database_id: Option<String>) -> Self {
        match database_id {
            Some(id) => self.with(review_type, id),
            None => self,
        }
    }

    /// Database for a review type.
    pub fn database_for(&self, review_type: ReviewType) -> Option<&str> {
        self.databases.get(&review_type).map(String::as_str)
    }

    /// Resolve a review type name to its database.
    pub fn resolve(&self, type_name: &str) -> Result<(ReviewType, &str)> {
        let review_type: ReviewType = type_name.parse()?;
        let database = self
            .database_for(review_type)
            .ok_or_else(|| Error::InvalidReviewType(type_name.to_string()))?;
        Ok((review_type, database))
    }
}

/// A review as sent by the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Review title
    #[serde(default)]
    pub title: String,

    /// Blocks already converted by the client
    #[serde(default)]
    pub formatted_blocks: Option<Vec<WireBlock>>,

    /// Raw editor HTML, converted server-side when no blocks are sent
    #[serde(default)]
    pub html: Option<String>,

    /// Author page id
    #[serde(default)]
    pub author_id: String,

    /// Review type echoed by the client (informational)
    #[serde(default)]
    pub review_type: Option<String>,

    /// Page cover
    #[serde(default)]
    pub cover: Option<FileObject>,

    /// Page icon
    #[serde(default)]
    pub icon: Option<FileObject>,
}

impl Submission {
    /// Wire blocks of this submission, converting HTML if needed.
    pub fn blocks(&self, parser: &HtmlParser) -> Vec<WireBlock> {
        match (&self.formatted_blocks, &self.html) {
            (Some(blocks), _) if !blocks.is_empty() => blocks.clone(),
            (_, Some(html)) => to_wire(&parser.parse(html)),
            _ => Vec::new(),
        }
    }

    /// Build the page request for a destination database.
    pub fn to_page(
        &self,
        review_type: ReviewType,
        database_id: &str,
        parser: &HtmlParser,
    ) -> Result<PageRequest> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::MissingField("title"));
        }
        let author = self.author_id.trim();
        if author.is_empty() {
            return Err(Error::MissingField("authorId"));
        }

        let blocks = self.blocks(parser);
        if blocks.is_empty() {
            return Err(Error::EmptySubmission);
        }

        Ok(PageRequest::in_database(database_id)
            .title(NAME_PROPERTY, title)
            .relation(AUTHOR_PROPERTY, author)
            .with_cover(Some(self.cover.clone().unwrap_or_else(default_cover)))
            .with_icon(Some(
                self.icon
                    .clone()
                    .unwrap_or_else(|| review_type.default_icon()),
            ))
            .with_children(blocks))
    }
}

/// Validate a submission and create its page.
pub fn submit_review<S: ContentStore + ?Sized>(
    store: &S,
    destinations: &Destinations,
    type_name: &str,
    submission: &Submission,
    parser: &HtmlParser,
) -> Result<PageRef> {
    let (review_type, database_id) = destinations.resolve(type_name)?;
    if let Some(claimed) = submission.review_type.as_deref() {
        if claimed != type_name {
            log::warn!(
                "submission claims review type {:?} but was posted as {:?}",
                claimed,
                type_name
            );
        }
    }

    let page = submission.to_page(review_type, database_id, parser)?;
    let created = store.create_page(&page)?;
    log::info!(
        "submitted {} {:?} as page {} ({} blocks)",
        review_type,
        submission.title.trim(),
        created.id,
        page.children.len()
    );
    Ok(created)
}

/// An author selectable in the review form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author page id
    pub id: String,
    /// Display name
    pub name: String,
}

/// List authors, optionally filtered by a case-insensitive substring.
pub fn search_authors<S: ContentStore + ?Sized>(
    store: &S,
    authors_db: &str,
    search: Option<&str>,
) -> Result<Vec<Author>> {
    let pages = store.query_database(authors_db, &DatabaseQuery::all())?;
    let authors = pages.into_iter().map(|page| Author {
        name: page
            .title_text(NAME_PROPERTY)
            .unwrap_or_else(|| "Unknown".to_string()),
        id: page.id,
    });

    let needle = search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase);
    Ok(match needle {
        Some(needle) => authors
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .collect(),
        None => authors.collect(),
    })
}
