//! Settings shared by the commands that talk to the content store.
//!
//! Every value can be given as a flag or through the environment.

use std::error::Error;
use std::time::Duration;

use clap::Args;
use richblocks::store::DEFAULT_BASE_URL;
use richblocks::submit::{Destinations, ReviewType};
use richblocks::NotionClient;

/// Content store connection.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Integration token
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API root
    #[arg(long, env = "NOTION_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

impl StoreArgs {
    /// Build the store client.
    pub fn client(&self) -> Result<NotionClient, Box<dyn Error>> {
        let token = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or("Content store API key is not set (NOTION_API_KEY)")?;
        let client = NotionClient::with_timeout(token, Duration::from_secs(self.timeout))?
            .with_base_url(&self.api_url);
        Ok(client)
    }
}

/// Review databases, one per review type.
#[derive(Args, Debug, Clone, Default)]
pub struct ReviewArgs {
    /// Database for book reviews
    #[arg(long, env = "NOTION_BOOK_REVIEW_DB")]
    pub book_review_db: Option<String>,

    /// Database for picture book reviews
    #[arg(long, env = "NOTION_PICTURE_BOOK_DB")]
    pub picture_book_db: Option<String>,

    /// Database for reflections
    #[arg(long, env = "NOTION_REFLECTION_DB")]
    pub reflection_db: Option<String>,

    /// Database of authors
    #[arg(long, env = "NOTION_AUTHORS_DB")]
    pub authors_db: Option<String>,
}

impl ReviewArgs {
    /// Review type to database mapping.
    pub fn destinations(&self) -> Destinations {
        Destinations::new()
            .with_optional(ReviewType::BookReview, self.book_review_db.clone())
            .with_optional(ReviewType::PictureBookReview, self.picture_book_db.clone())
            .with_optional(ReviewType::Reflection, self.reflection_db.clone())
    }

    /// Authors database, required by author search.
    pub fn authors_db(&self) -> Result<&str, Box<dyn Error>> {
        self.authors_db
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| "Authors database is not set (NOTION_AUTHORS_DB)".into())
    }
}
